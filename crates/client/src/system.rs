use crate::{service_client, unary};
use api_shared::pb::{self, system_client::SystemClient as Generated};

service_client!(
    /// Liveness checks.
    SystemClient => Generated
);

impl SystemClient {
    unary! {
        health(()) -> pb::HealthRes;
    }
}
