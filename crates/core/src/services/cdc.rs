//! Case reports to the CDC.

use crate::actor::Actor;
use crate::config::CdcConfig;
use crate::{CoreError, CoreResult};
use api_shared::pb;
use reqwest::header::CONTENT_TYPE;

const FHIR_JSON: &str = "application/fhir+json";

/// Posts FHIR bundles to the configured reporting endpoint.
#[derive(Clone, Debug)]
pub struct CdcMessageService {
    client: reqwest::Client,
    config: CdcConfig,
}

impl CdcMessageService {
    pub fn new(client: reqwest::Client, config: CdcConfig) -> Self {
        Self { client, config }
    }

    /// Sends `message` verbatim and returns the endpoint's status code.
    ///
    /// # Errors
    ///
    /// - `NotAcceptable` for an empty message.
    /// - `ExternalService` on transport failure or a non-2xx response.
    pub async fn send(&self, actor: &Actor, message: &str) -> CoreResult<pb::CdcMessageRes> {
        if message.trim().is_empty() {
            return Err(CoreError::NotAcceptable("message is required".into()));
        }

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, FHIR_JSON)
            .body(message.to_string());
        for (name, value) in &self.config.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(actor = actor.user_id(), %status, "CDC endpoint rejected message");
            return Err(CoreError::ExternalService(format!(
                "CDC endpoint returned {status}"
            )));
        }

        tracing::info!(actor = actor.user_id(), %status, "CDC message delivered");
        Ok(pb::CdcMessageRes {
            success: true,
            status_code: i32::from(status.as_u16()),
        })
    }
}
