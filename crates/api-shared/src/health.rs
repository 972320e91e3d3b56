use crate::pb::HealthRes;

/// Simple health service that can be used by both gRPC and REST APIs
///
/// This service provides a standardised way to check the health status of the CDX platform.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "CDX is alive".into(),
        }
    }
}
