use cdx_core::CoreError;
use tonic::Status;

/// Maps a core error onto the gRPC status a client should see.
///
/// Infrastructure failures are logged here and reported as `INTERNAL`.
pub fn to_status(err: CoreError) -> Status {
    match err {
        CoreError::NotFound(msg) => Status::not_found(msg),
        CoreError::NotAcceptable(msg) => Status::invalid_argument(msg),
        CoreError::FailedPrecondition(msg) => Status::failed_precondition(msg),
        CoreError::AlreadyExists(msg) => Status::already_exists(msg),
        CoreError::ExternalService(msg) => {
            tracing::warn!("external service failure: {msg}");
            Status::unavailable(msg)
        }
        other @ (CoreError::Storage(_) | CoreError::Serialization(_) | CoreError::Internal(_)) => {
            tracing::error!("request failed: {other}");
            Status::internal(other.to_string())
        }
    }
}
