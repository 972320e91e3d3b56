use cdx_types::TextError;
use cdx_uuid::UuidError;

/// Errors raised by core services.
///
/// The variant (not the message) decides how a transport reports the failure: `api-grpc`
/// maps each variant to a gRPC status code and `api-rest` to an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested record, or a record it references, does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request failed validation.
    #[error("{0}")]
    NotAcceptable(String),

    /// Current state forbids the operation (e.g. deleting a template still in use).
    #[error("{0}")]
    FailedPrecondition(String),

    /// A uniqueness rule would be violated.
    #[error("{0}")]
    AlreadyExists(String),

    /// An outbound HTTP call failed or returned a non-success status.
    #[error("external service error: {0}")]
    ExternalService(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TextError> for CoreError {
    fn from(err: TextError) -> Self {
        CoreError::NotAcceptable(err.to_string())
    }
}

impl From<UuidError> for CoreError {
    fn from(err: UuidError) -> Self {
        CoreError::NotAcceptable(err.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        CoreError::ExternalService(err.to_string())
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
