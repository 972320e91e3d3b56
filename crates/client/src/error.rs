use tonic::Code;

/// A failed call, carrying the gRPC status code the server returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code:?}: {message}")]
pub struct ClientError {
    pub code: Code,
    pub message: String,
}

impl ClientError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Code::NotFound
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code == Code::InvalidArgument
    }

    pub fn is_already_exists(&self) -> bool {
        self.code == Code::AlreadyExists
    }

    pub fn is_failed_precondition(&self) -> bool {
        self.code == Code::FailedPrecondition
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.code == Code::Unauthenticated
    }

    /// True for transport failures and upstream outages alike.
    pub fn is_unavailable(&self) -> bool {
        self.code == Code::Unavailable
    }
}

impl From<tonic::Status> for ClientError {
    fn from(status: tonic::Status) -> Self {
        Self::new(status.code(), status.message())
    }
}

impl From<tonic::transport::Error> for ClientError {
    fn from(err: tonic::transport::Error) -> Self {
        Self::new(Code::Unavailable, err.to_string())
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
