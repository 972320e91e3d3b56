//! Per-call metadata attached to every request.

use crate::{ClientError, ClientResult};
use api_shared::{API_KEY_HEADER, USER_HEADER};
use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::{Code, Request, Status};

/// Attaches `x-api-key` and `x-cdx-user` when configured.
#[derive(Clone, Debug, Default)]
pub struct CallCredentials {
    api_key: Option<MetadataValue<Ascii>>,
    user: Option<MetadataValue<Ascii>>,
}

impl CallCredentials {
    /// No API key and no user: the server treats the caller as the system actor.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` if `key` is not valid ASCII metadata.
    pub fn with_api_key(mut self, key: &str) -> ClientResult<Self> {
        self.api_key = Some(metadata_value(API_KEY_HEADER, key)?);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` if `user` is not valid ASCII metadata.
    pub fn with_user(mut self, user: &str) -> ClientResult<Self> {
        self.user = Some(metadata_value(USER_HEADER, user)?);
        Ok(self)
    }
}

fn metadata_value(name: &str, value: &str) -> ClientResult<MetadataValue<Ascii>> {
    value
        .parse()
        .map_err(|_| ClientError::new(Code::InvalidArgument, format!("invalid {name} value")))
}

impl Interceptor for CallCredentials {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        if let Some(key) = &self.api_key {
            request.metadata_mut().insert(API_KEY_HEADER, key.clone());
        }
        if let Some(user) = &self.user {
            request.metadata_mut().insert(USER_HEADER, user.clone());
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interceptor_adds_configured_headers() {
        let mut creds = CallCredentials::anonymous()
            .with_api_key("secret")
            .unwrap()
            .with_user("dr.lee")
            .unwrap();
        let req = creds.call(Request::new(())).unwrap();
        assert_eq!(req.metadata().get(API_KEY_HEADER).unwrap(), "secret");
        assert_eq!(req.metadata().get(USER_HEADER).unwrap(), "dr.lee");
    }

    #[test]
    fn test_anonymous_adds_nothing() {
        let req = CallCredentials::anonymous().call(Request::new(())).unwrap();
        assert!(req.metadata().get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn test_rejects_non_ascii_values() {
        let err = CallCredentials::anonymous().with_user("dr.\n").unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
