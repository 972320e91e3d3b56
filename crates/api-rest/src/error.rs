use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cdx_core::CoreError;
use serde_json::json;

/// A failed request, rendered as `{ "error": <message> }`.
#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    Unauthenticated(String),
    BadRequest(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Core(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(err) => match err {
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::NotAcceptable(_) => StatusCode::BAD_REQUEST,
                CoreError::FailedPrecondition(_) => StatusCode::PRECONDITION_FAILED,
                CoreError::AlreadyExists(_) => StatusCode::CONFLICT,
                CoreError::ExternalService(_) => StatusCode::BAD_GATEWAY,
                CoreError::Storage(_) | CoreError::Serialization(_) | CoreError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Core(err) => err.to_string(),
            ApiError::Unauthenticated(msg) | ApiError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(%status, "request failed: {message}");
        } else {
            tracing::debug!(%status, "request rejected: {message}");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_http_statuses() {
        let cases = [
            (CoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CoreError::NotAcceptable("x".into()), StatusCode::BAD_REQUEST),
            (CoreError::FailedPrecondition("x".into()), StatusCode::PRECONDITION_FAILED),
            (CoreError::AlreadyExists("x".into()), StatusCode::CONFLICT),
            (CoreError::ExternalService("x".into()), StatusCode::BAD_GATEWAY),
            (CoreError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_auth_failure_is_unauthorized() {
        let response = ApiError::Unauthenticated("Invalid API key".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
