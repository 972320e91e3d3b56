//! Request context: the acting user and the API key gate.

use crate::{ApiError, AppState};
use api_shared::{auth, API_KEY_HEADER, USER_HEADER};
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use cdx_core::Actor;
use std::convert::Infallible;

/// The user named by `x-cdx-user`, or the system actor.
pub struct CurrentActor(pub Actor);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok());
        Ok(Self(Actor::from_header(user)))
    }
}

/// Rejects `/api` requests whose `x-api-key` does not match the configured key.
pub(crate) async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    auth::validate_api_key(provided, state.api_key.as_deref())
        .map_err(|status| ApiError::Unauthenticated(status.message().to_string()))?;
    Ok(next.run(request).await)
}
