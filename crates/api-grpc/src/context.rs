//! Per-request context: authentication and the acting user.

use api_shared::{auth, API_KEY_HEADER, USER_HEADER};
use cdx_core::Actor;
use std::sync::Arc;
use tonic::{Request, Status};

/// Builds the authentication interceptor applied to every service.
///
/// With `api_key` set, requests must carry a matching `x-api-key` metadata entry. With no
/// key configured every request passes.
pub fn auth_interceptor(
    api_key: Option<String>,
) -> impl FnMut(Request<()>) -> Result<Request<()>, Status> + Clone {
    let expected: Option<Arc<str>> = api_key.map(Arc::from);
    move |req: Request<()>| {
        let provided = req
            .metadata()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        auth::validate_api_key(provided, expected.as_deref())?;
        Ok(req)
    }
}

/// Resolves the acting user from `x-cdx-user` metadata.
pub fn actor_from_request<T>(req: &Request<T>) -> Actor {
    Actor::from_header(
        req.metadata()
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok()),
    )
}
