/// Validates the provided API key against the key configured at startup.
///
/// When no key is configured (`expected` is `None`) authentication is disabled and every
/// request is accepted.
///
/// Returns `Ok(())` if the key is valid, or an `unauthenticated` status otherwise.
#[allow(clippy::result_large_err)]
pub fn validate_api_key(provided: Option<&str>, expected: Option<&str>) -> Result<(), tonic::Status> {
    let Some(expected) = expected else {
        return Ok(());
    };

    match provided {
        Some(key) if key == expected => Ok(()),
        Some(_) => Err(tonic::Status::unauthenticated("Invalid API key")),
        None => Err(tonic::Status::unauthenticated("Missing x-api-key header")),
    }
}
