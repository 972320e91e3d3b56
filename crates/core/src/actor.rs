//! The acting user behind a request.

use crate::constants::SYSTEM_ACTOR;

/// Identifies who performed an operation.
///
/// Transports resolve the actor from the `x-cdx-user` header; background jobs and callers
/// without a user act as [`Actor::system`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    user_id: String,
}

impl Actor {
    /// Creates an actor for `user_id`, falling back to the system actor when blank.
    pub fn new(user_id: impl AsRef<str>) -> Self {
        let trimmed = user_id.as_ref().trim();
        if trimmed.is_empty() {
            return Self::system();
        }
        Self {
            user_id: trimmed.to_string(),
        }
    }

    pub fn system() -> Self {
        Self {
            user_id: SYSTEM_ACTOR.to_string(),
        }
    }

    /// Resolves an optional header value into an actor.
    pub fn from_header(value: Option<&str>) -> Self {
        value.map(Self::new).unwrap_or_else(Self::system)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_user_falls_back_to_system() {
        assert_eq!(Actor::new("  ").user_id(), SYSTEM_ACTOR);
        assert_eq!(Actor::from_header(None).user_id(), SYSTEM_ACTOR);
    }

    #[test]
    fn test_header_value_is_trimmed() {
        assert_eq!(Actor::from_header(Some(" dr.who ")).user_id(), "dr.who");
    }
}
