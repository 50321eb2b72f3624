use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Authority;
use crate::errors::AuthorizationError;

/// Authenticated user identity handed to the service by the outer security layer.
///
/// Contains only data fields. A service constructed without an identity is
/// unauthenticated: reads work, every mutation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthIdentity {
    /// Username recorded as `created_by` / `updated_by` and in log entries.
    pub user_id: String,
    /// Granted authorities. `ADM` implies all others.
    pub authorities: Vec<Authority>,
}

impl AuthIdentity {
    #[must_use]
    pub fn new(user_id: impl Into<String>, authorities: impl Into<Vec<Authority>>) -> Self {
        Self {
            user_id: user_id.into(),
            authorities: authorities.into(),
        }
    }

    /// Identity holding `ADM`.
    #[must_use]
    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, [Authority::Admin])
    }

    #[must_use]
    pub fn has_authority(&self, required: Authority) -> bool {
        self.authorities.iter().any(|a| a.grants(required))
    }
}

/// Check that `identity` is present and holds `required`.
///
/// # Errors
///
/// `AuthorizationError::Unauthorized` when no identity is present,
/// `AuthorizationError::Forbidden` when the authority is missing.
pub fn authorize(
    identity: Option<&AuthIdentity>,
    required: Authority,
) -> Result<&AuthIdentity, AuthorizationError> {
    let identity = identity.ok_or(AuthorizationError::Unauthorized)?;
    if identity.has_authority(required) {
        Ok(identity)
    } else {
        Err(AuthorizationError::Forbidden {
            user: identity.user_id.clone(),
            required,
        })
    }
}
