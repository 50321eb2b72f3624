//! Caller identity for command-line sessions.

use ev_core::enums::Authority;
use ev_core::identity::AuthIdentity;
use serde::{Deserialize, Serialize};

fn default_authorities() -> Vec<Authority> {
    vec![Authority::Admin]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Username stamped on mutations. Empty means unauthenticated.
    #[serde(default)]
    pub user: String,

    /// Authorities granted to `user`.
    #[serde(default = "default_authorities")]
    pub authorities: Vec<Authority>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            authorities: default_authorities(),
        }
    }
}

impl IdentityConfig {
    pub fn is_configured(&self) -> bool {
        !self.user.trim().is_empty()
    }

    /// The configured identity, or `None` for an anonymous session.
    #[must_use]
    pub fn to_identity(&self) -> Option<AuthIdentity> {
        self.is_configured()
            .then(|| AuthIdentity::new(self.user.trim(), self.authorities.clone()))
    }
}
