//! # ev-config
//!
//! Layered configuration loading for the evidence store using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`EVIDENCE_*` prefix, `__` as separator)
//! 2. Project-level `.evidence/config.toml`
//! 3. User-level `~/.config/evidence/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `EVIDENCE_DATABASE__LOCK_TIMEOUT_MS` -> `database.lock_timeout_ms`,
//! `EVIDENCE_IDENTITY__USER` -> `identity.user`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use ev_config::EvConfig;
//!
//! let config = EvConfig::load_with_dotenv().expect("config");
//! println!("store: {}", config.database.path);
//! ```

mod database;
mod error;
mod identity;
mod query;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use identity::IdentityConfig;
pub use query::QueryConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project directory holding the local config file and default database.
pub const PROJECT_DIR: &str = ".evidence";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EvConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

impl EvConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading a `.env` file from the current
    /// directory or its ancestors. A missing `.env` is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can layer additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = Self::project_config_path();
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("EVIDENCE_").split("__"))
    }

    /// Reject values the service cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::invalid("database.path", "must not be empty"));
        }
        if self.database.lock_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "database.lock_timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.query.max_page_size == 0 {
            return Err(ConfigError::invalid(
                "query.max_page_size",
                "must be greater than 0",
            ));
        }
        if self.query.default_page_size > self.query.max_page_size {
            return Err(ConfigError::invalid(
                "query.default_page_size",
                format!(
                    "{} exceeds query.max_page_size ({})",
                    self.query.default_page_size, self.query.max_page_size
                ),
            ));
        }
        if self.identity.is_configured() && self.identity.authorities.is_empty() {
            return Err(ConfigError::invalid(
                "identity.authorities",
                "a configured user needs at least one authority",
            ));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("evidence").join("config.toml"))
    }

    /// Path to the project-local config file, relative to the working directory.
    #[must_use]
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_DIR).join("config.toml")
    }
}
