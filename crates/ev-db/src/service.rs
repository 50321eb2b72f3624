//! Service layer orchestrating lifecycle, audit, graph and query operations.
//!
//! `EvService` wraps `EvDb` behind a shared handle plus the caller's identity.
//! All repo methods are implemented as `impl EvService` blocks under `repos`.
//!
//! Every mutation follows this protocol:
//! 1. Authorize against the caller's identity (no store access on failure)
//! 2. Validate the request shape (no store access on failure)
//! 3. Acquire the write gate, bounded by `lock_timeout`
//! 4. Begin transaction
//! 5. Validate against current state, execute SQL, append log entry
//! 6. Commit, or roll back on any error
//!
//! Reads take the shared side of the gate, so each query observes one
//! consistent snapshot and never sees a mutation without its log entry.
//! The write gate serializes all mutations, which covers the per-id and
//! per-batch serialization the lifecycle needs.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ev_config::EvConfig;
use ev_core::enums::Authority;
use ev_core::errors::CoreError;
use ev_core::identity::{AuthIdentity, authorize};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::EvDb;
use crate::error::DatabaseError;

/// Runtime limits the service enforces.
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    /// Longest a mutation waits for the write gate.
    pub lock_timeout: Duration,
    /// Largest page size a query may request.
    pub max_page_size: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from(&EvConfig::default())
    }
}

impl From<&EvConfig> for ServiceSettings {
    fn from(config: &EvConfig) -> Self {
        Self {
            lock_timeout: config.database.lock_timeout(),
            max_page_size: config.query.max_page_size,
        }
    }
}

struct Store {
    db: EvDb,
    gate: RwLock<()>,
    settings: ServiceSettings,
}

/// Entry point for every store operation.
///
/// Cloning is cheap and shares the underlying store and gate; use
/// [`Self::with_identity`] to act for a different caller over the same store.
#[derive(Clone)]
pub struct EvService {
    store: Arc<Store>,
    identity: Option<AuthIdentity>,
}

impl EvService {
    /// Open the store described by `config`, acting as its configured identity.
    ///
    /// Creates the database's parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory or database cannot be opened.
    pub async fn open(config: &EvConfig) -> Result<Self, DatabaseError> {
        if !config.database.is_in_memory()
            && let Some(parent) = Path::new(&config.database.path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::InvalidState(format!(
                    "cannot create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let db = EvDb::open_local(&config.database.path).await?;
        Ok(Self::from_db(
            db,
            config.identity.to_identity(),
            ServiceSettings::from(config),
        ))
    }

    /// Open a local database with default settings.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(
        db_path: &str,
        identity: Option<AuthIdentity>,
    ) -> Result<Self, DatabaseError> {
        let db = EvDb::open_local(db_path).await?;
        Ok(Self::from_db(db, identity, ServiceSettings::default()))
    }

    /// Create from an existing `EvDb`.
    #[must_use]
    pub fn from_db(db: EvDb, identity: Option<AuthIdentity>, settings: ServiceSettings) -> Self {
        Self {
            store: Arc::new(Store {
                db,
                gate: RwLock::new(()),
                settings,
            }),
            identity,
        }
    }

    /// A handle on the same store acting as `identity`.
    #[must_use]
    pub fn with_identity(&self, identity: Option<AuthIdentity>) -> Self {
        Self {
            store: Arc::clone(&self.store),
            identity,
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub fn db(&self) -> &EvDb {
        &self.store.db
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&AuthIdentity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn settings(&self) -> ServiceSettings {
        self.store.settings
    }

    /// Check the caller holds `required` and return the username to stamp.
    pub(crate) fn authorize(&self, required: Authority) -> Result<String, DatabaseError> {
        match authorize(self.identity.as_ref(), required) {
            Ok(identity) => Ok(identity.user_id.clone()),
            Err(err) => {
                tracing::warn!(required = %required, error = %err, "mutation rejected");
                Err(err.into())
            }
        }
    }

    /// Shared side of the gate, held for the duration of one read query.
    pub(crate) async fn read_gate(&self) -> RwLockReadGuard<'_, ()> {
        self.store.gate.read().await
    }

    /// Exclusive side of the gate, held for the duration of one mutation.
    ///
    /// Fails with a retryable `CoreError::Conflict` once `lock_timeout` elapses.
    pub(crate) async fn write_gate(
        &self,
        operation: &str,
    ) -> Result<RwLockWriteGuard<'_, ()>, DatabaseError> {
        let timeout = self.store.settings.lock_timeout;
        if let Ok(guard) = tokio::time::timeout(timeout, self.store.gate.write()).await {
            Ok(guard)
        } else {
            tracing::warn!(
                operation,
                timeout_ms = timeout.as_millis(),
                "write gate contention timeout"
            );
            Err(CoreError::conflict(format!(
                "timed out after {} ms waiting to {operation}; retry",
                timeout.as_millis()
            ))
            .into())
        }
    }

    /// Begin a transaction on the store connection.
    pub(crate) async fn begin(&self) -> Result<libsql::Transaction, DatabaseError> {
        Ok(self.db().conn().transaction().await?)
    }
}

/// Commit `tx` if `result` is `Ok`, otherwise roll it back and return the error.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(err)
        }
    }
}
