use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, TransactionKind};

/// An append-only audit record of one mutation. Never modified once written.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub transaction_kind: TransactionKind,
    pub entity_kind: EntityKind,
    pub entity_id: i64,
    pub user: String,
}
