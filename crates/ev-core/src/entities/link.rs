use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::LogEntry;
use crate::enums::{EntityKind, StatusKind};

/// A directional, soft-deletable edge between two linkable entities.
///
/// Stored direction matters only for uniqueness; graph queries treat the edge
/// as undirected.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EntityLink {
    pub id: i64,
    pub status: StatusKind,
    pub from_entity_kind: EntityKind,
    pub from_entity_id: i64,
    pub to_entity_kind: EntityKind,
    pub to_entity_id: i64,
    pub from_entity_locations: Option<String>,
    pub to_entity_locations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    #[serde(default)]
    pub log: Vec<LogEntry>,
}

impl EntityLink {
    /// The endpoint opposite `(kind, id)`, if the link touches it.
    #[must_use]
    pub fn counterpart(&self, kind: EntityKind, id: i64) -> Option<(EntityKind, i64)> {
        if self.from_entity_kind == kind && self.from_entity_id == id {
            Some((self.to_entity_kind, self.to_entity_id))
        } else if self.to_entity_kind == kind && self.to_entity_id == id {
            Some((self.from_entity_kind, self.from_entity_id))
        } else {
            None
        }
    }
}

/// Input for creating an `EntityLink`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewLink {
    pub from_entity_kind: EntityKind,
    pub from_entity_id: i64,
    pub to_entity_kind: EntityKind,
    pub to_entity_id: i64,
    pub from_entity_locations: Option<String>,
    pub to_entity_locations: Option<String>,
}

impl NewLink {
    #[must_use]
    pub const fn new(
        from_entity_kind: EntityKind,
        from_entity_id: i64,
        to_entity_kind: EntityKind,
        to_entity_id: i64,
    ) -> Self {
        Self {
            from_entity_kind,
            from_entity_id,
            to_entity_kind,
            to_entity_id,
            from_entity_locations: None,
            to_entity_locations: None,
        }
    }
}
