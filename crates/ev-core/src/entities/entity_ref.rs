use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;

/// A `(kind, id)` handle on a record, as returned by graph traversals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct EntityRef {
    pub entity_kind: EntityKind,
    pub entity_id: i64,
}

impl EntityRef {
    #[must_use]
    pub const fn new(entity_kind: EntityKind, entity_id: i64) -> Self {
        Self {
            entity_kind,
            entity_id,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.entity_kind, self.entity_id)
    }
}
