use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;

/// A Topic → entity edge, unique per `(topic_id, entity_kind, entity_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TopicRef {
    pub id: i64,
    pub topic_id: i64,
    pub entity_kind: EntityKind,
    pub entity_id: i64,
    pub locations: Option<String>,
}

/// Input for creating a `TopicRef`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTopicRef {
    pub topic_id: i64,
    pub entity_kind: EntityKind,
    pub entity_id: i64,
    pub locations: Option<String>,
}
