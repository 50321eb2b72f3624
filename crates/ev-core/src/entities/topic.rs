use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A node in the topic forest.
///
/// `parent_id` is a weak reference: the parent owns nothing, and the set of
/// children is derived by querying for topics whose parent is this one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Topic {
    pub label: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}
