use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Publisher {
    pub name: String,
    pub location: Option<String>,
    pub country: Option<String>,
    pub url: Option<String>,
    pub journal_count: Option<i64>,
}
