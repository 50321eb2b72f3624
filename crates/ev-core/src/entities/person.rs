use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A scientist, author or other public figure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Person {
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub nickname: Option<String>,
    pub prefix: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub alias: Option<String>,
    pub notes: Option<String>,
    pub qualifications: Option<String>,
    pub country: Option<String>,
    pub rating: Option<i64>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub published: bool,
}
