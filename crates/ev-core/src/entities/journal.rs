use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A periodical in which publications appear.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Journal {
    pub title: String,
    pub abbreviation: Option<String>,
    pub url: Option<String>,
    pub issn: Option<String>,
    /// Id of the `Publisher` record issuing this journal.
    pub publisher_id: Option<i64>,
    pub notes: Option<String>,
}
