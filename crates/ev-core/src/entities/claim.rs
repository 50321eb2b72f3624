use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A scientific claim under examination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Claim {
    pub date: Option<NaiveDate>,
    pub text: String,
    pub notes: Option<String>,
}
