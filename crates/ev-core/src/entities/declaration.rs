use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DeclarationKind;

/// A public declaration, open letter or petition, with its signatories.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub date: Option<NaiveDate>,
    pub title: String,
    pub country: Option<String>,
    pub url: Option<String>,
    pub signatories: Option<String>,
    pub signatory_count: Option<i64>,
    pub notes: Option<String>,
}
