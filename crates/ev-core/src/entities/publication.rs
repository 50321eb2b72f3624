use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::PublicationKind;

/// A paper, book, report or other citable work.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Publication {
    pub title: String,
    pub authors: Option<String>,
    /// Id of the `Journal` record the work appeared in.
    pub journal_id: Option<i64>,
    pub kind: Option<PublicationKind>,
    pub date: Option<NaiveDate>,
    pub year: Option<i64>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub notes: Option<String>,
    pub peer_reviewed: Option<bool>,
    pub doi: Option<String>,
    pub isbn: Option<String>,
    pub url: Option<String>,
    pub accessed: Option<NaiveDate>,
}
