use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{
    Claim, Declaration, Journal, LogEntry, Person, Publication, Publisher, Quotation, Topic,
};
use crate::enums::{EntityKind, StatusKind};
use crate::errors::CoreError;

/// Kind-specific payload of a record entity.
///
/// Serialized with an `entity_kind` tag so the payload alone is
/// self-describing when stored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "entity_kind")]
pub enum EntityData {
    #[serde(rename = "CLA")]
    Claim(Claim),
    #[serde(rename = "DEC")]
    Declaration(Declaration),
    #[serde(rename = "JOU")]
    Journal(Journal),
    #[serde(rename = "PER")]
    Person(Person),
    #[serde(rename = "PUB")]
    Publication(Publication),
    #[serde(rename = "PBR")]
    Publisher(Publisher),
    #[serde(rename = "QUO")]
    Quotation(Quotation),
    #[serde(rename = "TOP")]
    Topic(Topic),
}

impl EntityData {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Claim(_) => EntityKind::Claim,
            Self::Declaration(_) => EntityKind::Declaration,
            Self::Journal(_) => EntityKind::Journal,
            Self::Person(_) => EntityKind::Person,
            Self::Publication(_) => EntityKind::Publication,
            Self::Publisher(_) => EntityKind::Publisher,
            Self::Quotation(_) => EntityKind::Quotation,
            Self::Topic(_) => EntityKind::Topic,
        }
    }

    #[must_use]
    pub const fn as_topic(&self) -> Option<&Topic> {
        match self {
            Self::Topic(topic) => Some(topic),
            _ => None,
        }
    }

    /// Check required fields and numeric ranges. Reference targets are
    /// checked against the store separately, see [`Self::references`].
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::Claim(c) => required("text", &c.text),
            Self::Declaration(d) => {
                required("title", &d.title)?;
                non_negative("signatory_count", d.signatory_count)
            }
            Self::Journal(j) => required("title", &j.title),
            Self::Person(p) => {
                required("last_name", &p.last_name)?;
                non_negative("rating", p.rating)
            }
            Self::Publication(p) => required("title", &p.title),
            Self::Publisher(p) => {
                required("name", &p.name)?;
                non_negative("journal_count", p.journal_count)
            }
            Self::Quotation(q) => {
                required("quotee", &q.quotee)?;
                required("text", &q.text)
            }
            Self::Topic(t) => required("label", &t.label),
        }
    }

    /// Other records this payload points at: `(field, target kind, target id)`.
    #[must_use]
    pub fn references(&self) -> Vec<(&'static str, EntityKind, i64)> {
        match self {
            Self::Journal(j) => j
                .publisher_id
                .map(|id| ("publisher_id", EntityKind::Publisher, id))
                .into_iter()
                .collect(),
            Self::Publication(p) => p
                .journal_id
                .map(|id| ("journal_id", EntityKind::Journal, id))
                .into_iter()
                .collect(),
            Self::Topic(t) => t
                .parent_id
                .map(|id| ("parent_id", EntityKind::Topic, id))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Parent topic id, for topics that have one.
    #[must_use]
    pub fn parent_id(&self) -> Option<i64> {
        self.as_topic().and_then(|t| t.parent_id)
    }
}

fn required(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::validation(format!("'{field}' must not be empty")))
    } else {
        Ok(())
    }
}

fn non_negative(field: &str, value: Option<i64>) -> Result<(), CoreError> {
    match value {
        Some(n) if n < 0 => Err(CoreError::validation(format!(
            "'{field}' must be >= 0, got {n}"
        ))),
        _ => Ok(()),
    }
}

macro_rules! impl_from_payload {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for EntityData {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_payload!(
    Claim,
    Declaration,
    Journal,
    Person,
    Publication,
    Publisher,
    Quotation,
    Topic
);

/// Envelope shared by every record entity: identity, lifecycle status,
/// provenance stamps and the audit log.
///
/// `updated_at` and `updated_by` are both present or both absent. `log` is in
/// chronological order and its first entry is always `CRE`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrackedEntity {
    pub id: i64,
    pub status: StatusKind,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    #[serde(default)]
    pub log: Vec<LogEntry>,
    #[serde(flatten)]
    pub data: EntityData,
}

impl TrackedEntity {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.data.kind()
    }

    /// The most recently appended log entry.
    #[must_use]
    pub fn last_log(&self) -> Option<&LogEntry> {
        self.log.last()
    }
}
