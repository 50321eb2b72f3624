//! Query value objects and the storage-independent query kernel.
//!
//! `FilterSpec`, `SortSpec` and `PageSpec` arrive from callers; `Page<T>` goes
//! back. The kernel (`SortPlan`, `paginate`) operates on already-loaded rows,
//! so the same ordering and windowing rules apply to record entities, links
//! and topic references.

mod page;
mod sort;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Direction, EntityKind, NullHandling, StatusKind};
use crate::errors::CoreError;

pub use page::{Page, PageSpec, paginate};
pub use sort::SortPlan;

// ---------------------------------------------------------------------------
// FilterSpec
// ---------------------------------------------------------------------------

/// Conjunctive filter over one listing.
///
/// Absent dimensions do not constrain. An absent (or empty) `status` set means
/// "everything except `DEL`".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<StatusKind>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_entity_kind: Option<EntityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_entity_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_entity_kind: Option<EntityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_entity_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_entity_kind: Option<EntityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_entity_id: Option<i64>,
}

impl FilterSpec {
    #[must_use]
    pub fn with_status(mut self, status: impl Into<Vec<StatusKind>>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub const fn with_topic(mut self, topic_id: i64, recursive: bool) -> Self {
        self.topic_id = Some(topic_id);
        self.recursive = Some(recursive);
        self
    }

    #[must_use]
    pub const fn with_master(mut self, kind: EntityKind, id: i64) -> Self {
        self.master_entity_kind = Some(kind);
        self.master_entity_id = Some(id);
        self
    }

    #[must_use]
    pub const fn with_from(mut self, kind: Option<EntityKind>, id: Option<i64>) -> Self {
        self.from_entity_kind = kind;
        self.from_entity_id = id;
        self
    }

    #[must_use]
    pub const fn with_to(mut self, kind: Option<EntityKind>, id: Option<i64>) -> Self {
        self.to_entity_kind = kind;
        self.to_entity_id = id;
        self
    }

    /// Statuses a row must carry to pass. Defaults to every non-`DEL` status.
    #[must_use]
    pub fn effective_statuses(&self) -> Vec<StatusKind> {
        match &self.status {
            Some(set) if !set.is_empty() => {
                let mut set = set.clone();
                set.sort();
                set.dedup();
                set
            }
            _ => StatusKind::ALL
                .into_iter()
                .filter(|s| *s != StatusKind::Deleted)
                .collect(),
        }
    }

    /// Lower-cased search needle, or `None` when `text` is absent or blank.
    ///
    /// A non-blank needle keeps its surrounding whitespace and matches as a
    /// literal substring.
    #[must_use]
    pub fn text_needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_lowercase)
    }

    /// Whether the topic dimension should include descendant topics.
    #[must_use]
    pub fn is_recursive(&self) -> bool {
        self.recursive.unwrap_or(false)
    }

    /// The master entity anchor, if given.
    #[must_use]
    pub const fn master(&self) -> Option<(EntityKind, i64)> {
        match (self.master_entity_kind, self.master_entity_id) {
            (Some(kind), Some(id)) => Some((kind, id)),
            _ => None,
        }
    }

    fn validate_common(&self) -> Result<(), CoreError> {
        if self.recursive.is_some() && self.topic_id.is_none() {
            return Err(CoreError::validation("'recursive' requires 'topic_id'"));
        }
        if self.master_entity_kind.is_some() != self.master_entity_id.is_some() {
            return Err(CoreError::validation(
                "'master_entity_kind' and 'master_entity_id' must be given together",
            ));
        }
        Ok(())
    }

    const fn has_from(&self) -> bool {
        self.from_entity_kind.is_some() || self.from_entity_id.is_some()
    }

    const fn has_to(&self) -> bool {
        self.to_entity_kind.is_some() || self.to_entity_id.is_some()
    }

    /// Validate for a record-entity listing.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` on an incomplete master anchor, a dangling
    /// `recursive`, or edge-only dimensions.
    pub fn validate_for_records(&self) -> Result<(), CoreError> {
        self.validate_common()?;
        if self.has_from() || self.has_to() {
            return Err(CoreError::validation(
                "'from_*' and 'to_*' filters apply only to link listings",
            ));
        }
        Ok(())
    }

    /// Validate for an `EntityLink` listing.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` when record-only dimensions are present.
    pub fn validate_for_links(&self) -> Result<(), CoreError> {
        if self.text.is_some() || self.topic_id.is_some() || self.recursive.is_some() {
            return Err(CoreError::validation(
                "'text', 'topic_id' and 'recursive' do not apply to link listings",
            ));
        }
        self.validate_common()
    }

    /// Validate for a `TopicRef` listing. `topic_id` selects the topic, `to_*`
    /// selects the referenced entity.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` when a dimension not meaningful for topic
    /// references is present.
    pub fn validate_for_topic_refs(&self) -> Result<(), CoreError> {
        if self.status.is_some() || self.text.is_some() {
            return Err(CoreError::validation(
                "topic references carry no status or text",
            ));
        }
        if self.has_from() || self.master_entity_kind.is_some() || self.master_entity_id.is_some()
        {
            return Err(CoreError::validation(
                "topic reference listings accept only 'topic_id', 'recursive' and 'to_*'",
            ));
        }
        self.validate_common()
    }
}

// ---------------------------------------------------------------------------
// SortSpec
// ---------------------------------------------------------------------------

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OrderSpec {
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_handling: Option<NullHandling>,
}

impl OrderSpec {
    #[must_use]
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: None,
            ignore_case: None,
            null_handling: None,
        }
    }

    #[must_use]
    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            direction: Some(Direction::Desc),
            ..Self::asc(property)
        }
    }

    #[must_use]
    pub const fn ignoring_case(mut self) -> Self {
        self.ignore_case = Some(true);
        self
    }

    #[must_use]
    pub const fn nulls(mut self, handling: NullHandling) -> Self {
        self.null_handling = Some(handling);
        self
    }
}

/// Ordered list of sort keys. Empty means primary-key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SortSpec {
    #[serde(default)]
    pub orders: Vec<OrderSpec>,
}

impl SortSpec {
    #[must_use]
    pub fn by(orders: impl Into<Vec<OrderSpec>>) -> Self {
        Self {
            orders: orders.into(),
        }
    }
}

impl From<OrderSpec> for SortSpec {
    fn from(order: OrderSpec) -> Self {
        Self::by([order])
    }
}
