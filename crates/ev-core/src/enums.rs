//! Status, transaction, entity-kind, authority and ordering enums.
//!
//! Wire codes are the short upper-case tags (`DRA`, `CRE`, `CLA`, ...) stored in
//! the database and exchanged with callers. Each enum also exposes a stable
//! human-readable `label()`. `StatusKind` carries the lifecycle state machine
//! via `allowed_next_states()`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// StatusKind
// ---------------------------------------------------------------------------

/// Lifecycle status of every tracked entity.
///
/// ```text
/// DRA → PUB ⇄ SUS
/// DRA → SUS
/// DRA | PUB | SUS → DEL   (terminal)
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum StatusKind {
    #[serde(rename = "DRA")]
    Draft,
    #[serde(rename = "PUB")]
    Published,
    #[serde(rename = "SUS")]
    Suspended,
    #[serde(rename = "DEL")]
    Deleted,
}

impl StatusKind {
    pub const ALL: [Self; 4] = [
        Self::Draft,
        Self::Published,
        Self::Suspended,
        Self::Deleted,
    ];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Published, Self::Suspended, Self::Deleted],
            Self::Published => &[Self::Suspended, Self::Deleted],
            Self::Suspended => &[Self::Published, Self::Deleted],
            Self::Deleted => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// `DEL` admits no further transitions or mutations.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Deleted)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRA",
            Self::Published => "PUB",
            Self::Suspended => "SUS",
            Self::Deleted => "DEL",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Suspended => "Suspended",
            Self::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

/// Action recorded by a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TransactionKind {
    #[serde(rename = "CRE")]
    Created,
    #[serde(rename = "UPD")]
    Updated,
    #[serde(rename = "DEL")]
    Deleted,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CRE",
            Self::Updated => "UPD",
            Self::Deleted => "DEL",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Kind tag for every entity the store knows about.
///
/// The first eight are record kinds held in the entity table; `EntityLink`
/// and `TopicRef` are edge kinds that appear in the audit log and in link
/// listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum EntityKind {
    #[serde(rename = "CLA")]
    Claim,
    #[serde(rename = "DEC")]
    Declaration,
    #[serde(rename = "JOU")]
    Journal,
    #[serde(rename = "PER")]
    Person,
    #[serde(rename = "PUB")]
    Publication,
    #[serde(rename = "PBR")]
    Publisher,
    #[serde(rename = "QUO")]
    Quotation,
    #[serde(rename = "TOP")]
    Topic,
    #[serde(rename = "LNK")]
    EntityLink,
    #[serde(rename = "TRF")]
    TopicRef,
}

impl EntityKind {
    /// Kinds stored as tracked records (everything except the edge kinds).
    pub const RECORD_KINDS: [Self; 8] = [
        Self::Claim,
        Self::Declaration,
        Self::Journal,
        Self::Person,
        Self::Publication,
        Self::Publisher,
        Self::Quotation,
        Self::Topic,
    ];

    #[must_use]
    pub const fn is_record(self) -> bool {
        !matches!(self, Self::EntityLink | Self::TopicRef)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claim => "CLA",
            Self::Declaration => "DEC",
            Self::Journal => "JOU",
            Self::Person => "PER",
            Self::Publication => "PUB",
            Self::Publisher => "PBR",
            Self::Quotation => "QUO",
            Self::Topic => "TOP",
            Self::EntityLink => "LNK",
            Self::TopicRef => "TRF",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Claim => "Claim",
            Self::Declaration => "Declaration",
            Self::Journal => "Journal",
            Self::Person => "Person",
            Self::Publication => "Publication",
            Self::Publisher => "Publisher",
            Self::Quotation => "Quotation",
            Self::Topic => "Topic",
            Self::EntityLink => "Entity link",
            Self::TopicRef => "Topic reference",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Authority
// ---------------------------------------------------------------------------

/// Privilege carried by an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Authority {
    #[serde(rename = "REA")]
    Read,
    #[serde(rename = "CRE")]
    Create,
    #[serde(rename = "UPD")]
    Update,
    #[serde(rename = "DEL")]
    Delete,
    #[serde(rename = "LNK")]
    Link,
    #[serde(rename = "ADM")]
    Admin,
}

impl Authority {
    /// Whether holding `self` satisfies a requirement for `required`.
    #[must_use]
    pub fn grants(self, required: Self) -> bool {
        self == Self::Admin || self == required
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "REA",
            Self::Create => "CRE",
            Self::Update => "UPD",
            Self::Delete => "DEL",
            Self::Link => "LNK",
            Self::Admin => "ADM",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DeclarationKind
// ---------------------------------------------------------------------------

/// Form of a public declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DeclarationKind {
    #[serde(rename = "DECL")]
    Declaration,
    #[serde(rename = "OPLE")]
    OpenLetter,
    #[serde(rename = "PETN")]
    Petition,
}

impl DeclarationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Declaration => "DECL",
            Self::OpenLetter => "OPLE",
            Self::Petition => "PETN",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PublicationKind
// ---------------------------------------------------------------------------

/// RIS-style publication type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PublicationKind {
    #[serde(rename = "JOUR")]
    JournalArticle,
    #[serde(rename = "BOOK")]
    Book,
    #[serde(rename = "CHAP")]
    BookChapter,
    #[serde(rename = "RPRT")]
    Report,
    #[serde(rename = "THES")]
    Thesis,
    #[serde(rename = "ELEC")]
    WebPage,
    #[serde(rename = "GEN")]
    Generic,
}

impl PublicationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JournalArticle => "JOUR",
            Self::Book => "BOOK",
            Self::BookChapter => "CHAP",
            Self::Report => "RPRT",
            Self::Thesis => "THES",
            Self::WebPage => "ELEC",
            Self::Generic => "GEN",
        }
    }
}

impl fmt::Display for PublicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Direction / NullHandling
// ---------------------------------------------------------------------------

/// Sort direction of a single order key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Placement of null values for a single order key.
///
/// `Native` treats null as the smallest value, so nulls lead under `ASC` and
/// trail under `DESC`. The explicit variants pin nulls regardless of direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NullHandling {
    #[default]
    Native,
    NullsFirst,
    NullsLast,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
