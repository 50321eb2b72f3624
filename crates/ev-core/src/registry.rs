//! Entity Kind Registry.
//!
//! One `EntityDescriptor` per record kind holds everything the query engine
//! and graph manager need to treat kinds uniformly: the display label, the
//! named field accessors (sortable, and optionally searchable) and the table
//! of kinds the record may link to. Adding a kind means adding a descriptor
//! here; nothing downstream branches on `EntityKind`.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{EntityData, EntityLink, TopicRef, TrackedEntity};
use crate::enums::{DeclarationKind, EntityKind, PublicationKind, StatusKind};
use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// A typed value read from an entity field for sorting or text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Lower-case text values; other variants pass through.
    #[must_use]
    pub fn folded(self) -> Self {
        match self {
            Self::Text(s) => Self::Text(s.to_lowercase()),
            other => other,
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Text(_) => 3,
            Self::Date(_) => 4,
            Self::Timestamp(_) => 5,
        }
    }

    /// Total order over non-null values of the same variant. Text compares by
    /// code point. Mismatched variants fall back to a fixed variant rank.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Conversion of entity field types into `FieldValue`.
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl ToFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Int(*self)
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

impl ToFieldValue for NaiveDate {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Date(*self)
    }
}

impl ToFieldValue for DateTime<Utc> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Timestamp(*self)
    }
}

impl ToFieldValue for StatusKind {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.as_str().to_string())
    }
}

impl ToFieldValue for EntityKind {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.as_str().to_string())
    }
}

impl ToFieldValue for DeclarationKind {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.as_str().to_string())
    }
}

impl ToFieldValue for PublicationKind {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.as_str().to_string())
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        self.as_ref().map_or(FieldValue::Null, ToFieldValue::to_field_value)
    }
}

// ---------------------------------------------------------------------------
// FieldDef
// ---------------------------------------------------------------------------

/// A named, typed accessor over `T`.
pub struct FieldDef<T: 'static> {
    pub name: &'static str,
    pub accessor: fn(&T) -> FieldValue,
    /// Participates in free-text filtering.
    pub searchable: bool,
}

impl<T> FieldDef<T> {
    const fn sortable(name: &'static str, accessor: fn(&T) -> FieldValue) -> Self {
        Self {
            name,
            accessor,
            searchable: false,
        }
    }

    const fn searchable(name: &'static str, accessor: fn(&T) -> FieldValue) -> Self {
        Self {
            name,
            accessor,
            searchable: true,
        }
    }

    #[must_use]
    pub fn value(&self, row: &T) -> FieldValue {
        (self.accessor)(row)
    }
}

impl<T> std::fmt::Debug for FieldDef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("searchable", &self.searchable)
            .finish_non_exhaustive()
    }
}

/// Rows the query kernel can order deterministically.
pub trait Keyed {
    /// Primary key; the mandatory final tie-break of every sort.
    fn primary_key(&self) -> i64;
}

impl Keyed for TrackedEntity {
    fn primary_key(&self) -> i64 {
        self.id
    }
}

impl Keyed for EntityLink {
    fn primary_key(&self) -> i64 {
        self.id
    }
}

impl Keyed for TopicRef {
    fn primary_key(&self) -> i64 {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

macro_rules! payload_accessors {
    ($variant:ident { $($fn_name:ident => $field:ident),* $(,)? }) => {
        $(
            fn $fn_name(entity: &TrackedEntity) -> FieldValue {
                match &entity.data {
                    EntityData::$variant(payload) => payload.$field.to_field_value(),
                    _ => FieldValue::Null,
                }
            }
        )*
    };
}

macro_rules! row_accessors {
    ($ty:ty { $($fn_name:ident => $field:ident),* $(,)? }) => {
        $(
            fn $fn_name(row: &$ty) -> FieldValue {
                row.$field.to_field_value()
            }
        )*
    };
}

row_accessors!(TrackedEntity {
    entity_id => id,
    entity_status => status,
    entity_created_at => created_at,
    entity_created_by => created_by,
    entity_updated_at => updated_at,
    entity_updated_by => updated_by,
});

payload_accessors!(Claim {
    claim_date => date,
    claim_text => text,
    claim_notes => notes,
});

payload_accessors!(Declaration {
    declaration_kind => kind,
    declaration_date => date,
    declaration_title => title,
    declaration_country => country,
    declaration_url => url,
    declaration_signatories => signatories,
    declaration_signatory_count => signatory_count,
    declaration_notes => notes,
});

payload_accessors!(Journal {
    journal_title => title,
    journal_abbreviation => abbreviation,
    journal_url => url,
    journal_issn => issn,
    journal_publisher_id => publisher_id,
    journal_notes => notes,
});

payload_accessors!(Person {
    person_title => title,
    person_first_name => first_name,
    person_nickname => nickname,
    person_prefix => prefix,
    person_last_name => last_name,
    person_suffix => suffix,
    person_alias => alias,
    person_notes => notes,
    person_qualifications => qualifications,
    person_country => country,
    person_rating => rating,
    person_checked => checked,
    person_published => published,
});

payload_accessors!(Publication {
    publication_title => title,
    publication_authors => authors,
    publication_journal_id => journal_id,
    publication_kind => kind,
    publication_date => date,
    publication_year => year,
    publication_abstract => abstract_text,
    publication_notes => notes,
    publication_peer_reviewed => peer_reviewed,
    publication_doi => doi,
    publication_isbn => isbn,
    publication_url => url,
    publication_accessed => accessed,
});

payload_accessors!(Publisher {
    publisher_name => name,
    publisher_location => location,
    publisher_country => country,
    publisher_url => url,
    publisher_journal_count => journal_count,
});

payload_accessors!(Quotation {
    quotation_quotee => quotee,
    quotation_text => text,
    quotation_date => date,
    quotation_source => source,
    quotation_url => url,
    quotation_notes => notes,
});

payload_accessors!(Topic {
    topic_label => label,
    topic_description => description,
    topic_parent_id => parent_id,
});

row_accessors!(EntityLink {
    link_id => id,
    link_status => status,
    link_from_entity_kind => from_entity_kind,
    link_from_entity_id => from_entity_id,
    link_to_entity_kind => to_entity_kind,
    link_to_entity_id => to_entity_id,
    link_created_at => created_at,
    link_updated_at => updated_at,
});

row_accessors!(TopicRef {
    topic_ref_id => id,
    topic_ref_topic_id => topic_id,
    topic_ref_entity_kind => entity_kind,
    topic_ref_entity_id => entity_id,
});

// ---------------------------------------------------------------------------
// Field tables
// ---------------------------------------------------------------------------

type EntityField = FieldDef<TrackedEntity>;

/// Fields every record kind exposes.
static COMMON_FIELDS: &[EntityField] = &[
    FieldDef::sortable("id", entity_id),
    FieldDef::sortable("status", entity_status),
    FieldDef::sortable("created_at", entity_created_at),
    FieldDef::sortable("created_by", entity_created_by),
    FieldDef::sortable("updated_at", entity_updated_at),
    FieldDef::sortable("updated_by", entity_updated_by),
];

static CLAIM_FIELDS: &[EntityField] = &[
    FieldDef::sortable("date", claim_date),
    FieldDef::searchable("text", claim_text),
    FieldDef::searchable("notes", claim_notes),
];

static DECLARATION_FIELDS: &[EntityField] = &[
    FieldDef::sortable("kind", declaration_kind),
    FieldDef::sortable("date", declaration_date),
    FieldDef::searchable("title", declaration_title),
    FieldDef::sortable("country", declaration_country),
    FieldDef::sortable("url", declaration_url),
    FieldDef::searchable("signatories", declaration_signatories),
    FieldDef::sortable("signatory_count", declaration_signatory_count),
    FieldDef::searchable("notes", declaration_notes),
];

static JOURNAL_FIELDS: &[EntityField] = &[
    FieldDef::searchable("title", journal_title),
    FieldDef::searchable("abbreviation", journal_abbreviation),
    FieldDef::sortable("url", journal_url),
    FieldDef::searchable("issn", journal_issn),
    FieldDef::sortable("publisher_id", journal_publisher_id),
    FieldDef::searchable("notes", journal_notes),
];

static PERSON_FIELDS: &[EntityField] = &[
    FieldDef::sortable("title", person_title),
    FieldDef::searchable("first_name", person_first_name),
    FieldDef::searchable("nickname", person_nickname),
    FieldDef::sortable("prefix", person_prefix),
    FieldDef::searchable("last_name", person_last_name),
    FieldDef::sortable("suffix", person_suffix),
    FieldDef::searchable("alias", person_alias),
    FieldDef::searchable("notes", person_notes),
    FieldDef::searchable("qualifications", person_qualifications),
    FieldDef::sortable("country", person_country),
    FieldDef::sortable("rating", person_rating),
    FieldDef::sortable("checked", person_checked),
    FieldDef::sortable("published", person_published),
];

static PUBLICATION_FIELDS: &[EntityField] = &[
    FieldDef::searchable("title", publication_title),
    FieldDef::searchable("authors", publication_authors),
    FieldDef::sortable("journal_id", publication_journal_id),
    FieldDef::sortable("kind", publication_kind),
    FieldDef::sortable("date", publication_date),
    FieldDef::sortable("year", publication_year),
    FieldDef::searchable("abstract", publication_abstract),
    FieldDef::searchable("notes", publication_notes),
    FieldDef::sortable("peer_reviewed", publication_peer_reviewed),
    FieldDef::sortable("doi", publication_doi),
    FieldDef::sortable("isbn", publication_isbn),
    FieldDef::sortable("url", publication_url),
    FieldDef::sortable("accessed", publication_accessed),
];

static PUBLISHER_FIELDS: &[EntityField] = &[
    FieldDef::searchable("name", publisher_name),
    FieldDef::searchable("location", publisher_location),
    FieldDef::sortable("country", publisher_country),
    FieldDef::sortable("url", publisher_url),
    FieldDef::sortable("journal_count", publisher_journal_count),
];

static QUOTATION_FIELDS: &[EntityField] = &[
    FieldDef::searchable("quotee", quotation_quotee),
    FieldDef::searchable("text", quotation_text),
    FieldDef::sortable("date", quotation_date),
    FieldDef::searchable("source", quotation_source),
    FieldDef::sortable("url", quotation_url),
    FieldDef::searchable("notes", quotation_notes),
];

static TOPIC_FIELDS: &[EntityField] = &[
    FieldDef::searchable("label", topic_label),
    FieldDef::searchable("description", topic_description),
    FieldDef::sortable("parent_id", topic_parent_id),
];

/// Sortable fields of `EntityLink` listings.
pub static LINK_FIELDS: &[FieldDef<EntityLink>] = &[
    FieldDef::sortable("id", link_id),
    FieldDef::sortable("status", link_status),
    FieldDef::sortable("from_entity_kind", link_from_entity_kind),
    FieldDef::sortable("from_entity_id", link_from_entity_id),
    FieldDef::sortable("to_entity_kind", link_to_entity_kind),
    FieldDef::sortable("to_entity_id", link_to_entity_id),
    FieldDef::sortable("created_at", link_created_at),
    FieldDef::sortable("updated_at", link_updated_at),
];

/// Sortable fields of `TopicRef` listings.
pub static TOPIC_REF_FIELDS: &[FieldDef<TopicRef>] = &[
    FieldDef::sortable("id", topic_ref_id),
    FieldDef::sortable("topic_id", topic_ref_topic_id),
    FieldDef::sortable("entity_kind", topic_ref_entity_kind),
    FieldDef::sortable("entity_id", topic_ref_entity_id),
];

/// Find a field by name in a flat field table.
#[must_use]
pub fn find_field<T>(table: &'static [FieldDef<T>], name: &str) -> Option<&'static FieldDef<T>> {
    table.iter().find(|f| f.name == name)
}

// ---------------------------------------------------------------------------
// Link adjacency
// ---------------------------------------------------------------------------

/// How many active links a `from` entity may hold toward one partner kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ManyToMany,
    /// At most one active link from each `from` entity to this kind.
    ManyToOne,
}

/// A permitted `(from kind → to kind)` pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRule {
    pub to: EntityKind,
    pub cardinality: Cardinality,
}

const fn m2m(to: EntityKind) -> LinkRule {
    LinkRule {
        to,
        cardinality: Cardinality::ManyToMany,
    }
}

const fn m2o(to: EntityKind) -> LinkRule {
    LinkRule {
        to,
        cardinality: Cardinality::ManyToOne,
    }
}

// ---------------------------------------------------------------------------
// EntityDescriptor
// ---------------------------------------------------------------------------

/// Per-kind metadata record.
#[derive(Debug)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    fields: &'static [EntityField],
    links: &'static [LinkRule],
}

static DESCRIPTORS: [EntityDescriptor; 8] = [
    EntityDescriptor {
        kind: EntityKind::Claim,
        fields: CLAIM_FIELDS,
        links: &[
            m2m(EntityKind::Claim),
            m2m(EntityKind::Declaration),
            m2m(EntityKind::Person),
            m2m(EntityKind::Publication),
            m2m(EntityKind::Quotation),
        ],
    },
    EntityDescriptor {
        kind: EntityKind::Declaration,
        fields: DECLARATION_FIELDS,
        links: &[
            m2m(EntityKind::Claim),
            m2m(EntityKind::Person),
            m2m(EntityKind::Publication),
            m2m(EntityKind::Quotation),
        ],
    },
    EntityDescriptor {
        kind: EntityKind::Journal,
        fields: JOURNAL_FIELDS,
        links: &[],
    },
    EntityDescriptor {
        kind: EntityKind::Person,
        fields: PERSON_FIELDS,
        links: &[
            m2m(EntityKind::Claim),
            m2m(EntityKind::Declaration),
            m2m(EntityKind::Publication),
        ],
    },
    EntityDescriptor {
        kind: EntityKind::Publication,
        fields: PUBLICATION_FIELDS,
        links: &[
            m2m(EntityKind::Claim),
            m2m(EntityKind::Declaration),
            m2m(EntityKind::Person),
            m2m(EntityKind::Publication),
            m2m(EntityKind::Quotation),
        ],
    },
    EntityDescriptor {
        kind: EntityKind::Publisher,
        fields: PUBLISHER_FIELDS,
        links: &[],
    },
    EntityDescriptor {
        kind: EntityKind::Quotation,
        fields: QUOTATION_FIELDS,
        links: &[
            m2m(EntityKind::Claim),
            m2m(EntityKind::Declaration),
            m2o(EntityKind::Person),
            m2m(EntityKind::Publication),
        ],
    },
    EntityDescriptor {
        kind: EntityKind::Topic,
        fields: TOPIC_FIELDS,
        links: &[
            m2m(EntityKind::Claim),
            m2m(EntityKind::Declaration),
            m2m(EntityKind::Person),
            m2m(EntityKind::Publication),
            m2m(EntityKind::Quotation),
        ],
    },
];

impl EntityDescriptor {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// Resolve a sortable property, common fields first.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static EntityField> {
        find_field(COMMON_FIELDS, name).or_else(|| find_field(self.fields, name))
    }

    /// Names of every sortable property of this kind.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        COMMON_FIELDS
            .iter()
            .chain(self.fields.iter())
            .map(|f| f.name)
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &'static EntityField> {
        self.fields.iter().filter(|f| f.searchable)
    }

    /// Case-insensitive substring match of an already lower-cased needle
    /// against any searchable field.
    #[must_use]
    pub fn matches_text(&self, entity: &TrackedEntity, needle: &str) -> bool {
        self.searchable_fields().any(|f| {
            f.value(entity)
                .as_text()
                .is_some_and(|s| s.to_lowercase().contains(needle))
        })
    }

    #[must_use]
    pub const fn link_rules(&self) -> &'static [LinkRule] {
        self.links
    }

    #[must_use]
    pub fn link_rule(&self, to: EntityKind) -> Option<&'static LinkRule> {
        self.links.iter().find(|r| r.to == to)
    }

    /// Whether this kind may appear at either end of an `EntityLink`.
    #[must_use]
    pub fn is_linkable(&self) -> bool {
        !self.links.is_empty()
    }
}

/// Descriptor for a record kind; `None` for the edge kinds.
#[must_use]
pub fn descriptor(kind: EntityKind) -> Option<&'static EntityDescriptor> {
    let idx = match kind {
        EntityKind::Claim => 0,
        EntityKind::Declaration => 1,
        EntityKind::Journal => 2,
        EntityKind::Person => 3,
        EntityKind::Publication => 4,
        EntityKind::Publisher => 5,
        EntityKind::Quotation => 6,
        EntityKind::Topic => 7,
        EntityKind::EntityLink | EntityKind::TopicRef => return None,
    };
    Some(&DESCRIPTORS[idx])
}

/// Descriptor for a record kind.
///
/// # Errors
///
/// Returns `CoreError::Validation` for the edge kinds, which have dedicated listings.
pub fn record_descriptor(kind: EntityKind) -> Result<&'static EntityDescriptor, CoreError> {
    descriptor(kind).ok_or_else(|| {
        CoreError::validation(format!(
            "{} is not a record kind; use the dedicated edge listing",
            kind.label()
        ))
    })
}

/// Check a `from → to` pairing against the adjacency table.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the pairing is not permitted.
pub fn link_rule(from: EntityKind, to: EntityKind) -> Result<&'static LinkRule, CoreError> {
    descriptor(from)
        .and_then(|d| d.link_rule(to))
        .ok_or_else(|| {
            CoreError::validation(format!(
                "a {} may not be linked to a {}",
                from.label(),
                to.label()
            ))
        })
}

/// Check that a topic may reference entities of `kind`.
///
/// # Errors
///
/// Returns `CoreError::Validation` if `kind` is not a topic-reference target.
pub fn topic_ref_rule(kind: EntityKind) -> Result<&'static LinkRule, CoreError> {
    link_rule(EntityKind::Topic, kind)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entities::{Claim, Person};

    fn claim(text: &str, notes: Option<&str>) -> TrackedEntity {
        TrackedEntity {
            id: 1,
            status: StatusKind::Draft,
            created_at: Utc::now(),
            created_by: "tester".into(),
            updated_at: None,
            updated_by: None,
            log: Vec::new(),
            data: EntityData::Claim(Claim {
                date: None,
                text: text.into(),
                notes: notes.map(String::from),
            }),
        }
    }

    #[test]
    fn every_record_kind_has_a_descriptor() {
        for kind in EntityKind::RECORD_KINDS {
            let d = descriptor(kind).unwrap();
            assert_eq!(d.kind, kind);
            assert!(d.field("id").is_some());
            assert!(d.field("created_at").is_some());
        }
        assert!(descriptor(EntityKind::EntityLink).is_none());
        assert!(record_descriptor(EntityKind::TopicRef).is_err());
    }

    #[test]
    fn unknown_property_is_absent() {
        let d = descriptor(EntityKind::Claim).unwrap();
        assert!(d.field("text").is_some());
        assert!(d.field("last_name").is_none());
        assert!(d.field("Text").is_none());
    }

    #[test]
    fn field_names_cover_common_and_specific() {
        let names: Vec<_> = descriptor(EntityKind::Claim).unwrap().field_names().collect();
        assert_eq!(
            names,
            vec![
                "id",
                "status",
                "created_at",
                "created_by",
                "updated_at",
                "updated_by",
                "date",
                "text",
                "notes",
            ]
        );
    }

    #[test]
    fn text_match_is_case_insensitive_across_fields() {
        let d = descriptor(EntityKind::Claim).unwrap();
        let e = claim("Global warming is Real", Some("see IPCC"));
        assert!(d.matches_text(&e, "warming"));
        assert!(d.matches_text(&e, "ipcc"));
        assert!(!d.matches_text(&e, "cooling"));
    }

    #[test]
    fn accessor_of_other_kind_reads_null() {
        let d = descriptor(EntityKind::Person).unwrap();
        let field = d.field("last_name").unwrap();
        assert_eq!(field.value(&claim("x", None)), FieldValue::Null);

        let mut person = claim("x", None);
        person.data = EntityData::Person(Person {
            last_name: "Curie".into(),
            ..Person::default()
        });
        assert_eq!(field.value(&person), FieldValue::Text("Curie".into()));
    }

    #[test]
    fn adjacency_rules() {
        assert!(link_rule(EntityKind::Claim, EntityKind::Publication).is_ok());
        assert!(link_rule(EntityKind::Topic, EntityKind::Claim).is_ok());
        assert!(link_rule(EntityKind::Journal, EntityKind::Claim).is_err());
        assert!(link_rule(EntityKind::Claim, EntityKind::Topic).is_err());
        assert!(link_rule(EntityKind::Person, EntityKind::Quotation).is_err());
        assert_eq!(
            link_rule(EntityKind::Quotation, EntityKind::Person)
                .unwrap()
                .cardinality,
            Cardinality::ManyToOne
        );
        assert!(topic_ref_rule(EntityKind::Publisher).is_err());
        assert!(topic_ref_rule(EntityKind::Quotation).is_ok());
    }

    #[test]
    fn same_variant_compares_by_value() {
        assert_eq!(
            FieldValue::Text("a".into()).compare(&FieldValue::Text("B".into())),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Int(2).compare(&FieldValue::Int(10)),
            Ordering::Less
        );
    }

    #[test]
    fn mixed_variants_compare_by_rank() {
        assert_eq!(FieldValue::Null.compare(&FieldValue::Int(-5)), Ordering::Less);
        assert_eq!(FieldValue::Null.compare(&FieldValue::Null), Ordering::Equal);
        assert_eq!(
            FieldValue::Text("0".into()).compare(&FieldValue::Int(9)),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Bool(true).compare(&FieldValue::Date(NaiveDate::MIN)),
            Ordering::Less
        );
    }
}
