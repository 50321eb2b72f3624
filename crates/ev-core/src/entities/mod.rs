//! Entity structs for all evidence domain objects.
//!
//! Record kinds (claims, declarations, journals, persons, publications,
//! publishers, quotations, topics) share the `TrackedEntity` envelope and
//! carry their kind-specific fields in `EntityData`. Edges (`EntityLink`,
//! `TopicRef`) and `LogEntry` live alongside. All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema`.

mod claim;
mod declaration;
mod entity_ref;
mod journal;
mod link;
mod log;
mod person;
mod publication;
mod publisher;
mod quotation;
mod topic;
mod topic_ref;
mod tracked;

pub use claim::Claim;
pub use declaration::Declaration;
pub use entity_ref::EntityRef;
pub use journal::Journal;
pub use link::{EntityLink, NewLink};
pub use log::LogEntry;
pub use person::Person;
pub use publication::Publication;
pub use publisher::Publisher;
pub use quotation::Quotation;
pub use topic::Topic;
pub use topic_ref::{NewTopicRef, TopicRef};
pub use tracked::{EntityData, TrackedEntity};
