//! Repository implementations on `EvService`.
//!
//! Each module adds an `impl EvService` block for one concern.

pub mod audit;
pub mod entity;
pub mod graph;
pub mod link;
pub mod query;
pub mod topic;
pub mod topic_ref;
