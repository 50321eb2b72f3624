//! # ev-core
//!
//! Core types, entity kind registry, query kernel, and error types for the
//! evidence store.
//!
//! This crate provides the foundational types shared across all `ev-*` crates:
//! - Entity structs for every record kind plus the `EntityLink` / `TopicRef` edges
//! - Status enums with the lifecycle state machine
//! - The entity kind registry (field accessors, searchable fields, link adjacency)
//! - Query value objects and the sort/paginate kernel
//! - Cross-cutting error types and the caller identity

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod query;
pub mod registry;
