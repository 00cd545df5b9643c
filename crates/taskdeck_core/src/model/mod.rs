//! Domain model for tracked tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep wire naming (camelCase, kebab-case status) next to the types.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod task;
