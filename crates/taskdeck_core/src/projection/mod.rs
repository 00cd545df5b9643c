//! Read-only projections over the task collection.
//!
//! # Responsibility
//! - Derive filtered lists, counts, completion series and calendar grids.
//!
//! # Invariants
//! - Every function is pure over `&[Task]` plus parameters; nothing here
//!   mutates or caches task state.

pub mod calendar;
pub mod filter;
pub mod series;
pub mod stats;
