//! Core use-case services.
//!
//! # Responsibility
//! - Own the task collection and expose its mutation entry points.
//! - Keep callers decoupled from storage details.

pub mod task_store;
