//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical todo record shared by store, storage and views.
//!
//! # Invariants
//! - Every todo is identified by a stable `TodoId`.
//! - Deletion is a status value, not a removal.

pub mod todo;
