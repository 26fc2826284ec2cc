//! Reactive state for the task list.
//!
//! # Responsibility
//! - Provide the latest-value observable primitive.
//! - Hold the todo snapshot, derive status views and mirror writes to storage.

pub mod observable;
pub mod todo_store;
