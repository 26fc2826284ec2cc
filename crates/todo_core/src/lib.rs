//! Core task-list logic: todo model, SQLite mirror and reactive store.
//! View layers compose a `TodoStore` and react to its snapshots.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{
    is_created, is_deleted, is_done, parse_utc, serialize_todo_status, serialize_utc,
    InvalidTodoStatus, Todo, TodoId, TodoStatus,
};
pub use repo::todo_repo::{RepoError, RepoResult, SqliteTodoRepository, TodoRepository};
pub use store::observable::{Subject, SubscriptionId};
pub use store::todo_store::{StoreError, StoreResult, TodoStore, TodoView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
