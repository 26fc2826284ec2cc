//! Todo persistence contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the storage surface the store mirrors its changes into.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `get_all_todos` returns rows in insertion order.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Updates addressed to an unknown uuid return `NotFound`.

use crate::db::DbError;
use crate::model::todo::{parse_utc, Todo, TodoId, TodoStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT
    uuid,
    task,
    status,
    created_at,
    modified_at
FROM todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(TodoId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage collaborator mirrored by `TodoStore`.
pub trait TodoRepository {
    /// Inserts a new record.
    fn add_todo(&self, todo: &Todo) -> RepoResult<()>;
    /// Persists `task` and `modified_at` of an existing record.
    fn edit_task_in_todo(&self, todo: &Todo) -> RepoResult<()>;
    fn mark_todo_as_created(&self, id: TodoId) -> RepoResult<()>;
    fn mark_todo_as_done(&self, id: TodoId) -> RepoResult<()>;
    fn mark_todo_as_deleted(&self, id: TodoId) -> RepoResult<()>;
    /// Returns every record, deleted ones included, in insertion order.
    fn get_all_todos(&self) -> RepoResult<Vec<Todo>>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn set_status(&self, id: TodoId, status: TodoStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE todos SET status = ?1 WHERE uuid = ?2;",
            params![status.code(), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn add_todo(&self, todo: &Todo) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO todos (
                uuid,
                task,
                status,
                created_at,
                modified_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                todo.uuid.to_string(),
                todo.task.as_str(),
                todo.status.code(),
                timestamp_to_db(todo.created_at),
                timestamp_to_db(todo.modified_at),
            ],
        )?;

        Ok(())
    }

    fn edit_task_in_todo(&self, todo: &Todo) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                task = ?1,
                modified_at = ?2
             WHERE uuid = ?3;",
            params![
                todo.task.as_str(),
                timestamp_to_db(todo.modified_at),
                todo.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(todo.uuid));
        }

        Ok(())
    }

    fn mark_todo_as_created(&self, id: TodoId) -> RepoResult<()> {
        self.set_status(id, TodoStatus::Created)
    }

    fn mark_todo_as_done(&self, id: TodoId) -> RepoResult<()> {
        self.set_status(id, TodoStatus::Done)
    }

    fn mark_todo_as_deleted(&self, id: TodoId) -> RepoResult<()> {
        self.set_status(id, TodoStatus::Deleted)
    }

    fn get_all_todos(&self) -> RepoResult<Vec<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} ORDER BY seq ASC"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in todos.uuid"))
    })?;

    let status_code: i64 = row.get("status")?;
    let status = u8::try_from(status_code)
        .ok()
        .and_then(|code| TodoStatus::try_from(code).ok())
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid status `{status_code}` in todos.status"
            ))
        })?;

    Ok(Todo {
        task: row.get("task")?,
        status,
        created_at: parse_timestamp(row, "created_at")?,
        modified_at: parse_timestamp(row, "modified_at")?,
        uuid,
    })
}

fn parse_timestamp(row: &Row<'_>, column: &str) -> RepoResult<DateTime<Utc>> {
    let text: String = row.get(column)?;
    parse_utc(&text).map_err(|err| {
        RepoError::InvalidData(format!("invalid timestamp `{text}` in todos.{column}: {err}"))
    })
}

fn timestamp_to_db(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
