//! Todo domain model.
//!
//! # Responsibility
//! - Define the task record and its tri-state status.
//! - Provide pure status predicates and display helpers.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another todo.
//! - `status` is the only source of truth for lifecycle state; a deleted todo
//!   is still a record, not an absence.
//! - `modified_at` moves only when `task` changes.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a todo; the only lookup key.
pub type TodoId = Uuid;

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifecycle state of a todo.
///
/// Persisted and serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum TodoStatus {
    /// Open task.
    Created = 0,
    /// Completed task.
    Done = 1,
    /// Soft-deleted task; the record is kept.
    Deleted = 2,
}

impl TodoStatus {
    /// Returns the stable integer code used by storage and wire formats.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Reports whether moving from `self` to `next` is an accepted transition.
    ///
    /// Accepted:
    /// - `created -> done`, `created -> deleted`, `done -> deleted`
    /// - `done -> created`, `deleted -> created` (undo)
    ///
    /// The store does not consult this; callers that want to gate actions do.
    pub fn can_transition_to(self, next: TodoStatus) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Done)
                | (Self::Created, Self::Deleted)
                | (Self::Done, Self::Deleted)
                | (Self::Done, Self::Created)
                | (Self::Deleted, Self::Created)
        )
    }
}

impl From<TodoStatus> for u8 {
    fn from(value: TodoStatus) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for TodoStatus {
    type Error = InvalidTodoStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Created),
            1 => Ok(Self::Done),
            2 => Ok(Self::Deleted),
            other => Err(InvalidTodoStatus(other)),
        }
    }
}

/// Unknown integer status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTodoStatus(pub u8);

impl Display for InvalidTodoStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid todo status code `{}`; expected 0|1|2", self.0)
    }
}

impl Error for InvalidTodoStatus {}

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Task text.
    pub task: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    /// Refreshed on text edits only.
    pub modified_at: DateTime<Utc>,
    pub uuid: TodoId,
}

impl Todo {
    /// Creates a new open todo with a generated ID, stamped with the current time.
    pub fn new(task: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), task, Utc::now())
    }

    /// Creates a new open todo with caller-provided identity and timestamp.
    ///
    /// Both timestamps are set to `now`.
    pub fn with_id(uuid: TodoId, task: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            task: task.into(),
            status: TodoStatus::Created,
            created_at: now,
            modified_at: now,
            uuid,
        }
    }

    pub fn is_created(&self) -> bool {
        self.status == TodoStatus::Created
    }

    pub fn is_done(&self) -> bool {
        self.status == TodoStatus::Done
    }

    pub fn is_deleted(&self) -> bool {
        self.status == TodoStatus::Deleted
    }

    /// Text edits are meant for open todos only.
    pub fn is_editable(&self) -> bool {
        self.is_created()
    }
}

/// Returns whether the todo is open.
pub fn is_created(todo: &Todo) -> bool {
    todo.is_created()
}

/// Returns whether the todo is completed.
pub fn is_done(todo: &Todo) -> bool {
    todo.is_done()
}

/// Returns whether the todo is soft-deleted.
pub fn is_deleted(todo: &Todo) -> bool {
    todo.is_deleted()
}

/// Maps a status to its display label.
pub fn serialize_todo_status(status: TodoStatus) -> &'static str {
    match status {
        TodoStatus::Created => "Created",
        TodoStatus::Done => "Done",
        TodoStatus::Deleted => "Deleted",
    }
}

/// Formats a UTC timestamp for display in the local time zone.
pub fn serialize_utc(utc: DateTime<Utc>) -> String {
    format_in_zone(utc, &Local)
}

/// Parses a UTC timestamp in RFC 3339 or RFC 2822 form.
///
/// RFC 2822 covers the `Tue, 15 Nov 1994 08:12:31 GMT` shape.
pub fn parse_utc(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
        .map(|parsed| parsed.with_timezone(&Utc))
}

fn format_in_zone<Tz>(utc: DateTime<Utc>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    utc.with_timezone(zone)
        .format(DISPLAY_TIME_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_in_zone, parse_utc};
    use chrono::{FixedOffset, TimeZone, Utc};

    #[test]
    fn format_in_zone_applies_offset() {
        let utc = Utc.with_ymd_and_hms(2025, 3, 1, 23, 30, 0).unwrap();
        assert_eq!(format_in_zone(utc, &Utc), "2025-03-01 23:30:00");

        let east8 = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(format_in_zone(utc, &east8), "2025-03-02 07:30:00");
    }

    #[test]
    fn parse_utc_accepts_rfc3339_and_rfc2822() {
        let expected = Utc.with_ymd_and_hms(2017, 6, 14, 7, 0, 0).unwrap();

        assert_eq!(parse_utc("2017-06-14T07:00:00Z").unwrap(), expected);
        assert_eq!(parse_utc("2017-06-14T09:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_utc("Wed, 14 Jun 2017 07:00:00 GMT").unwrap(), expected);
    }

    #[test]
    fn parse_utc_rejects_garbage() {
        assert!(parse_utc("yesterday").is_err());
    }
}
