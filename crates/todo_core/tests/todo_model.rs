use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use todo_core::{
    is_created, is_deleted, is_done, serialize_todo_status, InvalidTodoStatus, Todo, TodoStatus,
};
use uuid::Uuid;

#[test]
fn todo_new_sets_defaults() {
    let todo = Todo::new("buy milk");

    assert!(!todo.uuid.is_nil());
    assert_eq!(todo.task, "buy milk");
    assert_eq!(todo.status, TodoStatus::Created);
    assert_eq!(todo.created_at, todo.modified_at);
    assert!(todo.is_editable());
}

#[test]
fn predicates_match_exactly_one_status() {
    let mut todo = Todo::new("water plants");

    for status in [TodoStatus::Created, TodoStatus::Done, TodoStatus::Deleted] {
        todo.status = status;
        let hits = [is_created(&todo), is_done(&todo), is_deleted(&todo)]
            .into_iter()
            .filter(|hit| *hit)
            .count();
        assert_eq!(hits, 1, "status {status:?}");
    }

    todo.status = TodoStatus::Done;
    assert!(!todo.is_editable());
}

#[test]
fn status_labels_are_distinct_and_non_empty() {
    let labels: HashSet<&str> = [TodoStatus::Created, TodoStatus::Done, TodoStatus::Deleted]
        .into_iter()
        .map(serialize_todo_status)
        .collect();

    assert_eq!(labels.len(), 3);
    assert!(labels.iter().all(|label| !label.is_empty()));
}

#[test]
fn status_codes_are_stable() {
    assert_eq!(TodoStatus::Created.code(), 0);
    assert_eq!(TodoStatus::Done.code(), 1);
    assert_eq!(TodoStatus::Deleted.code(), 2);
    assert_eq!(TodoStatus::try_from(1), Ok(TodoStatus::Done));
    assert_eq!(TodoStatus::try_from(3), Err(InvalidTodoStatus(3)));
}

#[test]
fn accepted_transitions_include_undo() {
    use TodoStatus::{Created, Deleted, Done};

    assert!(Created.can_transition_to(Done));
    assert!(Created.can_transition_to(Deleted));
    assert!(Done.can_transition_to(Deleted));
    assert!(Done.can_transition_to(Created));
    assert!(Deleted.can_transition_to(Created));

    assert!(!Deleted.can_transition_to(Done));
    assert!(!Created.can_transition_to(Created));
}

#[test]
fn todo_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let mut todo = Todo::with_id(id, "ship release", now);
    todo.status = TodoStatus::Done;

    let json = serde_json::to_value(&todo).unwrap();
    assert_eq!(json["uuid"], id.to_string());
    assert_eq!(json["task"], "ship release");
    assert_eq!(json["status"], 1);
    assert_eq!(json["createdAt"], "2025-01-02T03:04:05Z");
    assert_eq!(json["modifiedAt"], "2025-01-02T03:04:05Z");

    let decoded: Todo = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, todo);
}

#[test]
fn deserialize_rejects_unknown_status_code() {
    let value = serde_json::json!({
        "task": "bad",
        "status": 7,
        "createdAt": "2025-01-02T03:04:05Z",
        "modifiedAt": "2025-01-02T03:04:05Z",
        "uuid": "11111111-2222-4333-8444-555555555555"
    });

    let err = serde_json::from_value::<Todo>(value).unwrap_err();
    assert!(
        err.to_string().contains("invalid todo status code `7`"),
        "unexpected error: {err}"
    );
}
