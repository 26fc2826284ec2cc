use todo_core::db::open_db_in_memory;
use todo_core::{RepoError, SqliteTodoRepository, Todo, TodoRepository, TodoStatus};
use uuid::Uuid;

#[test]
fn add_and_list_roundtrip_preserves_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let todo = Todo::new("buy milk");
    repo.add_todo(&todo).unwrap();

    let loaded = repo.get_all_todos().unwrap();
    assert_eq!(loaded, vec![todo]);
}

#[test]
fn list_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let tasks = ["first", "second", "third"];
    for task in tasks {
        repo.add_todo(&Todo::new(task)).unwrap();
    }

    let loaded: Vec<String> = repo
        .get_all_todos()
        .unwrap()
        .into_iter()
        .map(|todo| todo.task)
        .collect();
    assert_eq!(loaded, tasks);
}

#[test]
fn duplicate_uuid_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let todo = Todo::new("once");
    repo.add_todo(&todo).unwrap();

    let err = repo.add_todo(&todo).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn edit_updates_task_and_modified_at_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let mut todo = Todo::new("draft");
    repo.add_todo(&todo).unwrap();

    todo.task = "final".to_string();
    todo.modified_at = todo.created_at + chrono::Duration::seconds(30);
    todo.status = TodoStatus::Done;
    repo.edit_task_in_todo(&todo).unwrap();

    let loaded = repo.get_all_todos().unwrap().remove(0);
    assert_eq!(loaded.task, "final");
    assert_eq!(loaded.modified_at, todo.modified_at);
    assert_eq!(loaded.created_at, todo.created_at);
    assert_eq!(loaded.status, TodoStatus::Created);
}

#[test]
fn status_updates_apply_by_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let todo = Todo::new("status");
    repo.add_todo(&todo).unwrap();

    repo.mark_todo_as_done(todo.uuid).unwrap();
    assert_eq!(repo.get_all_todos().unwrap()[0].status, TodoStatus::Done);

    repo.mark_todo_as_deleted(todo.uuid).unwrap();
    assert_eq!(repo.get_all_todos().unwrap()[0].status, TodoStatus::Deleted);

    repo.mark_todo_as_created(todo.uuid).unwrap();
    assert_eq!(repo.get_all_todos().unwrap()[0].status, TodoStatus::Created);
}

#[test]
fn updates_on_unknown_uuid_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let missing = Uuid::new_v4();
    assert!(matches!(
        repo.mark_todo_as_done(missing).unwrap_err(),
        RepoError::NotFound(id) if id == missing
    ));

    let ghost = Todo::new("ghost");
    assert!(matches!(
        repo.edit_task_in_todo(&ghost).unwrap_err(),
        RepoError::NotFound(id) if id == ghost.uuid
    ));
}

#[test]
fn legacy_utc_string_timestamps_are_accepted() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todos (uuid, task, status, created_at, modified_at)
         VALUES (?1, 'legacy', 1, 'Wed, 14 Jun 2017 07:00:00 GMT', 'Wed, 14 Jun 2017 07:00:00 GMT');",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();

    let loaded = SqliteTodoRepository::new(&conn).get_all_todos().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].status, TodoStatus::Done);
    assert_eq!(loaded[0].created_at.to_rfc3339(), "2017-06-14T07:00:00+00:00");
}

#[test]
fn invalid_persisted_rows_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todos (uuid, task, status, created_at, modified_at)
         VALUES ('not-a-uuid', 'broken', 0, '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z');",
        [],
    )
    .unwrap();

    let err = SqliteTodoRepository::new(&conn).get_all_todos().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("todos.uuid")));
}

#[test]
fn invalid_timestamp_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todos (uuid, task, status, created_at, modified_at)
         VALUES (?1, 'broken', 0, 'someday', '2025-01-01T00:00:00Z');",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();

    let err = SqliteTodoRepository::new(&conn).get_all_todos().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("todos.created_at")));
}
