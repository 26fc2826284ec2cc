//! Reactive todo store.
//!
//! # Responsibility
//! - Own the in-memory todo list and publish it to observers.
//! - Derive created/done/deleted projections on every emission.
//! - Mirror every effective mutation into the repository.
//!
//! # Invariants
//! - Memory is the owned copy; the repository holds a mirror.
//! - An effective mutation publishes once and then makes exactly one
//!   repository call. No-op paths do neither.
//! - A lookup miss is not an error.
//! - No status transition check happens here; see
//!   `TodoStatus::can_transition_to` for the accepted set.

use crate::model::todo::{is_created, is_deleted, is_done, Todo, TodoId, TodoStatus};
use crate::repo::todo_repo::{RepoError, RepoResult, TodoRepository};
use crate::store::observable::{Subject, SubscriptionId};
use chrono::Utc;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error.
#[derive(Debug)]
pub enum StoreError {
    /// The in-memory change was applied and published, but the repository
    /// failed to record it.
    Persistence(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "failed to persist todo change: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Read-only projection of the todo list by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoView {
    Created,
    Done,
    Deleted,
}

impl TodoView {
    pub const ALL: [TodoView; 3] = [Self::Created, Self::Done, Self::Deleted];

    /// Returns whether `todo` belongs to this view.
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::Created => is_created(todo),
            Self::Done => is_done(todo),
            Self::Deleted => is_deleted(todo),
        }
    }

    /// Filters `todos`, keeping their order.
    pub fn project(self, todos: &[Todo]) -> Vec<Todo> {
        todos
            .iter()
            .filter(|todo| self.matches(todo))
            .cloned()
            .collect()
    }
}

/// In-memory todo list with change notification and storage mirroring.
pub struct TodoStore<R: TodoRepository> {
    repo: R,
    todos: Subject<Vec<Todo>>,
}

impl<R: TodoRepository> TodoStore<R> {
    /// Creates an empty store over `repo`. Call `load_from_db` to hydrate it.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            todos: Subject::new(Vec::new()),
        }
    }

    /// Storage collaborator backing this store.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Full snapshot in insertion order, deleted todos included.
    pub fn todos(&self) -> &[Todo] {
        self.todos.value()
    }

    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos().iter().find(|todo| todo.uuid == id)
    }

    /// Current projection for `view`.
    pub fn view(&self, view: TodoView) -> Vec<Todo> {
        view.project(self.todos())
    }

    /// Observes the full snapshot. The current snapshot is delivered immediately.
    pub fn subscribe(&mut self, mut observer: impl FnMut(&[Todo]) + 'static) -> SubscriptionId {
        self.todos.subscribe(move |todos: &Vec<Todo>| observer(todos))
    }

    /// Observes one projection, recomputed on every emission.
    pub fn subscribe_view(
        &mut self,
        view: TodoView,
        mut observer: impl FnMut(&[Todo]) + 'static,
    ) -> SubscriptionId {
        self.todos.subscribe(move |todos: &Vec<Todo>| {
            let projected = view.project(todos);
            observer(&projected);
        })
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.todos.unsubscribe(id)
    }

    /// Appends a new open todo and asks the repository to insert it.
    ///
    /// Blank text is not rejected here; input validation belongs to the caller.
    pub fn create_todo_from(&mut self, task: impl Into<String>) -> StoreResult<TodoId> {
        let todo = Todo::new(task);
        let id = todo.uuid;

        self.todos.update(|todos| todos.push(todo.clone()));
        self.persist("todo_create", id, |repo| repo.add_todo(&todo))?;
        Ok(id)
    }

    /// Replaces the text of a todo and refreshes `modified_at`.
    ///
    /// Returns `Ok(false)` without side effects when `id` is unknown or the
    /// text is unchanged.
    pub fn edit_task_in_todo(&mut self, id: TodoId, task: &str) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("event=todo_edit module=store status=skipped reason=not_found todo_id={id}");
            return Ok(false);
        };
        if self.todos()[index].task == task {
            debug!("event=todo_edit module=store status=skipped reason=unchanged todo_id={id}");
            return Ok(false);
        }

        let now = Utc::now();
        self.todos.update(|todos| {
            let target = &mut todos[index];
            target.task = task.to_owned();
            target.modified_at = now;
        });

        let edited = self.todos()[index].clone();
        self.persist("todo_edit", id, |repo| repo.edit_task_in_todo(&edited))?;
        Ok(true)
    }

    pub fn mark_todo_as_done(&mut self, id: TodoId) -> StoreResult<bool> {
        self.set_status(id, TodoStatus::Done, |repo, id| repo.mark_todo_as_done(id))
    }

    pub fn mark_todo_as_deleted(&mut self, id: TodoId) -> StoreResult<bool> {
        self.set_status(id, TodoStatus::Deleted, |repo, id| {
            repo.mark_todo_as_deleted(id)
        })
    }

    /// Undo: moves a done or deleted todo back to open.
    pub fn mark_todo_as_created(&mut self, id: TodoId) -> StoreResult<bool> {
        self.set_status(id, TodoStatus::Created, |repo, id| {
            repo.mark_todo_as_created(id)
        })
    }

    /// Replaces the whole snapshot with the repository contents.
    ///
    /// Returns the number of loaded todos.
    pub fn load_from_db(&mut self) -> StoreResult<usize> {
        let todos = self.repo.get_all_todos().map_err(|err| {
            error!("event=todo_load module=store status=error error={err}");
            StoreError::Persistence(err)
        })?;
        let count = todos.len();

        self.todos.next(todos);
        info!("event=todo_load module=store status=ok count={count}");
        Ok(count)
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos().iter().position(|todo| todo.uuid == id)
    }

    fn set_status(
        &mut self,
        id: TodoId,
        status: TodoStatus,
        write: impl FnOnce(&R, TodoId) -> RepoResult<()>,
    ) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            debug!(
                "event=todo_status module=store status=skipped reason=not_found todo_id={id} target={}",
                status.code()
            );
            return Ok(false);
        };

        self.todos.update(|todos| todos[index].status = status);
        self.persist("todo_status", id, |repo| write(repo, id))?;
        Ok(true)
    }

    fn persist(
        &self,
        event: &'static str,
        id: TodoId,
        write: impl FnOnce(&R) -> RepoResult<()>,
    ) -> StoreResult<()> {
        match write(&self.repo) {
            Ok(()) => {
                debug!("event={event} module=store status=ok todo_id={id}");
                Ok(())
            }
            Err(err) => {
                error!("event={event} module=store status=error todo_id={id} error={err}");
                Err(StoreError::Persistence(err))
            }
        }
    }
}
