//! Command-line front end for the todo store.
//!
//! # Responsibility
//! - Resolve configuration (db path, logging) from flags and environment.
//! - Compose `TodoStore` over SQLite, hydrate it, apply one command.
//! - Render the affected view as plain text.

use clap::{Parser, Subcommand, ValueEnum};
use log::warn;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use todo_core::db::open_db;
use todo_core::{
    core_version, default_log_level, init_logging, serialize_todo_status, serialize_utc,
    SqliteTodoRepository, Todo, TodoRepository, TodoStore, TodoView,
};
use uuid::Uuid;

const DEFAULT_DB_FILE_NAME: &str = "todos.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "todo", about = "Small task list backed by SQLite")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "TODO_DB_PATH", default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long, env = "TODO_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. File logging is off when unset.
    #[arg(long, env = "TODO_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new todo.
    Add { task: String },
    /// Replace the text of an open todo.
    Edit { id: Uuid, task: String },
    /// Mark a todo as done.
    Done { id: Uuid },
    /// Soft-delete a todo.
    Delete { id: Uuid },
    /// Move a done or deleted todo back to open.
    Undo { id: Uuid },
    /// Show todos, optionally a single view.
    List {
        #[arg(value_enum)]
        view: Option<ViewArg>,
    },
    /// Print the core version.
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Created,
    Done,
    Deleted,
}

impl From<ViewArg> for TodoView {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Created => TodoView::Created,
            ViewArg::Done => TodoView::Done,
            ViewArg::Deleted => TodoView::Deleted,
        }
    }
}

#[derive(Debug)]
enum Outcome {
    Ok,
    Usage(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    let mut stdout = std::io::stdout().lock();
    match run(&cli, &mut stdout) {
        Ok(Outcome::Ok) => ExitCode::SUCCESS,
        Ok(Outcome::Usage(message)) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<Outcome, Box<dyn Error>> {
    if matches!(cli.command, Command::Version) {
        writeln!(out, "todo_core version={}", core_version())?;
        return Ok(Outcome::Ok);
    }

    let conn = open_db(&cli.db)?;
    let mut store = TodoStore::new(SqliteTodoRepository::new(&conn));
    store.load_from_db()?;

    let changed = match &cli.command {
        Command::Add { task } => {
            if task.trim().is_empty() {
                return Ok(Outcome::Usage("task text cannot be empty".to_string()));
            }
            let id = store.create_todo_from(task.as_str())?;
            writeln!(out, "added {id}")?;
            Some(TodoView::Created)
        }
        Command::Edit { id, task } => {
            if task.trim().is_empty() {
                return Ok(Outcome::Usage("task text cannot be empty".to_string()));
            }
            if store.find(*id).is_some_and(|todo| !todo.is_editable()) {
                warn!("event=todo_edit module=cli status=warn reason=not_open todo_id={id}");
            }
            report(out, *id, store.edit_task_in_todo(*id, task)?)?;
            store.find(*id).map(view_of)
        }
        Command::Done { id } => {
            report(out, *id, store.mark_todo_as_done(*id)?)?;
            Some(TodoView::Done)
        }
        Command::Delete { id } => {
            report(out, *id, store.mark_todo_as_deleted(*id)?)?;
            Some(TodoView::Deleted)
        }
        Command::Undo { id } => {
            report(out, *id, store.mark_todo_as_created(*id)?)?;
            Some(TodoView::Created)
        }
        Command::List { view } => {
            match view {
                Some(view) => render_view(out, &store, (*view).into())?,
                None => {
                    for view in TodoView::ALL {
                        render_view(out, &store, view)?;
                    }
                }
            }
            None
        }
        Command::Version => None,
    };

    if let Some(view) = changed {
        render_view(out, &store, view)?;
    }
    Ok(Outcome::Ok)
}

fn report(out: &mut impl Write, id: Uuid, changed: bool) -> std::io::Result<()> {
    if changed {
        writeln!(out, "updated {id}")
    } else {
        writeln!(out, "no change for {id}")
    }
}

fn view_of(todo: &Todo) -> TodoView {
    TodoView::ALL
        .into_iter()
        .find(|view| view.matches(todo))
        .unwrap_or(TodoView::Created)
}

fn render_view<R: TodoRepository>(
    out: &mut impl Write,
    store: &TodoStore<R>,
    view: TodoView,
) -> std::io::Result<()> {
    let todos = store.view(view);
    let label = match view {
        TodoView::Created => "Open",
        TodoView::Done => "Done",
        TodoView::Deleted => "Deleted",
    };
    writeln!(out, "== {label} ({})", todos.len())?;
    for (index, todo) in todos.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. [{}] {}  ({}, modified {})  {}",
            index + 1,
            serialize_todo_status(todo.status),
            todo.task,
            serialize_utc(todo.created_at),
            serialize_utc(todo.modified_at),
            todo.uuid
        )?;
    }
    Ok(())
}
