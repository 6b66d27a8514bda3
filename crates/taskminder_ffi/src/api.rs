//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task list, mutation and notification-outbox calls to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + message, never throws.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls are serialized through one process-wide lock, so the store has a
//!   single writer even if Dart calls from more than one isolate.
//! - Timestamps cross the boundary as Unix epoch milliseconds.

use chrono::{DateTime, Utc};
use log::error;
use std::sync::{Mutex, OnceLock, PoisonError};
use taskminder_core::db::open_db;
use taskminder_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, KvTaskRepository, NewTask, NotificationCommand, Priority,
    RecordingNotificationProvider, SqliteKeyValueStore, SystemClock, Task, TaskActions, TaskView,
};

static CONFIG: OnceLock<CoreConfig> = OnceLock::new();
static NOTIFICATIONS: OnceLock<RecordingNotificationProvider> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

type FfiActions<'conn> = TaskActions<
    KvTaskRepository<SqliteKeyValueStore<'conn>>,
    &'static RecordingNotificationProvider,
    SystemClock,
>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Init logging at the level configured by `TASKMINDER_LOG_LEVEL`.
#[flutter_rust_bridge::frb(sync)]
pub fn init_default_logging(log_dir: String) -> String {
    init_logging(config().log_level.to_string(), log_dir)
}

/// Flat task record for Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `low|medium|high`.
    pub priority: String,
    pub due_epoch_ms: i64,
    pub completed: bool,
    pub created_epoch_ms: i64,
    /// Due in the past and still open, evaluated at response time.
    pub overdue: bool,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Affected task ID when known.
    pub task_id: Option<String>,
    /// Whether device alerts were scheduled (create only).
    pub notification_scheduled: bool,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: String) -> Self {
        Self {
            ok: true,
            task_id: Some(task_id),
            notification_scheduled: false,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            notification_scheduled: false,
            message: message.into(),
        }
    }
}

/// One device notification action for Dart to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCommandItem {
    /// `schedule|cancel`.
    pub kind: String,
    pub identifier: String,
    /// Present for `schedule` only.
    pub fire_epoch_ms: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub task_id: Option<String>,
}

/// Creates a task from the add-task form and schedules its alerts.
///
/// `priority` is `low|medium|high`; `due_epoch_ms` is the due instant.
#[flutter_rust_bridge::frb(sync)]
pub fn create_task(
    title: String,
    description: String,
    priority: String,
    due_epoch_ms: i64,
) -> TaskActionResponse {
    let Some(priority) = Priority::parse(&priority) else {
        return TaskActionResponse::failure(format!(
            "create_task failed: unsupported priority `{}`",
            priority.trim()
        ));
    };
    let Some(due_date) = DateTime::<Utc>::from_timestamp_millis(due_epoch_ms) else {
        return TaskActionResponse::failure(format!(
            "create_task failed: due_epoch_ms {due_epoch_ms} is out of range"
        ));
    };
    let request = NewTask {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        priority,
        due_date,
    };

    match with_actions(|actions| actions.create_task(request)) {
        Ok(Ok(created)) => TaskActionResponse {
            notification_scheduled: created.notification.is_scheduled(),
            ..TaskActionResponse::success("Task created.", created.task.id)
        },
        Ok(Err(err)) => TaskActionResponse::failure(format!("create_task failed: {err}")),
        Err(err) => TaskActionResponse::failure(format!("create_task failed: {err}")),
    }
}

/// Lists one view: `today|all|upcoming|completed`.
///
/// `priority_filter` narrows the `all` view and is ignored elsewhere.
#[flutter_rust_bridge::frb(sync)]
pub fn list_tasks(view: String, priority_filter: Option<String>) -> TaskListResponse {
    let Some(view) = TaskView::parse(&view) else {
        return TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("list_tasks failed: unsupported view `{}`", view.trim()),
        };
    };
    let priority = match priority_filter.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => match Priority::parse(raw) {
            Some(priority) => Some(priority),
            None => {
                return TaskListResponse {
                    ok: false,
                    items: Vec::new(),
                    message: format!("list_tasks failed: unsupported priority `{raw}`"),
                };
            }
        },
    };

    let now = Utc::now();
    match with_actions(|actions| actions.store().list_view(view, priority)) {
        Ok(tasks) => {
            let items: Vec<TaskItem> = tasks.iter().map(|task| to_task_item(task, now)).collect();
            let message = if items.is_empty() {
                "No tasks.".to_string()
            } else {
                format!("Found {} task(s).", items.len())
            };
            TaskListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("list_tasks failed: {err}"),
        },
    }
}

/// Marks a task complete and cancels its alerts. Unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn complete_task(task_id: String) -> TaskActionResponse {
    run_action("complete_task", "Task completed.", task_id, |actions, id| {
        actions.complete_task(id)
    })
}

/// Marks a task incomplete. Unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn uncomplete_task(task_id: String) -> TaskActionResponse {
    run_action("uncomplete_task", "Task reopened.", task_id, |actions, id| {
        actions.uncomplete_task(id)
    })
}

/// Swipe-to-complete: flips the stored completion state.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_task_completion(task_id: String) -> TaskActionResponse {
    let id = task_id.trim().to_string();
    let result = with_actions(|actions| match actions.find_task(&id) {
        Some(task) => {
            actions.toggle_completion(&task);
            Ok(if task.completed {
                "Task reopened."
            } else {
                "Task completed."
            })
        }
        None => Err(format!("task not found: {id}")),
    });

    match result {
        Ok(Ok(message)) => TaskActionResponse::success(message, id),
        Ok(Err(err)) | Err(err) => {
            TaskActionResponse::failure(format!("toggle_task_completion failed: {err}"))
        }
    }
}

/// Deletes a task and cancels its alerts. Unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_task(task_id: String) -> TaskActionResponse {
    run_action("delete_task", "Task deleted.", task_id, |actions, id| {
        actions.delete_task(id)
    })
}

/// Records the device permission result so scheduling can proceed.
#[flutter_rust_bridge::frb(sync)]
pub fn set_notification_permission(granted: bool) {
    notifications().set_permission_granted(granted);
}

/// Takes all pending notification commands, oldest first.
///
/// The outbox lives for the whole process and only shrinks here, so the host
/// calls this after every task action.
#[flutter_rust_bridge::frb(sync)]
pub fn drain_notification_commands() -> Vec<NotificationCommandItem> {
    notifications()
        .drain_commands()
        .into_iter()
        .map(to_command_item)
        .collect()
}

fn config() -> &'static CoreConfig {
    CONFIG.get_or_init(CoreConfig::from_env)
}

fn notifications() -> &'static RecordingNotificationProvider {
    NOTIFICATIONS.get_or_init(RecordingNotificationProvider::default)
}

fn with_actions<T>(f: impl FnOnce(&FfiActions<'_>) -> T) -> Result<T, String> {
    let _guard = STORE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db(&config().db_path).map_err(|err| {
        error!("event=ffi_db_open module=ffi status=error error={err}");
        format!("task DB open failed: {err}")
    })?;
    let actions = TaskActions::new(
        KvTaskRepository::new(SqliteKeyValueStore::new(&conn)),
        notifications(),
        SystemClock,
    );
    Ok(f(&actions))
}

fn run_action(
    name: &str,
    message: &str,
    task_id: String,
    f: impl FnOnce(&FfiActions<'_>, &str),
) -> TaskActionResponse {
    let id = task_id.trim().to_string();
    if id.is_empty() {
        return TaskActionResponse::failure(format!("{name} failed: task_id cannot be empty"));
    }
    match with_actions(|actions| f(actions, &id)) {
        Ok(()) => TaskActionResponse::success(message, id),
        Err(err) => TaskActionResponse::failure(format!("{name} failed: {err}")),
    }
}

fn to_task_item(task: &Task, now: DateTime<Utc>) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        priority: task.priority.as_str().to_string(),
        due_epoch_ms: task.due_date.timestamp_millis(),
        completed: task.completed,
        created_epoch_ms: task.created_at.timestamp_millis(),
        overdue: task.is_overdue(now),
    }
}

fn to_command_item(command: NotificationCommand) -> NotificationCommandItem {
    match command {
        NotificationCommand::Schedule(alert) => NotificationCommandItem {
            kind: "schedule".to_string(),
            identifier: alert.identifier,
            fire_epoch_ms: Some(alert.fire_at.timestamp_millis()),
            title: Some(alert.payload.title),
            body: Some(alert.payload.body),
            task_id: Some(alert.payload.task_id),
        },
        NotificationCommand::Cancel { identifier } => NotificationCommandItem {
            kind: "cancel".to_string(),
            identifier,
            fire_epoch_ms: None,
            title: None,
            body: None,
            task_id: None,
        },
    }
}
