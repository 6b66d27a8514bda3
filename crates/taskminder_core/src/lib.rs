//! Core domain logic for the Taskminder to-do app.
//! This crate is the single source of truth for task state and reminders.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod query;
pub mod repo;
pub mod service;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Priority, Task, TaskId, TaskValidationError};
pub use notify::{
    NotificationCommand, NotificationPayload, NotificationProvider, NotificationScheduler,
    NotifyError, NotifyResult, PendingAlert, RecordingNotificationProvider, ScheduleOutcome,
    ScheduledAlerts, SkipReason,
};
pub use query::views::TaskView;
pub use repo::task_repo::{
    KvTaskRepository, RepoError, RepoResult, TaskRepository, TASKS_STORAGE_KEY,
};
pub use service::task_actions::{CreatedTask, NewTask, TaskActions};
pub use service::task_store::TaskStore;
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
