//! Task user flows spanning the store and the notification scheduler.
//!
//! # Responsibility
//! - Create: validate, persist, then schedule alerts.
//! - Complete/uncomplete toggle and delete, cancelling alerts as needed.
//!
//! # Invariants
//! - Persistence always happens before any notification call, and a
//!   notification failure never undoes or blocks it.
//! - Uncompleting a task does not reschedule its alerts.

use crate::clock::Clock;
use crate::model::task::{Priority, Task, TaskValidationError};
use crate::notify::{NotificationProvider, NotificationScheduler, ScheduleOutcome};
use crate::repo::task_repo::TaskRepository;
use crate::service::task_store::TaskStore;
use chrono::{DateTime, Utc};
use log::info;

/// Input for the add-task flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    /// Empty string when no description was entered.
    pub description: String,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
}

/// Result of the add-task flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub task: Task,
    pub notification: ScheduleOutcome,
}

/// Store + scheduler pair driven by user actions.
pub struct TaskActions<R, P, C>
where
    R: TaskRepository,
    P: NotificationProvider,
    C: Clock + Clone,
{
    store: TaskStore<R, C>,
    scheduler: NotificationScheduler<P, C>,
}

impl<R, P, C> TaskActions<R, P, C>
where
    R: TaskRepository,
    P: NotificationProvider,
    C: Clock + Clone,
{
    pub fn new(repo: R, provider: P, clock: C) -> Self {
        Self {
            store: TaskStore::new(repo, clock.clone()),
            scheduler: NotificationScheduler::new(provider, clock),
        }
    }

    pub fn store(&self) -> &TaskStore<R, C> {
        &self.store
    }

    pub fn scheduler(&self) -> &NotificationScheduler<P, C> {
        &self.scheduler
    }

    /// Validates and persists a new task, then schedules its alerts.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank; nothing is persisted.
    pub fn create_task(&self, request: NewTask) -> Result<CreatedTask, TaskValidationError> {
        let task = Task::new(
            request.title,
            request.priority,
            request.due_date,
            self.store.clock().now_utc(),
        )
        .with_description(request.description);
        task.validate()?;

        self.store.save_task(&task);
        let notification = self.scheduler.schedule_task_notification(&task);
        info!(
            "event=task_create module=actions status=ok task_id={} priority={} notified={}",
            task.id,
            task.priority.as_str(),
            notification.is_scheduled()
        );

        Ok(CreatedTask { task, notification })
    }

    /// Flips completion; completing also cancels the task's alerts.
    pub fn toggle_completion(&self, task: &Task) {
        if task.completed {
            self.store.uncomplete_task(&task.id);
        } else {
            self.complete_task(&task.id);
        }
    }

    pub fn complete_task(&self, id: &str) {
        self.store.complete_task(id);
        self.scheduler.cancel_task_notification(id);
    }

    pub fn uncomplete_task(&self, id: &str) {
        self.store.uncomplete_task(id);
    }

    /// Deletes the task and cancels its alerts.
    pub fn delete_task(&self, id: &str) {
        self.store.delete_task(id);
        self.scheduler.cancel_task_notification(id);
    }

    /// Looks up one task by id in a fresh read of the collection.
    pub fn find_task(&self, id: &str) -> Option<Task> {
        self.store
            .get_all_tasks()
            .into_iter()
            .find(|task| task.id == id)
    }
}
