//! Task store: the single authority over persisted task state.
//!
//! # Responsibility
//! - Provide CRUD and completion toggles over the persisted collection.
//! - Serve the derived list views from a fresh read on every call.
//!
//! # Invariants
//! - Every mutation is a read-modify-write of the whole collection.
//! - Mutations that match no task do not write.
//! - Storage failures are logged and turned into benign defaults; nothing
//!   here returns an error or panics.
//!
//! Two logically concurrent mutations race on the read-modify-write and the
//! later write wins. The store has exactly one in-process caller, so this is
//! left as is.

use crate::clock::Clock;
use crate::model::task::{Priority, Task};
use crate::query::views::{all_tasks_view, completed_tasks, today_tasks, upcoming_tasks, TaskView};
use crate::repo::task_repo::TaskRepository;
use log::{debug, error};

/// Use-case store for tasks, generic over persistence and time.
pub struct TaskStore<R: TaskRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: TaskRepository, C: Clock> TaskStore<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Loads the full collection.
    ///
    /// Returns an empty collection when nothing was stored yet or when the
    /// stored payload cannot be read.
    pub fn get_all_tasks(&self) -> Vec<Task> {
        match self.repo.load_tasks() {
            Ok(tasks) => tasks,
            Err(err) => {
                error!("event=tasks_load module=store status=error error={err}");
                Vec::new()
            }
        }
    }

    /// Appends `task` and persists the collection. Does not deduplicate ids.
    pub fn save_task(&self, task: &Task) {
        self.mutate("task_save", task.id.as_str(), |tasks| {
            tasks.push(task.clone());
            true
        });
    }

    /// Replaces the stored task with the same id; no-op when absent.
    pub fn update_task(&self, task: &Task) {
        self.mutate("task_update", task.id.as_str(), |tasks| {
            match tasks.iter_mut().find(|stored| stored.id == task.id) {
                Some(stored) => {
                    *stored = task.clone();
                    true
                }
                None => false,
            }
        });
    }

    /// Removes the task with `id`; no-op when absent.
    pub fn delete_task(&self, id: &str) {
        self.mutate("task_delete", id, |tasks| {
            let before = tasks.len();
            tasks.retain(|task| task.id != id);
            tasks.len() != before
        });
    }

    pub fn complete_task(&self, id: &str) {
        self.set_completed("task_complete", id, true);
    }

    pub fn uncomplete_task(&self, id: &str) {
        self.set_completed("task_uncomplete", id, false);
    }

    /// Open tasks due today (local calendar day), ascending by due.
    pub fn get_today_tasks(&self) -> Vec<Task> {
        today_tasks(&self.get_all_tasks(), &self.clock)
    }

    /// Open tasks due strictly after now, ascending by due.
    pub fn get_upcoming_tasks(&self) -> Vec<Task> {
        upcoming_tasks(&self.get_all_tasks(), self.clock.now_utc())
    }

    /// Completed tasks, descending by due.
    pub fn get_completed_tasks(&self) -> Vec<Task> {
        completed_tasks(&self.get_all_tasks())
    }

    /// All tasks, open first then by due, optionally one priority only.
    pub fn get_all_tasks_view(&self, priority: Option<Priority>) -> Vec<Task> {
        all_tasks_view(&self.get_all_tasks(), priority)
    }

    /// Dispatches to the view backing one list screen.
    ///
    /// `priority` only narrows `TaskView::All`.
    pub fn list_view(&self, view: TaskView, priority: Option<Priority>) -> Vec<Task> {
        match view {
            TaskView::Today => self.get_today_tasks(),
            TaskView::All => self.get_all_tasks_view(priority),
            TaskView::Upcoming => self.get_upcoming_tasks(),
            TaskView::Completed => self.get_completed_tasks(),
        }
    }

    fn set_completed(&self, event: &'static str, id: &str, completed: bool) {
        self.mutate(event, id, |tasks| {
            match tasks.iter_mut().find(|task| task.id == id) {
                Some(task) => {
                    task.completed = completed;
                    true
                }
                None => false,
            }
        });
    }

    /// Read-modify-write helper. `apply` reports whether anything changed.
    ///
    /// An unreadable collection reads as empty here too, so a corrupt
    /// payload gets replaced by the next successful save.
    fn mutate(&self, event: &'static str, id: &str, apply: impl FnOnce(&mut Vec<Task>) -> bool) {
        let mut tasks = self.get_all_tasks();
        if !apply(&mut tasks) {
            debug!("event={event} module=store status=skip reason=not_found task_id={id}");
            return;
        }

        match self.repo.persist_tasks(&tasks) {
            Ok(()) => debug!(
                "event={event} module=store status=ok task_id={id} count={}",
                tasks.len()
            ),
            Err(err) => error!("event={event} module=store status=error task_id={id} error={err}"),
        }
    }
}
