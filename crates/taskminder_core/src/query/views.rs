//! Pure view functions: filter + stable sort over a task slice.

use crate::clock::Clock;
use crate::model::task::{Priority, Task};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// List screens backed by a derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskView {
    /// Open tasks due on the current local calendar day.
    Today,
    /// Every task, open first, optionally filtered by priority.
    All,
    /// Open tasks strictly in the future.
    Upcoming,
    /// Completed tasks, latest due first.
    Completed,
}

impl TaskView {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::All => "all",
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Some(Self::Today),
            "all" => Some(Self::All),
            "upcoming" | "reminders" => Some(Self::Upcoming),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Open tasks due on the clock's current local calendar date, ascending by due.
///
/// Each due instant is mapped to a date by the clock's zone rules at that
/// instant, so tasks on a DST-change day are judged correctly.
pub fn today_tasks<C: Clock + ?Sized>(tasks: &[Task], clock: &C) -> Vec<Task> {
    let today = clock.today();
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| !task.completed && clock.local_date(task.due_date) == today)
        .cloned()
        .collect();
    view.sort_by_key(|task| task.due_date);
    view
}

/// Open tasks due strictly after `now`, ascending by due.
pub fn upcoming_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| !task.completed && task.due_date > now)
        .cloned()
        .collect();
    view.sort_by_key(|task| task.due_date);
    view
}

/// Completed tasks, descending by due.
pub fn completed_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut view: Vec<Task> = tasks.iter().filter(|task| task.completed).cloned().collect();
    view.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    view
}

/// "All tasks" screen: optional priority filter, open before completed, then by due.
pub fn all_tasks_view(tasks: &[Task], priority: Option<Priority>) -> Vec<Task> {
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| priority.map_or(true, |wanted| task.priority == wanted))
        .cloned()
        .collect();
    view.sort_by(|a, b| match a.completed.cmp(&b.completed) {
        Ordering::Equal => a.due_date.cmp(&b.due_date),
        other => other,
    });
    view
}
