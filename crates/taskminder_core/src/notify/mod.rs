//! Local notification scheduling for task due times.
//!
//! # Responsibility
//! - Define the device notification provider contract.
//! - Keep at most two pending alerts per task (reminder + due).
//!
//! # Invariants
//! - Alert identifiers are derived from the task id: `<id>` and `<id>-reminder`.
//! - Cancelling an unknown identifier is a no-op for every provider.
//! - Provider failures never propagate past the scheduler.

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod recording;
pub mod scheduler;

pub use recording::{NotificationCommand, PendingAlert, RecordingNotificationProvider};
pub use scheduler::{
    due_alert_identifier, reminder_alert_identifier, NotificationScheduler, ScheduleOutcome,
    ScheduledAlerts, SkipReason, REMINDER_LEAD_MINUTES,
};

pub type NotifyResult<T> = Result<T, NotifyError>;

/// Failure reported by a notification provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Platform notification service is not reachable.
    Unavailable(String),
    /// Platform refused one schedule/cancel request.
    Rejected { identifier: String, reason: String },
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "notifications unavailable: {message}"),
            Self::Rejected { identifier, reason } => {
                write!(f, "notification `{identifier}` rejected: {reason}")
            }
        }
    }
}

impl Error for NotifyError {}

/// Content shown when an alert fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    /// Task the alert belongs to, delivered back to the app on tap.
    pub task_id: String,
}

/// Device notification capability.
pub trait NotificationProvider {
    /// Returns whether alerts may be posted, prompting the user if needed.
    fn request_permission(&self) -> NotifyResult<bool>;

    /// Schedules one alert; replaces any pending alert with the same identifier.
    fn schedule_at(
        &self,
        identifier: &str,
        fire_at: DateTime<Utc>,
        payload: &NotificationPayload,
    ) -> NotifyResult<String>;

    /// Cancels one pending alert; unknown identifiers are a no-op.
    fn cancel(&self, identifier: &str) -> NotifyResult<()>;
}

impl<P: NotificationProvider + ?Sized> NotificationProvider for &P {
    fn request_permission(&self) -> NotifyResult<bool> {
        (**self).request_permission()
    }

    fn schedule_at(
        &self,
        identifier: &str,
        fire_at: DateTime<Utc>,
        payload: &NotificationPayload,
    ) -> NotifyResult<String> {
        (**self).schedule_at(identifier, fire_at, payload)
    }

    fn cancel(&self, identifier: &str) -> NotifyResult<()> {
        (**self).cancel(identifier)
    }
}
