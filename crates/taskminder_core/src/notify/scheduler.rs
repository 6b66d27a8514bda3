//! Reminder/due alert scheduling per task.

use super::{NotificationPayload, NotificationProvider, NotifyResult};
use crate::clock::Clock;
use crate::model::task::Task;
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info};

/// Minutes before the due instant at which the reminder alert fires.
pub const REMINDER_LEAD_MINUTES: i64 = 60;

const REMINDER_SUFFIX: &str = "-reminder";

/// Identifier of the alert firing at the due instant.
pub fn due_alert_identifier(task_id: &str) -> String {
    task_id.to_string()
}

/// Identifier of the alert firing one hour before the due instant.
pub fn reminder_alert_identifier(task_id: &str) -> String {
    format!("{task_id}{REMINDER_SUFFIX}")
}

/// Alerts left pending after a successful schedule call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAlerts {
    pub due_identifier: String,
    /// `None` when the reminder instant had already passed.
    pub reminder_identifier: Option<String>,
}

/// Why a schedule call left no alerts behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DueNotInFuture,
    PermissionDenied,
    ProviderFailed,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DueNotInFuture => "due_not_in_future",
            Self::PermissionDenied => "permission_denied",
            Self::ProviderFailed => "provider_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled(ScheduledAlerts),
    Skipped(SkipReason),
}

impl ScheduleOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled(_))
    }
}

/// Keeps a task's alert pair aligned with its due instant.
pub struct NotificationScheduler<P: NotificationProvider, C: Clock> {
    provider: P,
    clock: C,
}

impl<P: NotificationProvider, C: Clock> NotificationScheduler<P, C> {
    pub fn new(provider: P, clock: C) -> Self {
        Self { provider, clock }
    }

    /// Schedules the reminder and due alerts for `task`.
    ///
    /// Previously scheduled alerts for the same id are cancelled first, so
    /// calling this twice leaves one pair. Provider failures are logged and
    /// reported as `Skipped(ProviderFailed)`.
    pub fn schedule_task_notification(&self, task: &Task) -> ScheduleOutcome {
        let now = self.clock.now_utc();
        if task.due_date <= now {
            debug!(
                "event=notify_schedule module=notify status=skip reason={} task_id={}",
                SkipReason::DueNotInFuture.as_str(),
                task.id
            );
            return ScheduleOutcome::Skipped(SkipReason::DueNotInFuture);
        }

        match self.provider.request_permission() {
            Ok(true) => {}
            Ok(false) => {
                info!(
                    "event=notify_schedule module=notify status=skip reason={} task_id={}",
                    SkipReason::PermissionDenied.as_str(),
                    task.id
                );
                return ScheduleOutcome::Skipped(SkipReason::PermissionDenied);
            }
            Err(err) => {
                error!(
                    "event=notify_permission module=notify status=error task_id={} error={err}",
                    task.id
                );
                return ScheduleOutcome::Skipped(SkipReason::ProviderFailed);
            }
        }

        self.cancel_task_notification(&task.id);

        match self.schedule_pair(task, now) {
            Ok(alerts) => {
                info!(
                    "event=notify_schedule module=notify status=ok task_id={} reminder={}",
                    task.id,
                    alerts.reminder_identifier.is_some()
                );
                ScheduleOutcome::Scheduled(alerts)
            }
            Err(err) => {
                error!(
                    "event=notify_schedule module=notify status=error task_id={} error={err}",
                    task.id
                );
                ScheduleOutcome::Skipped(SkipReason::ProviderFailed)
            }
        }
    }

    /// Cancels both alerts of `task_id`. Absent alerts are not an error.
    pub fn cancel_task_notification(&self, task_id: &str) {
        for identifier in [
            due_alert_identifier(task_id),
            reminder_alert_identifier(task_id),
        ] {
            if let Err(err) = self.provider.cancel(&identifier) {
                error!(
                    "event=notify_cancel module=notify status=error task_id={task_id} identifier={identifier} error={err}"
                );
            }
        }
        debug!("event=notify_cancel module=notify status=ok task_id={task_id}");
    }

    fn schedule_pair(
        &self,
        task: &Task,
        now: DateTime<Utc>,
    ) -> NotifyResult<ScheduledAlerts> {
        let reminder_at = task.due_date - Duration::minutes(REMINDER_LEAD_MINUTES);
        let reminder_identifier = if reminder_at > now {
            let payload = NotificationPayload {
                title: "Task Reminder".to_string(),
                body: format!("\"{}\" is due in 1 hour", task.title),
                task_id: task.id.clone(),
            };
            Some(self.provider.schedule_at(
                &reminder_alert_identifier(&task.id),
                reminder_at,
                &payload,
            )?)
        } else {
            None
        };

        let payload = NotificationPayload {
            title: "Task Due Now".to_string(),
            body: format!("\"{}\" is due now", task.title),
            task_id: task.id.clone(),
        };
        let due_identifier =
            self.provider
                .schedule_at(&due_alert_identifier(&task.id), task.due_date, &payload)?;

        Ok(ScheduledAlerts {
            due_identifier,
            reminder_identifier,
        })
    }
}
