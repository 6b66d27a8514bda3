//! In-process notification provider with a host-drained command outbox.
//!
//! # Responsibility
//! - Track pending alerts so callers can inspect what is scheduled.
//! - Queue schedule/cancel commands for the host app to apply to the
//!   device notification API.
//!
//! # Invariants
//! - At most one pending alert per identifier.
//! - Alerts whose fire instant has passed are pruned on every schedule and
//!   every pending-alert read.
//! - Every cancel is queued, even for identifiers not pending here, since the
//!   device may still hold alerts from an earlier process.
//! - The outbox is only emptied by `drain_commands`; the host must drain it
//!   after each mutating call or it keeps growing.

use super::{NotificationPayload, NotificationProvider, NotifyResult};
use crate::clock::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAlert {
    pub identifier: String,
    pub fire_at: DateTime<Utc>,
    pub payload: NotificationPayload,
}

/// One device-level action for the host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationCommand {
    Schedule(PendingAlert),
    Cancel { identifier: String },
}

#[derive(Debug, Default)]
struct RecordingState {
    permission_granted: bool,
    pending: BTreeMap<String, PendingAlert>,
    outbox: Vec<NotificationCommand>,
}

/// Notification provider that records instead of posting.
#[derive(Debug)]
pub struct RecordingNotificationProvider<C: Clock = SystemClock> {
    state: Mutex<RecordingState>,
    clock: C,
}

impl RecordingNotificationProvider {
    pub fn new(permission_granted: bool) -> Self {
        Self::with_clock(permission_granted, SystemClock)
    }
}

impl Default for RecordingNotificationProvider {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<C: Clock> RecordingNotificationProvider<C> {
    /// Provider whose fired-alert pruning follows `clock`.
    pub fn with_clock(permission_granted: bool, clock: C) -> Self {
        Self {
            state: Mutex::new(RecordingState {
                permission_granted,
                ..RecordingState::default()
            }),
            clock,
        }
    }

    /// Mirrors the permission result the host got from the device.
    pub fn set_permission_granted(&self, granted: bool) {
        self.lock().permission_granted = granted;
    }

    /// Alerts that have not fired yet, ordered by identifier.
    pub fn pending_alerts(&self) -> Vec<PendingAlert> {
        self.lock_pruned().pending.values().cloned().collect()
    }

    pub fn pending_identifiers(&self) -> Vec<String> {
        self.lock_pruned().pending.keys().cloned().collect()
    }

    pub fn pending_alert(&self, identifier: &str) -> Option<PendingAlert> {
        self.lock_pruned().pending.get(identifier).cloned()
    }

    /// Takes every queued command, oldest first.
    pub fn drain_commands(&self) -> Vec<NotificationCommand> {
        std::mem::take(&mut self.lock().outbox)
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_pruned(&self) -> MutexGuard<'_, RecordingState> {
        let now = self.clock.now_utc();
        let mut state = self.lock();
        state.pending.retain(|_, alert| alert.fire_at > now);
        state
    }
}

impl<C: Clock> NotificationProvider for RecordingNotificationProvider<C> {
    fn request_permission(&self) -> NotifyResult<bool> {
        Ok(self.lock().permission_granted)
    }

    fn schedule_at(
        &self,
        identifier: &str,
        fire_at: DateTime<Utc>,
        payload: &NotificationPayload,
    ) -> NotifyResult<String> {
        let alert = PendingAlert {
            identifier: identifier.to_string(),
            fire_at,
            payload: payload.clone(),
        };
        let mut state = self.lock_pruned();
        state.pending.insert(alert.identifier.clone(), alert.clone());
        state.outbox.push(NotificationCommand::Schedule(alert));
        Ok(identifier.to_string())
    }

    fn cancel(&self, identifier: &str) -> NotifyResult<()> {
        let mut state = self.lock();
        state.pending.remove(identifier);
        state.outbox.push(NotificationCommand::Cancel {
            identifier: identifier.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationCommand, RecordingNotificationProvider};
    use crate::clock::FixedClock;
    use crate::notify::{NotificationPayload, NotificationProvider};
    use chrono::{Duration, FixedOffset, TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock::new(
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2026, 10, 18, 8, 0, 0)
                .unwrap(),
        )
    }

    fn payload() -> NotificationPayload {
        NotificationPayload {
            title: "Task Due Now".to_string(),
            body: "\"x\" is due now".to_string(),
            task_id: "x".to_string(),
        }
    }

    #[test]
    fn scheduling_same_identifier_replaces_pending_alert() {
        let clock = clock();
        let provider = RecordingNotificationProvider::with_clock(true, &clock);
        let first = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap();

        provider.schedule_at("x", first, &payload()).unwrap();
        provider.schedule_at("x", second, &payload()).unwrap();

        let pending = provider.pending_alerts();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].fire_at, second);
    }

    #[test]
    fn fired_alerts_are_pruned_from_pending() {
        let clock = clock();
        let provider = RecordingNotificationProvider::with_clock(true, &clock);
        let soon = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 10, 18, 11, 0, 0).unwrap();
        provider.schedule_at("soon", soon, &payload()).unwrap();
        provider.schedule_at("later", later, &payload()).unwrap();

        clock.advance(Duration::hours(1));
        assert_eq!(provider.pending_identifiers(), vec!["later"]);

        clock.advance(Duration::hours(3));
        let next = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        provider.schedule_at("next", next, &payload()).unwrap();
        assert_eq!(provider.pending_identifiers(), vec!["next"]);
        assert_eq!(provider.drain_commands().len(), 3);
    }

    #[test]
    fn cancel_unknown_identifier_is_ok_and_still_queued() {
        let provider = RecordingNotificationProvider::new(true);
        provider.cancel("ghost").unwrap();

        assert!(provider.pending_alerts().is_empty());
        assert_eq!(
            provider.drain_commands(),
            vec![NotificationCommand::Cancel {
                identifier: "ghost".to_string()
            }]
        );
        assert!(provider.drain_commands().is_empty());
    }

    #[test]
    fn permission_follows_host_updates() {
        let provider = RecordingNotificationProvider::default();
        assert!(!provider.request_permission().unwrap());
        provider.set_permission_granted(true);
        assert!(provider.request_permission().unwrap());
    }
}
