//! Wall-clock access for views and notification scheduling.
//!
//! "Today" is decided per instant: `Clock::local_date` maps each due instant
//! to a calendar date in the clock's time zone, so a zone with DST uses the
//! offset in effect at that instant, not the offset in effect now.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use std::sync::{Mutex, PoisonError};

/// Source of the current time and of local calendar dates.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Calendar date of `at` in this clock's time zone.
    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate;

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    fn today(&self) -> NaiveDate {
        self.local_date(self.now_utc())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        (**self).local_date(at)
    }
}

/// Device clock in the device's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&Local).date_naive()
    }
}

/// Settable clock for tests and deterministic hosts.
///
/// Either pinned to one UTC offset (`new`) or following the process's
/// local time zone rules (`in_local_zone`).
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
    offset: Option<FixedOffset>,
}

impl FixedClock {
    /// Clock frozen at `now`, reporting dates in `now`'s offset.
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now.with_timezone(&Utc)),
            offset: Some(*now.offset()),
        }
    }

    /// Clock frozen at `now`, reporting dates in the local time zone.
    pub fn in_local_zone(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            offset: None,
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += by;
    }

    fn instant(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let now = self.instant();
        match self.offset {
            Some(offset) => now.with_timezone(&offset),
            None => now.with_timezone(&Local).fixed_offset(),
        }
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        match self.offset {
            Some(offset) => at.with_timezone(&offset).date_naive(),
            None => at.with_timezone(&Local).date_naive(),
        }
    }
}
