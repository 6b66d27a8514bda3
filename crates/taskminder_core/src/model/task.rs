//! Task domain model.
//!
//! # Responsibility
//! - Define the task record persisted in the key-value blob.
//! - Provide creation-time validation and view predicates.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `created_at` is set once and never mutated.
//! - `completed` is the only field toggled by normal use.
//! - Timestamps carry millisecond precision so they survive the wire format.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque task identifier.
///
/// Generated ids are UUID v4 strings, but any non-empty string read back
/// from storage is accepted.
pub type TaskId = String;

/// Task urgency chosen at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Stable string id used on the wire and across FFI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a wire/FFI priority value (case-insensitive, trimmed).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Validation errors raised at the task creation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id cannot be empty"),
            Self::EmptyTitle => write!(f, "task title is required"),
        }
    }
}

impl Error for TaskValidationError {}

/// A user-created to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Empty string means "no description".
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[serde(with = "iso_instant")]
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "iso_instant")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates an incomplete task with a generated stable ID.
    pub fn new(
        title: impl Into<String>,
        priority: Priority,
        due_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4().to_string(),
            title,
            priority,
            due_date,
            created_at,
        )
    }

    /// Creates an incomplete task with a caller-provided ID.
    ///
    /// Does not validate; callers at the creation boundary run `validate()`.
    pub fn with_id(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        priority: Priority,
        due_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority,
            due_date: due_date.trunc_subsecs(3),
            completed: false,
            created_at: created_at.trunc_subsecs(3),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Checks creation-boundary invariants.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    /// - `EmptyTitle` when `title` is blank after trimming.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Returns the description when one was entered.
    pub fn description(&self) -> Option<&str> {
        if self.description.is_empty() {
            None
        } else {
            Some(self.description.as_str())
        }
    }

    /// Past due and still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date < now
    }
}

/// ISO-8601 instants with millisecond precision and a `Z` suffix.
mod iso_instant {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|err| serde::de::Error::custom(format!("invalid instant `{raw}`: {err}")))
    }
}
