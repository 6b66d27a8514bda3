//! Task collection repository over a key-value provider.
//!
//! # Responsibility
//! - Serialize the task collection as one JSON array under a fixed key.
//! - Distinguish "no data yet" from "unreadable data".
//!
//! # Invariants
//! - A missing key loads as an empty collection.
//! - Insertion order is preserved at rest.

use crate::model::task::Task;
use crate::storage::{KeyValueStore, StorageError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized task collection.
pub const TASKS_STORAGE_KEY: &str = "taskManager_tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task collection load/persist.
#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    CorruptPayload(serde_json::Error),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::CorruptPayload(err) => write!(f, "unreadable task payload: {err}"),
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::CorruptPayload(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Repository interface for the whole task collection.
pub trait TaskRepository {
    fn load_tasks(&self) -> RepoResult<Vec<Task>>;
    fn persist_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
}

/// JSON-blob task repository on top of any key-value provider.
pub struct KvTaskRepository<S: KeyValueStore> {
    store: S,
    key: &'static str,
}

impl<S: KeyValueStore> KvTaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: TASKS_STORAGE_KEY,
        }
    }

    /// Underlying provider, e.g. for inspecting raw payloads in diagnostics.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> TaskRepository for KvTaskRepository<S> {
    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        match self.store.get(self.key)? {
            Some(payload) => serde_json::from_str(&payload).map_err(RepoError::CorruptPayload),
            None => Ok(Vec::new()),
        }
    }

    fn persist_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        let payload = serde_json::to_string(tasks).map_err(RepoError::Encode)?;
        self.store.set(self.key, &payload)?;
        Ok(())
    }
}
