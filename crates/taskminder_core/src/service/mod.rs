//! Core use-case services.
//!
//! # Responsibility
//! - `task_store`: persisted task state and its list views.
//! - `task_actions`: user flows that touch both the store and notifications.
//!
//! # Invariants
//! - UI/FFI layers go through these services, never the repository directly.

pub mod task_actions;
pub mod task_store;
