//! Domain model for the to-do list core.
//!
//! # Responsibility
//! - Define the canonical `Task` record shared by every list view.
//! - Own the wire shape of the persisted task collection.
//!
//! # Invariants
//! - Every task is identified by a stable, unique `TaskId`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod task;
