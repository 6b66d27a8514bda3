//! Derived list views over the full task collection.
//!
//! # Responsibility
//! - Filter and order tasks for each list screen.
//!
//! # Invariants
//! - Views are recomputed from the full collection on every call; no indices.
//! - Sorting is stable, so equal due instants keep collection order.

pub mod views;
