//! Repository layer over the persisted task collection.
//!
//! # Responsibility
//! - Define the load/persist contract for the whole task collection.
//! - Isolate JSON encoding and the storage key from the store's use cases.
//!
//! # Invariants
//! - The collection is read and written wholesale; there is no partial write.
//! - Repository APIs surface typed errors; swallowing them is the store's job.

pub mod task_repo;
