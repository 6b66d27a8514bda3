//! Flutter-facing bindings for the Taskminder core.

pub mod api;
