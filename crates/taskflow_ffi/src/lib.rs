//! Flutter-facing bindings for the TaskFlow client core.

pub mod api;
