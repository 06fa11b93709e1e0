//! Client-side domain model for task/project/user state.
//!
//! # Responsibility
//! - Define the entity shapes held by the client store.
//! - Define typed partial patches used by update operations.
//!
//! # Invariants
//! - Every task and project is identified by a non-empty `EntityId`.
//! - `id` is never part of a patch; identity is fixed at insert time.
//!
//! # See also
//! - `crate::store` for the collection semantics built on these types.

pub mod entity;
pub mod project;
pub mod task;
pub mod user;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before the epoch read as `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
