//! Task entity and its partial patch.
//!
//! # Invariants
//! - `id` is stable for the task lifetime and never patched.
//! - `status` is the only source of truth for completion.

use crate::model::entity::{deserialize_present, Entity, EntityId};
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Todo,
    /// Work is in progress.
    InProgress,
    /// Completed successfully.
    Done,
    /// No longer actionable.
    Cancelled,
}

impl TaskStatus {
    /// Returns whether the task still needs work.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Todo | Self::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Task record as held by the client store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Owning project, if any. Not checked against the project collection.
    pub project_id: Option<EntityId>,
    pub assignee_id: Option<EntityId>,
    /// Unix epoch milliseconds.
    pub due_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Task {
    /// Creates a task with a generated id and default status/priority.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(EntityId::generate(), title)
    }

    /// Creates a task with a caller-provided id.
    ///
    /// Used when identity already exists upstream (fetch results, imports).
    pub fn with_id(id: impl Into<EntityId>, title: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            project_id: None,
            assignee_id: None,
            due_at_ms: None,
            created_at_ms: now,
            updated_at_ms: now,
        }
    }

    /// Returns whether the task is open and its due time is before `now_ms`.
    pub fn is_overdue(&self, now_ms: i64) -> bool {
        self.status.is_open() && self.due_at_ms.is_some_and(|due| due < now_ms)
    }
}

/// Partial field set for `Task`.
///
/// Nested options on nullable fields: `None` leaves the field unchanged,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<Option<EntityId>>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignee_id: Option<Option<EntityId>>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_at_ms: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at_ms: Option<i64>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Entity for Task {
    type Patch = TaskPatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(project_id) = &patch.project_id {
            self.project_id = project_id.clone();
        }
        if let Some(assignee_id) = &patch.assignee_id {
            self.assignee_id = assignee_id.clone();
        }
        if let Some(due_at_ms) = patch.due_at_ms {
            self.due_at_ms = due_at_ms;
        }
        if let Some(updated_at_ms) = patch.updated_at_ms {
            self.updated_at_ms = updated_at_ms;
        }
    }
}
