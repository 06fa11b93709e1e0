//! Immutable store snapshot and change descriptors.

use crate::model::entity::{EntityId, EntityList};
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::user::User;
use serde::Serialize;
use std::sync::Arc;

/// Complete store value at one revision.
///
/// Snapshots are shared as `Arc<AppSnapshot>`; a mutation never alters a
/// snapshot that a reader still holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppSnapshot {
    /// Incremented once per accepted mutation, starting at `0`.
    pub revision: u64,
    pub tasks: EntityList<Task>,
    pub projects: EntityList<Project>,
    /// `None` means signed out.
    pub current_user: Option<User>,
}

impl AppSnapshot {
    pub fn task(&self, id: &EntityId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn project(&self, id: &EntityId) -> Option<&Project> {
        self.projects.get(id)
    }

    /// Tasks whose `project_id` equals `project_id`, in collection order.
    pub fn tasks_for_project<'a>(
        &'a self,
        project_id: &'a EntityId,
    ) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |task| task.project_id.as_ref() == Some(project_id))
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }
}

/// Describes the mutation that produced a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    TasksReplaced { count: usize },
    TaskAdded { id: EntityId },
    /// `matched == false` means the update was a no-op.
    TaskUpdated { id: EntityId, matched: bool },
    /// `removed == false` means the delete was a no-op.
    TaskDeleted { id: EntityId, removed: bool },
    ProjectsReplaced { count: usize },
    ProjectAdded { id: EntityId },
    ProjectUpdated { id: EntityId, matched: bool },
    ProjectDeleted { id: EntityId, removed: bool },
    CurrentUserSet { signed_in: bool },
}

impl StoreChange {
    /// Stable operation name used in log events.
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::TasksReplaced { .. } => "set_tasks",
            Self::TaskAdded { .. } => "add_task",
            Self::TaskUpdated { .. } => "update_task",
            Self::TaskDeleted { .. } => "delete_task",
            Self::ProjectsReplaced { .. } => "set_projects",
            Self::ProjectAdded { .. } => "add_project",
            Self::ProjectUpdated { .. } => "update_project",
            Self::ProjectDeleted { .. } => "delete_project",
            Self::CurrentUserSet { .. } => "set_current_user",
        }
    }

    /// Returns whether the mutation altered any collection or field.
    pub fn is_effective(&self) -> bool {
        match self {
            Self::TaskUpdated { matched, .. } | Self::ProjectUpdated { matched, .. } => *matched,
            Self::TaskDeleted { removed, .. } | Self::ProjectDeleted { removed, .. } => *removed,
            _ => true,
        }
    }
}

/// Payload delivered to every subscriber after a mutation.
#[derive(Debug, Clone)]
pub struct StoreNotification {
    pub snapshot: Arc<AppSnapshot>,
    pub change: StoreChange,
}
