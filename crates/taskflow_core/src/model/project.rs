//! Project entity and its partial patch.

use crate::model::entity::{deserialize_present, Entity, EntityId};
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Completed,
    Archived,
}

/// Project record as held by the client store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub owner_id: Option<EntityId>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Project {
    /// Creates an active project with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(EntityId::generate(), name)
    }

    /// Creates an active project with a caller-provided id.
    pub fn with_id(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status: ProjectStatus::default(),
            owner_id: None,
            created_at_ms: now,
            updated_at_ms: now,
        }
    }
}

/// Partial field set for `Project`; same nesting rules as `TaskPatch`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_id: Option<Option<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at_ms: Option<i64>,
}

impl ProjectPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Entity for Project {
    type Patch = ProjectPatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply_patch(&mut self, patch: &ProjectPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(owner_id) = &patch.owner_id {
            self.owner_id = owner_id.clone();
        }
        if let Some(updated_at_ms) = patch.updated_at_ms {
            self.updated_at_ms = updated_at_ms;
        }
    }
}
