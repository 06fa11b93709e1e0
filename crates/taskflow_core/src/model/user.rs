//! Signed-in user profile.

use crate::model::entity::EntityId;
use serde::{Deserialize, Serialize};

/// Profile of the authenticated user.
///
/// Replaced wholesale in the store; there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(id: impl Into<EntityId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            display_name: None,
            avatar_url: None,
        }
    }

    /// Name shown in the shell; falls back to the email local part.
    pub fn label(&self) -> &str {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}
