use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Coordinate;

/// Unique identifier of a tracked entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId(id)
    }
}

/// Whether an entity is the viewer's own or somebody else's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Primary,
    Other,
}

/// A tracked point: identity, display name, position and a fixed flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    id: EntityId,
    display_name: String,
    position: Coordinate,
    is_fixed: bool,
    role: Role,
}

impl Entity {
    /// Creates a movable entity. The role is assigned when it joins a `Roster`.
    pub fn new(id: impl Into<EntityId>, display_name: impl Into<String>, position: Coordinate) -> Self {
        Entity {
            id: id.into(),
            display_name: display_name.into(),
            position,
            is_fixed: false,
            role: Role::Other,
        }
    }

    /// Builder-style setter for the initial fixed flag
    pub fn with_fixed(mut self, is_fixed: bool) -> Self {
        self.is_fixed = is_fixed;
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn is_fixed(&self) -> bool {
        self.is_fixed
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_primary(&self) -> bool {
        self.role == Role::Primary
    }

    // Mutation goes through the roster so the fixed rule is enforced in one place.
    pub(crate) fn set_position(&mut self, position: Coordinate) {
        self.position = position;
    }

    pub(crate) fn set_fixed(&mut self, is_fixed: bool) {
        self.is_fixed = is_fixed;
    }

    pub(crate) fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}
