use std::collections::HashMap;

use crate::{Coordinate, Entity, EntityId, Role, RosterError};

/// Result of asking the roster to move an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The position was replaced.
    Moved,
    /// The entity is fixed; nothing changed.
    Fixed,
}

/// Roster stores the session's entities in a stable order: the primary entity
/// first, then the others in the order they were seeded.
#[derive(Debug, Clone)]
pub struct Roster {
    entities: Vec<Entity>,
    // id -> position in `entities`
    index: HashMap<EntityId, usize>,
}

impl Roster {
    /// Builds a roster from the viewer's own entity and everybody else.
    ///
    /// Roles are (re)assigned here: `primary` becomes `Role::Primary` and every
    /// entity in `others` becomes `Role::Other`. Fails if any identifier repeats.
    pub fn new(primary: Entity, others: Vec<Entity>) -> Result<Self, RosterError> {
        let mut entities = Vec::with_capacity(others.len() + 1);
        let mut index = HashMap::with_capacity(others.len() + 1);

        let tagged = std::iter::once((primary, Role::Primary))
            .chain(others.into_iter().map(|entity| (entity, Role::Other)));

        for (mut entity, role) in tagged {
            if index.contains_key(entity.id()) {
                return Err(RosterError::DuplicateId(entity.id().clone()));
            }
            entity.set_role(role);
            index.insert(entity.id().clone(), entities.len());
            entities.push(entity);
        }

        Ok(Roster { entities, index })
    }

    /// The viewer's own entity
    pub fn primary(&self) -> &Entity {
        // `new` always pushes the primary first
        &self.entities[0]
    }

    /// Every entity except the primary, in seed order
    pub fn others(&self) -> &[Entity] {
        &self.entities[1..]
    }

    /// All entities, primary first
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// A roster always holds its primary, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.index.get(id).map(|&idx| &self.entities[idx])
    }

    fn get_mut(&mut self, id: &EntityId) -> Result<&mut Entity, RosterError> {
        match self.index.get(id) {
            Some(&idx) => Ok(&mut self.entities[idx]),
            None => Err(RosterError::UnknownEntity(id.clone())),
        }
    }

    /// Replaces an entity's position unless it is fixed.
    ///
    /// The coordinate is validated before the entity is looked at, so an
    /// invalid request never changes anything.
    pub fn move_entity(&mut self, id: &EntityId, latitude: f64, longitude: f64) -> Result<MoveOutcome, RosterError> {
        let position = Coordinate::new(latitude, longitude)?;
        self.move_to(id, position)
    }

    /// Same as [`Roster::move_entity`] for an already validated coordinate.
    pub fn move_to(&mut self, id: &EntityId, position: Coordinate) -> Result<MoveOutcome, RosterError> {
        let entity = self.get_mut(id)?;
        if entity.is_fixed() {
            return Ok(MoveOutcome::Fixed);
        }
        entity.set_position(position);
        Ok(MoveOutcome::Moved)
    }

    /// Flips an entity's fixed flag and returns the new value.
    pub fn toggle_fixed(&mut self, id: &EntityId) -> Result<bool, RosterError> {
        let entity = self.get_mut(id)?;
        let is_fixed = !entity.is_fixed();
        entity.set_fixed(is_fixed);
        Ok(is_fixed)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
