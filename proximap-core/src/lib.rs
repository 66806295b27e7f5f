//! Core data model for proximity tracking: coordinates, entities and the
//! session roster.

use thiserror::Error;

pub mod entity;
pub mod geo;
pub mod roster;

pub use entity::{Entity, EntityId, Role};
pub use geo::{haversine_distance, Coordinate, EARTH_RADIUS_M};
pub use roster::{MoveOutcome, Roster};

/// Errors raised when building or mutating a roster
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Duplicate entity id: {0}")]
    DuplicateId(EntityId),

    #[error("Unknown entity id: {0}")]
    UnknownEntity(EntityId),
}
