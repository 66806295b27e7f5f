//! Host-facing view of a session after a recompute.

use proximap_core::Entity;
use proximap_simulation::{ChangeCause, ProximityUpdate};
use serde::Serialize;

/// Circle/marker color
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    /// Within range of at least one other entity
    Red,
    Blue,
}

impl HighlightColor {
    pub fn for_in_range(in_range: bool) -> Self {
        if in_range {
            HighlightColor::Red
        } else {
            HighlightColor::Blue
        }
    }
}

/// One marker plus its threshold circle
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MarkerState {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_fixed: bool,
    pub is_primary: bool,
    pub in_range: bool,
    pub color: HighlightColor,
    pub radius_m: f64,
    /// e.g. `Lat: 40.7128, Lng: -74.0060`
    pub label: String,
    /// Caption of the fix/unfix action for this marker
    pub toggle_label: &'static str,
}

impl MarkerState {
    fn from_entity(entity: &Entity, in_range: bool, radius_m: f64) -> Self {
        let position = entity.position();
        Self {
            id: entity.id().to_string(),
            name: entity.display_name().to_string(),
            latitude: position.latitude(),
            longitude: position.longitude(),
            is_fixed: entity.is_fixed(),
            is_primary: entity.is_primary(),
            in_range,
            color: HighlightColor::for_in_range(in_range),
            radius_m,
            label: coordinate_label(position.latitude(), position.longitude()),
            toggle_label: toggle_label(entity.is_fixed()),
        }
    }
}

pub fn coordinate_label(latitude: f64, longitude: f64) -> String {
    format!("Lat: {:.4}, Lng: {:.4}", latitude, longitude)
}

pub fn toggle_label(is_fixed: bool) -> &'static str {
    if is_fixed {
        "Unfix Location"
    } else {
        "Fix Location"
    }
}

/// Complete session state for serialization
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub revision: u64,
    pub cause: String,
    /// Map center; follows the primary entity
    pub center: (f64, f64),
    pub threshold_m: f64,
    pub trigger_distance_m: f64,
    pub markers: Vec<MarkerState>,
    pub alerts: Vec<String>,
}

fn describe(cause: &ChangeCause) -> String {
    match cause {
        ChangeCause::Initial => "initial".to_string(),
        ChangeCause::Moved(id) => format!("moved:{}", id),
        ChangeCause::FixedToggled(id) => format!("toggled:{}", id),
        ChangeCause::ThresholdChanged => "threshold".to_string(),
    }
}

impl Snapshot {
    pub fn from_update(update: &ProximityUpdate<'_>) -> Self {
        let primary = update.roster.primary().position();
        let markers = update
            .roster
            .iter()
            .map(|entity| MarkerState::from_entity(entity, update.proximity.contains(entity.id()), update.threshold_m))
            .collect();

        Self {
            revision: update.revision,
            cause: describe(update.cause),
            center: (primary.latitude(), primary.longitude()),
            threshold_m: update.threshold_m,
            trigger_distance_m: update.threshold_m * 2.0,
            markers,
            alerts: update.proximity.alerts().to_vec(),
        }
    }
}
