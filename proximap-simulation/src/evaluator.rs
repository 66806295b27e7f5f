//! Pairwise proximity detection over the session roster.

use proximap_core::{EntityId, Roster};
use serde::Serialize;
use std::collections::BTreeSet;

/// Two entities whose centers are within the trigger distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityPair {
    pub first: EntityId,
    pub second: EntityId,
    pub distance_m: f64,
}

/// Derived result of one evaluation. Recomputed wholesale on every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProximitySet {
    in_range: BTreeSet<EntityId>,
    alerts: Vec<String>,
    pairs: Vec<ProximityPair>,
}

impl ProximitySet {
    /// Ids of every entity within range of at least one other entity
    pub fn in_range(&self) -> &BTreeSet<EntityId> {
        &self.in_range
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.in_range.contains(id)
    }

    /// One message per qualifying pair, in enumeration order
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn pairs(&self) -> &[ProximityPair] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.in_range.is_empty()
    }
}

/// Formats the alert shown for a qualifying pair.
pub fn alert_message(first_name: &str, second_name: &str) -> String {
    format!("{} and {} are within range!", first_name, second_name)
}

/// Flags every pair of entities whose circles of radius `threshold_m` touch or
/// overlap, i.e. whose centers are at most `2 × threshold_m` apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityEvaluator {
    threshold_m: f64,
}

impl ProximityEvaluator {
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }

    /// Radius drawn around each entity, in meters
    pub fn threshold(&self) -> f64 {
        self.threshold_m
    }

    /// Center-to-center distance at or below which a pair is in range
    #[inline]
    pub fn trigger_distance(&self) -> f64 {
        self.threshold_m * 2.0
    }

    /// Exhaustive i < j scan over the roster in its current order.
    pub fn evaluate(&self, roster: &Roster) -> ProximitySet {
        let trigger = self.trigger_distance();
        let entities = roster.as_slice();
        let mut result = ProximitySet::default();

        for (i, first) in entities.iter().enumerate() {
            for second in &entities[i + 1..] {
                let distance_m = first.position().distance_to(&second.position());
                if distance_m <= trigger {
                    result.in_range.insert(first.id().clone());
                    result.in_range.insert(second.id().clone());
                    result.alerts.push(alert_message(first.display_name(), second.display_name()));
                    result.pairs.push(ProximityPair {
                        first: first.id().clone(),
                        second: second.id().clone(),
                        distance_m,
                    });
                }
            }
        }

        result
    }
}
