use log::info;
use std::collections::BTreeSet;

use crate::observer::{ProximityObserver, ProximityUpdate};

/// Alerts that appeared or disappeared between two revisions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AlertChanges {
    pub raised: Vec<String>,
    pub cleared: Vec<String>,
}

impl AlertChanges {
    pub fn is_empty(&self) -> bool {
        self.raised.is_empty() && self.cleared.is_empty()
    }
}

/// Observer that logs proximity alerts as they are raised and cleared,
/// instead of repeating the whole list on every change.
#[derive(Debug, Default)]
pub struct AlertLog {
    active: BTreeSet<String>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active alerts, sorted
    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    /// Replaces the active set with `alerts` and reports the difference.
    /// Raised alerts keep the order they have in `alerts`.
    pub fn track(&mut self, alerts: &[String]) -> AlertChanges {
        let next: BTreeSet<String> = alerts.iter().cloned().collect();

        let raised = alerts
            .iter()
            .filter(|alert| !self.active.contains(*alert))
            .cloned()
            .collect();
        let cleared = self.active.difference(&next).cloned().collect();

        self.active = next;
        AlertChanges { raised, cleared }
    }
}

impl ProximityObserver for AlertLog {
    fn on_change(&mut self, update: &ProximityUpdate<'_>) {
        let changes = self.track(update.proximity.alerts());
        for alert in &changes.raised {
            info!("Proximity alert: {}", alert);
        }
        for alert in &changes.cleared {
            info!("Proximity alert cleared: {}", alert);
        }
    }

    fn name(&self) -> &str {
        "alert-log"
    }
}
