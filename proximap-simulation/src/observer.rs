use log::{debug, trace};
use proximap_core::{EntityId, Roster};
use std::time::Instant;

use crate::evaluator::ProximitySet;

/// What caused a recompute
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeCause {
    /// First publication, or an explicit refresh requested by the host
    Initial,
    Moved(EntityId),
    FixedToggled(EntityId),
    ThresholdChanged,
}

/// Everything an observer may read after a recompute.
///
/// The proximity set is always the one computed from `roster` and
/// `threshold_m` as they are here.
#[derive(Debug, Clone, Copy)]
pub struct ProximityUpdate<'a> {
    pub revision: u64,
    pub cause: &'a ChangeCause,
    pub roster: &'a Roster,
    pub threshold_m: f64,
    pub proximity: &'a ProximitySet,
}

/// Subscriber notified synchronously after every recompute
pub trait ProximityObserver {
    /// Called once per state change, after the proximity set is fresh
    fn on_change(&mut self, update: &ProximityUpdate<'_>);

    /// Optional name for debugging and profiling
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Registry for storing and notifying observers in subscription order
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Box<dyn ProximityObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer to the end of the notification order
    pub fn subscribe<O: ProximityObserver + 'static>(&mut self, observer: O) {
        self.subscribe_boxed(Box::new(observer));
    }

    pub fn subscribe_boxed(&mut self, observer: Box<dyn ProximityObserver>) {
        debug!("Subscribed observer {}", observer.name());
        self.observers.push(observer);
    }

    /// Notifies every observer once
    pub fn notify(&mut self, update: &ProximityUpdate<'_>) {
        let start = Instant::now();

        for observer in &mut self.observers {
            let observer_start = Instant::now();
            observer.on_change(update);
            trace!(
                "Observer {} handled revision {} in {:?}",
                observer.name(),
                update.revision,
                observer_start.elapsed()
            );
        }

        debug!(
            "Notified {} observer(s) of revision {} in {:?}",
            self.observers.len(),
            update.revision,
            start.elapsed()
        );
    }

    /// Returns the number of observers in the registry
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proximap_core::{Coordinate, Entity};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<(&'static str, u64)>>>,
    }

    impl ProximityObserver for Recorder {
        fn on_change(&mut self, update: &ProximityUpdate<'_>) {
            self.log.borrow_mut().push((self.label, update.revision));
        }
    }

    #[test]
    fn observers_run_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ObserverRegistry::new();
        registry.subscribe(Recorder { label: "first", log: log.clone() });
        registry.subscribe(Recorder { label: "second", log: log.clone() });
        assert_eq!(registry.observer_count(), 2);

        let roster = Roster::new(Entity::new("1", "Me", Coordinate::new(0.0, 0.0).unwrap()), Vec::new()).unwrap();
        let proximity = ProximitySet::default();
        let cause = ChangeCause::Initial;
        registry.notify(&ProximityUpdate {
            revision: 7,
            cause: &cause,
            roster: &roster,
            threshold_m: 100.0,
            proximity: &proximity,
        });

        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }
}
