//! The session owns the roster and keeps its proximity set current.

use log::{debug, info};
use proximap_core::{Coordinate, EntityId, MoveOutcome, Roster, RosterError};
use rand::Rng;
use thiserror::Error;

use crate::evaluator::{ProximityEvaluator, ProximitySet};
use crate::jitter::Jitter;
use crate::observer::{ChangeCause, ObserverRegistry, ProximityObserver, ProximityUpdate};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("Invalid threshold distance: {0} (must be a positive number of meters)")]
    InvalidThreshold(f64),
}

fn validate_threshold(threshold_m: f64) -> Result<(), SessionError> {
    if threshold_m.is_finite() && threshold_m > 0.0 {
        Ok(())
    } else {
        Err(SessionError::InvalidThreshold(threshold_m))
    }
}

/// A single viewer's tracking session.
///
/// Every mutation that changes the roster or the threshold re-runs the
/// proximity evaluator before returning, then notifies observers with the
/// fresh result. Reads through [`Session::proximity`] therefore never see a
/// stale set.
pub struct Session {
    roster: Roster,
    evaluator: ProximityEvaluator,
    proximity: ProximitySet,
    observers: ObserverRegistry,
    jitter: Jitter,
    revision: u64,
}

impl Session {
    /// Create a new session over `roster` with the given circle radius in meters
    pub fn new(roster: Roster, threshold_m: f64) -> Result<Self, SessionError> {
        validate_threshold(threshold_m)?;
        let evaluator = ProximityEvaluator::new(threshold_m);
        let proximity = evaluator.evaluate(&roster);

        info!(
            "Session started with {} entities, threshold {} m ({} pair(s) in range)",
            roster.len(),
            threshold_m,
            proximity.pairs().len()
        );

        Ok(Self {
            roster,
            evaluator,
            proximity,
            observers: ObserverRegistry::new(),
            jitter: Jitter::default(),
            revision: 0,
        })
    }

    /// Replace the jitter used by click-style moves
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Register an observer. It is first called on the next change or refresh.
    pub fn subscribe<O: ProximityObserver + 'static>(&mut self, observer: O) {
        self.observers.subscribe(observer);
    }

    pub fn subscribe_boxed(&mut self, observer: Box<dyn ProximityObserver>) {
        self.observers.subscribe_boxed(observer);
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn threshold(&self) -> f64 {
        self.evaluator.threshold()
    }

    pub fn trigger_distance(&self) -> f64 {
        self.evaluator.trigger_distance()
    }

    /// The proximity set for the current roster and threshold
    pub fn proximity(&self) -> &ProximitySet {
        &self.proximity
    }

    /// Number of recomputes since the session started
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn jitter(&self) -> Jitter {
        self.jitter
    }

    /// Recompute and republish without changing anything
    pub fn refresh(&mut self) {
        self.recompute(ChangeCause::Initial);
    }

    /// Move an entity to explicit coordinates. Fixed entities stay put.
    pub fn move_entity(&mut self, id: &EntityId, latitude: f64, longitude: f64) -> Result<MoveOutcome, SessionError> {
        let outcome = self.roster.move_entity(id, latitude, longitude)?;
        self.after_move(id, outcome);
        Ok(outcome)
    }

    /// Simulate a click on an entity's marker: jitter its position unless fixed.
    pub fn nudge<R: Rng + ?Sized>(&mut self, id: &EntityId, rng: &mut R) -> Result<MoveOutcome, SessionError> {
        let entity = self
            .roster
            .get(id)
            .ok_or_else(|| RosterError::UnknownEntity(id.clone()))?;
        if entity.is_fixed() {
            debug!("Ignoring click on fixed entity {}", id);
            return Ok(MoveOutcome::Fixed);
        }

        let target: Coordinate = self.jitter.apply(entity.position(), rng);
        let outcome = self.roster.move_to(id, target)?;
        self.after_move(id, outcome);
        Ok(outcome)
    }

    /// Jitter the viewer's own entity
    pub fn move_primary<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<MoveOutcome, SessionError> {
        let id = self.roster.primary().id().clone();
        self.nudge(&id, rng)
    }

    /// Flip an entity's fixed flag, returning the new value
    pub fn toggle_fixed(&mut self, id: &EntityId) -> Result<bool, SessionError> {
        let is_fixed = self.roster.toggle_fixed(id)?;
        info!("Entity {} is now {}", id, if is_fixed { "fixed" } else { "movable" });
        self.recompute(ChangeCause::FixedToggled(id.clone()));
        Ok(is_fixed)
    }

    /// Change the circle radius; alerts trigger at twice this value
    pub fn set_threshold(&mut self, threshold_m: f64) -> Result<(), SessionError> {
        validate_threshold(threshold_m)?;
        info!("Threshold changed from {} m to {} m", self.evaluator.threshold(), threshold_m);
        self.evaluator = ProximityEvaluator::new(threshold_m);
        self.recompute(ChangeCause::ThresholdChanged);
        Ok(())
    }

    fn after_move(&mut self, id: &EntityId, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Moved => self.recompute(ChangeCause::Moved(id.clone())),
            MoveOutcome::Fixed => debug!("Entity {} is fixed; move ignored", id),
        }
    }

    fn recompute(&mut self, cause: ChangeCause) {
        self.proximity = self.evaluator.evaluate(&self.roster);
        self.revision += 1;

        debug!(
            "Revision {} ({:?}): {} in range, {} alert(s)",
            self.revision,
            cause,
            self.proximity.in_range().len(),
            self.proximity.alerts().len()
        );

        let update = ProximityUpdate {
            revision: self.revision,
            cause: &cause,
            roster: &self.roster,
            threshold_m: self.evaluator.threshold(),
            proximity: &self.proximity,
        };
        self.observers.notify(&update);
    }
}
