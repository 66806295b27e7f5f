//! Proximity evaluation and the session that drives it.

pub mod alerts;
pub mod evaluator;
pub mod jitter;
pub mod observer;
pub mod session;

// Re-export commonly used items
pub use alerts::{AlertChanges, AlertLog};
pub use evaluator::{alert_message, ProximityEvaluator, ProximityPair, ProximitySet};
pub use jitter::{Jitter, DEFAULT_SPAN_DEGREES};
pub use observer::{ChangeCause, ObserverRegistry, ProximityObserver, ProximityUpdate};
pub use session::{Session, SessionError};
