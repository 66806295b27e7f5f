//! Textual host events, one per line, standing in for map gestures.

use proximap_core::{EntityId, MoveOutcome};
use proximap_simulation::{Session, SessionError};
use rand::Rng;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventParseError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    WrongArity { command: &'static str, expected: &'static str },

    #[error("'{0}' is not a number")]
    InvalidNumber(String),
}

/// A gesture from the host surface
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Click on a marker: jitter it unless fixed
    Click(EntityId),
    /// Move to explicit coordinates
    Move { id: EntityId, latitude: f64, longitude: f64 },
    /// The "Move Current User" button
    MovePrimary,
    /// The fix/unfix button in a marker popup
    ToggleFixed(EntityId),
    SetThreshold(f64),
    /// Republish the current state
    Show,
    Quit,
}

fn parse_number(token: &str) -> Result<f64, EventParseError> {
    token
        .parse::<f64>()
        .map_err(|_| EventParseError::InvalidNumber(token.to_string()))
}

impl FromStr for HostEvent {
    type Err = EventParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (command, args) = match tokens.split_first() {
            Some((command, args)) => (*command, args),
            None => return Err(EventParseError::UnknownCommand(String::new())),
        };

        match (command.to_ascii_lowercase().as_str(), args) {
            ("click", [id]) => Ok(HostEvent::Click(EntityId::new(*id))),
            ("click", _) => Err(EventParseError::WrongArity { command: "click", expected: "<id>" }),
            ("move", [id, lat, lng]) => Ok(HostEvent::Move {
                id: EntityId::new(*id),
                latitude: parse_number(lat)?,
                longitude: parse_number(lng)?,
            }),
            ("move", _) => Err(EventParseError::WrongArity { command: "move", expected: "<id> <lat> <lng>" }),
            ("move-primary", []) => Ok(HostEvent::MovePrimary),
            ("move-primary", _) => Err(EventParseError::WrongArity { command: "move-primary", expected: "no arguments" }),
            ("toggle", [id]) => Ok(HostEvent::ToggleFixed(EntityId::new(*id))),
            ("toggle", _) => Err(EventParseError::WrongArity { command: "toggle", expected: "<id>" }),
            ("threshold", [meters]) => Ok(HostEvent::SetThreshold(parse_number(meters)?)),
            ("threshold", _) => Err(EventParseError::WrongArity { command: "threshold", expected: "<meters>" }),
            ("show", []) => Ok(HostEvent::Show),
            ("quit", []) | ("exit", []) => Ok(HostEvent::Quit),
            _ => Err(EventParseError::UnknownCommand(command.to_string())),
        }
    }
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Option<Result<HostEvent, EventParseError>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(trimmed.parse())
}

/// Whether the session should keep reading events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Applies an event to the session.
pub fn apply<R: Rng + ?Sized>(session: &mut Session, event: &HostEvent, rng: &mut R) -> Result<Flow, SessionError> {
    match event {
        HostEvent::Click(id) => {
            report_move(id, session.nudge(id, rng)?);
        }
        HostEvent::Move { id, latitude, longitude } => {
            report_move(id, session.move_entity(id, *latitude, *longitude)?);
        }
        HostEvent::MovePrimary => {
            let id = session.roster().primary().id().clone();
            report_move(&id, session.move_primary(rng)?);
        }
        HostEvent::ToggleFixed(id) => {
            session.toggle_fixed(id)?;
        }
        HostEvent::SetThreshold(meters) => session.set_threshold(*meters)?,
        HostEvent::Show => session.refresh(),
        HostEvent::Quit => return Ok(Flow::Stop),
    }
    Ok(Flow::Continue)
}

fn report_move(id: &EntityId, outcome: MoveOutcome) {
    if outcome == MoveOutcome::Fixed {
        log::info!("{} is fixed; location unchanged", id);
    }
}
