mod sender;
mod serializer;
pub mod snapshot;

use log::{debug, error};
use proximap_config::{SenderType, SerializerType, TransportConfig};
use proximap_simulation::{ProximityObserver, ProximityUpdate};
use thiserror::Error;

// Re-export types
pub use self::sender::{FileSender, NullSender, Sender, StdioSender};
pub use self::serializer::{BinarySerializer, JsonSerializer, Serializer};
pub use self::snapshot::{HighlightColor, MarkerState, Snapshot};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("JSON serialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Binary serialization failed: {0}")]
    BinaryError(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Transport configuration error: {0}")]
    ConfigurationError(String),
}

/// Controller for handling serialization and transport of session snapshots.
///
/// Subscribed to a session as an observer, it publishes one frame per change
/// (or every Nth change when an update frequency is set).
pub struct TransportController {
    serializer: Box<dyn Serializer>,
    sender: Box<dyn Sender>,
    update_frequency: Option<u32>,
    changes_seen: u64,
    frames_sent: u64,
}

impl TransportController {
    /// Create a new transport controller with the provided serializer and sender
    pub fn new(serializer: Box<dyn Serializer>, sender: Box<dyn Sender>) -> Self {
        Self {
            serializer,
            sender,
            update_frequency: None,
            changes_seen: 0,
            frames_sent: 0,
        }
    }

    /// Only publish every `frequency`th change
    pub fn with_update_frequency(mut self, frequency: Option<u32>) -> Self {
        self.update_frequency = frequency;
        self
    }

    /// Create a transport controller from configuration
    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportError> {
        let serializer: Box<dyn Serializer> = match config.serializer.serializer_type {
            SerializerType::Json => {
                let options = config.serializer.get_json_options();
                Box::new(JsonSerializer::new(options.pretty))
            }
            SerializerType::Binary => Box::new(BinarySerializer),
        };

        let sender: Box<dyn Sender> = match config.sender.sender_type {
            SenderType::Stdio => Box::new(StdioSender::new()),
            SenderType::File => {
                let options = config.sender.get_file_options();
                if options.path.trim().is_empty() {
                    return Err(TransportError::ConfigurationError(
                        "File sender requires a non-empty path".to_string(),
                    ));
                }
                Box::new(FileSender::new(&options.path, options.append)?)
            }
            SenderType::Null => Box::new(NullSender),
        };

        if config.update_frequency == Some(0) {
            return Err(TransportError::ConfigurationError(
                "Update frequency must be greater than 0".to_string(),
            ));
        }

        Ok(Self::new(serializer, sender).with_update_frequency(config.update_frequency))
    }

    /// Serialize and send a snapshot unconditionally
    pub fn send_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), TransportError> {
        let data = self.serializer.serialize(snapshot)?;
        self.sender.send(&data)?;
        self.frames_sent += 1;
        Ok(())
    }

    /// Serialize and send the state after a change, honouring the update frequency
    pub fn publish(&mut self, update: &ProximityUpdate<'_>) -> Result<bool, TransportError> {
        self.changes_seen += 1;

        if let Some(freq) = self.update_frequency {
            if self.changes_seen % u64::from(freq) != 0 {
                return Ok(false);
            }
        }

        self.send_snapshot(&Snapshot::from_update(update))?;
        Ok(true)
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}

impl ProximityObserver for TransportController {
    fn on_change(&mut self, update: &ProximityUpdate<'_>) {
        match self.publish(update) {
            Ok(true) => debug!("Published snapshot for revision {}", update.revision),
            Ok(false) => {}
            Err(e) => error!("Failed to publish snapshot for revision {}: {}", update.revision, e),
        }
    }

    fn name(&self) -> &str {
        "transport"
    }
}
