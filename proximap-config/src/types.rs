use proximap_core::{Coordinate, Entity, Roster, RosterError};
use serde::Deserialize;

// --- Enums for Choices ---
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SerializerType {
    Json,
    Binary,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Stdio,
    File,
    Null,
}

// --- Configuration Sections ---

/// One seeded entity
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EntityConfig {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub is_fixed: bool,
}

impl EntityConfig {
    pub fn new(id: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            is_fixed: false,
        }
    }

    /// Validate the coordinates and build the entity
    pub fn to_entity(&self) -> Result<Entity, RosterError> {
        let position = Coordinate::new(self.latitude, self.longitude)?;
        Ok(Entity::new(self.id.as_str(), self.name.as_str(), position).with_fixed(self.is_fixed))
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct JitterSettings {
    #[serde(default = "default_span_degrees")]
    pub span_degrees: f64,
}

fn default_span_degrees() -> f64 { 0.01 }

impl Default for JitterSettings {
    fn default() -> Self {
        Self {
            span_degrees: default_span_degrees(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SerializerConfig {
    #[serde(rename = "type")]
    pub serializer_type: SerializerType,
    pub options: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SenderConfig {
    #[serde(rename = "type")]
    pub sender_type: SenderType,
    pub options: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TransportConfig {
    #[serde(default = "default_serializer")]
    pub serializer: SerializerConfig,
    #[serde(default = "default_sender")]
    pub sender: SenderConfig,
    /// Publish every Nth change only (None = every change)
    #[serde(default)]
    pub update_frequency: Option<u32>,
}

fn default_serializer() -> SerializerConfig {
    SerializerConfig {
        serializer_type: SerializerType::Json,
        options: None,
    }
}

fn default_sender() -> SenderConfig {
    SenderConfig {
        sender_type: SenderType::Stdio,
        options: None,
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            serializer: default_serializer(),
            sender: default_sender(),
            update_frequency: None,
        }
    }
}

// --- Top-Level Config Struct ---

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Circle radius around each entity, in meters
    pub threshold_distance: f64,
    pub primary: EntityConfig,
    #[serde(default)]
    pub others: Vec<EntityConfig>,
    #[serde(default)]
    pub jitter: JitterSettings,
    #[serde(default)]
    pub transport: TransportConfig,
}

/// The demo seed: three users a couple of blocks apart in lower Manhattan.
impl Default for Config {
    fn default() -> Self {
        Self {
            threshold_distance: 500.0,
            primary: EntityConfig::new("1", "Current User", 40.7128, -74.006),
            others: vec![
                EntityConfig::new("2", "User 2", 40.7138, -74.007),
                EntityConfig::new("3", "User 3", 40.7118, -74.005),
            ],
            jitter: JitterSettings::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Build the session roster from the seed entries
    pub fn build_roster(&self) -> Result<Roster, RosterError> {
        let primary = self.primary.to_entity()?;
        let others = self
            .others
            .iter()
            .map(EntityConfig::to_entity)
            .collect::<Result<Vec<_>, _>>()?;
        Roster::new(primary, others)
    }
}

// --- Serializer / Sender Options ---

#[derive(Deserialize, Debug, Clone, Default)]
pub struct JsonOptions {
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FileOptions {
    #[serde(default = "default_output_path")]
    pub path: String,
    /// Keep existing content instead of truncating on start
    #[serde(default = "default_append")]
    pub append: bool,
}

fn default_output_path() -> String { "snapshots.jsonl".to_string() }
fn default_append() -> bool { true }

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            append: default_append(),
        }
    }
}

// Helper methods for extracting options
impl SerializerConfig {
    pub fn get_json_options(&self) -> JsonOptions {
        if let Some(value) = &self.options {
            if let Ok(options) = serde_json::from_value(value.clone()) {
                return options;
            }
        }
        JsonOptions::default()
    }
}

impl SenderConfig {
    pub fn get_file_options(&self) -> FileOptions {
        if let Some(value) = &self.options {
            if let Ok(options) = serde_json::from_value(value.clone()) {
                return options;
            }
        }
        FileOptions::default()
    }
}
