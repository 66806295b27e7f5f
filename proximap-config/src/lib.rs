use proximap_core::RosterError;
use std::fs;
use std::path::Path;
use thiserror::Error;

// Re-export types
pub use self::types::{
    Config, EntityConfig, FileOptions, JitterSettings, JsonOptions, SenderConfig, SenderType,
    SerializerConfig, SerializerType, TransportConfig,
};
mod types;

// Config error handling
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Invalid seed roster: {0}")]
    Roster(#[from] RosterError),
}

/// Loads and validates a configuration file.
///
/// Files ending in `.toml` are parsed as TOML, everything else as JSON.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));
    let config: Config = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    // Validate threshold
    if !config.threshold_distance.is_finite() || config.threshold_distance <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "Threshold distance must be a positive number of meters, got {}",
            config.threshold_distance
        )));
    }

    // Validate jitter span
    let span = config.jitter.span_degrees;
    if !span.is_finite() || span < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "Jitter span must be zero or positive, got {}",
            span
        )));
    }

    // Validate update frequency
    if config.transport.update_frequency == Some(0) {
        return Err(ConfigError::ValidationError(
            "Update frequency must be greater than 0".to_string(),
        ));
    }

    // Validate ids
    if let Some(entry) = std::iter::once(&config.primary)
        .chain(config.others.iter())
        .find(|entry| entry.id.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(format!(
            "Entity '{}' has an empty id",
            entry.name
        )));
    }

    // Coordinates and id uniqueness are checked by the roster itself
    config.build_roster()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn load_valid_config() {
        let file = write_json(
            r#"{
              "threshold_distance": 500,
              "primary": { "id": "1", "name": "Current User", "latitude": 40.7128, "longitude": -74.006 },
              "others": [
                { "id": "2", "name": "User 2", "latitude": 40.7138, "longitude": -74.007, "is_fixed": true }
              ],
              "jitter": { "span_degrees": 0.02 },
              "transport": {
                "serializer": { "type": "binary" },
                "sender": { "type": "file", "options": { "path": "out.jsonl" } },
                "update_frequency": 2
              }
            }"#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.threshold_distance, 500.0);
        assert_eq!(config.primary.name, "Current User");
        assert!(!config.primary.is_fixed);
        assert_eq!(config.others.len(), 1);
        assert!(config.others[0].is_fixed);
        assert_eq!(config.jitter.span_degrees, 0.02);
        assert_eq!(config.transport.serializer.serializer_type, SerializerType::Binary);
        assert_eq!(config.transport.sender.sender_type, SenderType::File);
        assert_eq!(config.transport.sender.get_file_options().path, "out.jsonl");
        assert!(config.transport.sender.get_file_options().append);
        assert_eq!(config.transport.update_frequency, Some(2));
    }

    #[test]
    fn optional_sections_take_defaults() {
        let file = write_json(
            r#"{
              "threshold_distance": 250.0,
              "primary": { "id": "me", "name": "Me", "latitude": 0.0, "longitude": 0.0 }
            }"#,
        );
        let config = load_config(file.path()).unwrap();

        assert!(config.others.is_empty());
        assert_eq!(config.jitter.span_degrees, 0.01);
        assert_eq!(config.transport.serializer.serializer_type, SerializerType::Json);
        assert_eq!(config.transport.sender.sender_type, SenderType::Stdio);
        assert!(!config.transport.serializer.get_json_options().pretty);
        assert_eq!(config.transport.update_frequency, None);
    }

    #[test]
    fn load_toml_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("session.toml");
        file.write_str(
            r#"
threshold_distance = 300.0

[primary]
id = "1"
name = "Current User"
latitude = 40.7128
longitude = -74.006

[[others]]
id = "2"
name = "User 2"
latitude = 40.7138
longitude = -74.007

[transport.serializer]
type = "json"
options = { pretty = true }
"#,
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.threshold_distance, 300.0);
        assert_eq!(config.others[0].id, "2");
        assert!(config.transport.serializer.get_json_options().pretty);
        temp.close().unwrap();
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let file = write_json(
            r#"{
              "threshold_distance": 0,
              "primary": { "id": "1", "name": "Me", "latitude": 0.0, "longitude": 0.0 }
            }"#,
        );
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let file = write_json(
            r#"{
              "threshold_distance": 100,
              "primary": { "id": "1", "name": "Me", "latitude": 0.0, "longitude": 0.0 },
              "others": [ { "id": "1", "name": "Also me", "latitude": 1.0, "longitude": 1.0 } ]
            }"#,
        );
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Roster(RosterError::DuplicateId(_)))));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let file = write_json(
            r#"{
              "threshold_distance": 100,
              "primary": { "id": "1", "name": "Me", "latitude": 123.0, "longitude": 0.0 }
            }"#,
        );
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Roster(RosterError::InvalidCoordinate { .. }))));
    }

    #[test]
    fn rejects_zero_update_frequency() {
        let mut config = Config::default();
        config.transport.update_frequency = Some(0);
        assert!(matches!(validate(&config), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn default_config_is_the_demo_seed() {
        let config = Config::default();
        validate(&config).unwrap();

        let roster = config.build_roster().unwrap();
        let names: Vec<&str> = roster.iter().map(|e| e.display_name()).collect();
        assert_eq!(names, vec!["Current User", "User 2", "User 3"]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_config(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ConfigError::FileReadError(_))));
    }
}
