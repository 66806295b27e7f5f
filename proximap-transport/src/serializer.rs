use crate::snapshot::Snapshot;
use crate::TransportError;

/// Serializes a snapshot into one transport frame.
pub trait Serializer: Send + Sync {
    fn serialize(&self, snapshot: &Snapshot) -> Result<Vec<u8>, TransportError>;
}

/// One JSON document per snapshot.
#[derive(Debug, Default, Clone)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, snapshot: &Snapshot) -> Result<Vec<u8>, TransportError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(snapshot)?
        } else {
            serde_json::to_vec(snapshot)?
        };
        Ok(bytes)
    }
}

/// bincode payload, base64 encoded so that every frame stays a single text line.
#[derive(Debug, Default, Clone)]
pub struct BinarySerializer;

impl Serializer for BinarySerializer {
    fn serialize(&self, snapshot: &Snapshot) -> Result<Vec<u8>, TransportError> {
        let payload = bincode::serialize(snapshot)?;
        Ok(base64::encode(&payload).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            revision: 1,
            cause: "initial".to_string(),
            center: (40.7128, -74.006),
            threshold_m: 500.0,
            trigger_distance_m: 1000.0,
            markers: Vec::new(),
            alerts: vec!["A and B are within range!".to_string()],
        }
    }

    #[test]
    fn json_contains_alerts() {
        let bytes = JsonSerializer::default().serialize(&snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["revision"], 1);
        assert_eq!(value["alerts"][0], "A and B are within range!");
        assert_eq!(value["center"][0], 40.7128);
    }

    #[test]
    fn pretty_json_spans_lines() {
        let bytes = JsonSerializer::new(true).serialize(&snapshot()).unwrap();
        assert!(bytes.contains(&b'\n'));
    }

    #[test]
    fn binary_is_base64_of_bincode() {
        let bytes = BinarySerializer.serialize(&snapshot()).unwrap();
        let decoded = base64::decode(&bytes).unwrap();
        assert_eq!(decoded, bincode::serialize(&snapshot()).unwrap());
        assert!(!bytes.contains(&b'\n'));
    }
}
