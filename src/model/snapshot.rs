use crate::detect::Fingerprint;
use crate::model::record::DATETIME_FORMAT;
use chrono::{DateTime, Local};
use serde_json::Value;

/// One accepted payload, alive for the duration of a single cycle.
#[derive(Debug, Clone)]
pub struct Snapshot {
    body: Vec<u8>,
    captured_at: DateTime<Local>,
    fingerprint: Fingerprint,
}

impl Snapshot {
    /// Builds a snapshot from the bytes exactly as received.
    pub fn new(body: Vec<u8>, captured_at: DateTime<Local>) -> Self {
        let fingerprint = Fingerprint::of(&body);
        Self {
            body,
            captured_at,
            fingerprint,
        }
    }

    /// Injects `timestamp` and `checksum` into the top-level JSON object.
    ///
    /// The fingerprint keeps describing the wire bytes. Payloads that are not
    /// a JSON object are passed through untouched and left for the extractor
    /// to reject.
    pub fn with_embedded_metadata(mut self) -> Self {
        let mut value = match serde_json::from_slice::<Value>(&self.body) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) | Err(_) => {
                tracing::debug!("Payload is not a JSON object, skipping metadata injection");
                return self;
            }
        };

        if let Value::Object(map) = &mut value {
            map.insert(
                "timestamp".to_string(),
                Value::String(self.captured_at.format(DATETIME_FORMAT).to_string()),
            );
            map.insert(
                "checksum".to_string(),
                Value::String(self.fingerprint.to_string()),
            );
        }

        match serde_json::to_vec(&value) {
            Ok(body) => self.body = body,
            Err(e) => tracing::warn!("Failed to re-serialize enriched payload: {}", e),
        }
        self
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}
