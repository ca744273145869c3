//! Persisted color-history record.
//!
//! The side-file written next to an exported model has the shape
//!
//! ```text
//! { "colorHistory": [ { "r": 255, "g": 0, "b": 0 }, ... ] }
//! ```
//!
//! Reading is lenient: a file that is not JSON, lacks `colorHistory`, or has
//! malformed entries yields whatever valid entries remain, possibly none.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::types::Rgb8;

/// Recent-colors palette as persisted beside an exported model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorHistoryRecord {
    #[serde(rename = "colorHistory")]
    pub color_history: Vec<Rgb8>,
}

impl ColorHistoryRecord {
    pub fn new(color_history: Vec<Rgb8>) -> Self {
        Self { color_history }
    }

    /// Parse a side-file, degrading to an empty record on any malformation.
    pub fn from_json_str(json: &str) -> Self {
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(err) => {
                warn!("Color history is not valid JSON: {}", err);
                return Self::default();
            }
        };

        let Some(entries) = value.get("colorHistory").and_then(Value::as_array) else {
            warn!("No colorHistory array found in color history file");
            return Self::default();
        };

        let color_history: Vec<Rgb8> = entries.iter().filter_map(parse_entry).collect();
        if color_history.len() != entries.len() {
            warn!(
                "Skipped {} malformed color history entries",
                entries.len() - color_history.len()
            );
        }
        Self { color_history }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_empty(&self) -> bool {
        self.color_history.is_empty()
    }
}

fn parse_entry(entry: &Value) -> Option<Rgb8> {
    let channel = |key: &str| -> Option<u8> { u8::try_from(entry.get(key)?.as_u64()?).ok() };
    Some(Rgb8::new(channel("r")?, channel("g")?, channel("b")?))
}
