//! JSON encode/decode with null-suppression

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Configuration for the JSON codec
#[derive(Debug, Clone, Copy)]
pub struct CodecConfig {
    /// Drop null object members when encoding
    pub drop_nulls: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { drop_nulls: true }
    }
}

/// JSON codec built from a [`CodecConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    config: CodecConfig,
}

impl JsonCodec {
    /// Create a codec with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Encode a value to a JSON string
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<String> {
        let mut value = serde_json::to_value(value)?;
        if self.config.drop_nulls {
            strip_nulls(&mut value);
        }
        Ok(value.to_string())
    }

    /// Encode an already-converted JSON value to a string
    pub fn encode_value(&self, mut value: JsonValue) -> String {
        if self.config.drop_nulls {
            strip_nulls(&mut value);
        }
        value.to_string()
    }

    /// Decode a JSON string into a typed value
    pub fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        serde_json::from_str(text).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })
    }
}

/// Remove null members from every object in the tree.
fn strip_nulls(value: &mut JsonValue) {
    match value {
        JsonValue::Object(map) => {
            map.retain(|_, v| !v.is_null());
            for v in map.values_mut() {
                strip_nulls(v);
            }
        }
        JsonValue::Array(items) => {
            for v in items.iter_mut() {
                strip_nulls(v);
            }
        }
        _ => {}
    }
}
