//! Caller-supplied options map
//!
//! Mirrors a request-scoped settings object of the shape
//! `{ "configurable": { "<field>": <value>, ... }, ... }`. Only the
//! `configurable` entries take part in resolution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::schema::SCHEMA;
use crate::error::{ConfigError, Result};

/// Options map passed alongside a research run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Per-field overrides, keyed by field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurable: Option<Map<String, Value>>,

    /// Any other run settings, carried but never read
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl RunOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Set a configurable entry
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a configurable entry in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.configurable
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
    }

    /// Value for `name`; `null` entries count as absent
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.configurable
            .as_ref()
            .and_then(|configurable| configurable.get(name))
            .filter(|value| !value.is_null())
    }

    /// Configurable keys that do not name a schema field
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.configurable
            .iter()
            .flat_map(|configurable| configurable.keys())
            .filter(|key| SCHEMA.field(key).is_none())
            .map(String::as_str)
            .collect()
    }

    /// Parse a `key=value` override.
    ///
    /// The value is kept as a string so it is coerced the same way an
    /// environment variable would be. The literal `null` clears the entry.
    pub fn parse_override(input: &str) -> std::result::Result<(String, Value), ConfigError> {
        let (key, value) = input
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidOverride {
                input: input.to_string(),
            })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::InvalidOverride {
                input: input.to_string(),
            });
        }

        let value = match value {
            "null" => Value::Null,
            other => Value::String(other.to_string()),
        };

        Ok((key.to_string(), value))
    }

    /// Parse and apply a `key=value` override
    pub fn apply_override(&mut self, input: &str) -> std::result::Result<(), ConfigError> {
        let (key, value) = Self::parse_override(input)?;
        self.set(key, value);
        Ok(())
    }
}
