//! Formatting utilities for CLI output

use researcher_core::config::{ConfigurationSchema, FieldSpec};
use researcher_core::{Configuration, Provenance, ValueSource};
use serde_json::{json, Map, Value};

// ANSI color codes
const BOLD: &str = "\x1b[1m";
const GRAY: &str = "\x1b[90m"; // Gray text for defaults and descriptions
const GREEN: &str = "\x1b[92m"; // Green text for environment values
const CYAN: &str = "\x1b[96m"; // Cyan text for options values
const RESET: &str = "\x1b[0m";

/// Shown in place of an unset optional value
const UNSET: &str = "(unset)";

/// Mask an API key, keeping a short prefix so keys can be told apart
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(3).collect();
    if secret.chars().count() > 8 {
        format!("{}***", prefix)
    } else {
        "***".to_string()
    }
}

/// Resolved configuration and schema formatter
pub struct ConfigFormatter {
    color: bool,
    reveal_secrets: bool,
}

impl ConfigFormatter {
    pub fn new(color: bool, reveal_secrets: bool) -> Self {
        Self {
            color,
            reveal_secrets,
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    /// Value as JSON, with secrets masked unless revealed
    pub fn display_json(&self, field: &FieldSpec, value: Value) -> Value {
        match value {
            Value::String(secret) if field.is_secret() && !self.reveal_secrets => {
                Value::String(mask_secret(&secret))
            }
            other => other,
        }
    }

    /// Value as plain text
    pub fn display_value(&self, field: &FieldSpec, value: Value) -> String {
        match self.display_json(field, value) {
            Value::Null => UNSET.to_string(),
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    /// One line per field: name, value, source
    pub fn format_config(
        &self,
        schema: &ConfigurationSchema,
        config: &Configuration,
        provenance: &Provenance,
    ) -> String {
        let width = schema.names().map(str::len).max().unwrap_or(0);
        let mut out = String::new();

        for field in schema.fields() {
            let value = config.get(field.name).unwrap_or(Value::Null);
            let value = self.display_value(field, value);
            let source = provenance.source(field.name).unwrap_or(ValueSource::Default);
            let tag = match source {
                ValueSource::Environment => self.paint(GREEN, &format!("[env: {}]", field.env_var)),
                ValueSource::Options => self.paint(CYAN, "[options]"),
                ValueSource::Default => self.paint(GRAY, "[default]"),
            };

            out.push_str(&format!(
                "{}  {}  {}\n",
                self.paint(BOLD, &format!("{:<width$}", field.name, width = width)),
                value,
                tag
            ));
        }

        out
    }

    /// `{"values": {...}, "sources": {...}}`
    pub fn config_json(
        &self,
        schema: &ConfigurationSchema,
        config: &Configuration,
        provenance: &Provenance,
    ) -> Value {
        let mut values = Map::new();
        let mut sources = Map::new();

        for field in schema.fields() {
            let value = config.get(field.name).unwrap_or(Value::Null);
            values.insert(field.name.to_string(), self.display_json(field, value));
            let source = provenance.source(field.name).unwrap_or(ValueSource::Default);
            sources.insert(field.name.to_string(), json!(source));
        }

        json!({ "values": values, "sources": sources })
    }

    /// Human-readable field reference
    pub fn format_schema(&self, schema: &ConfigurationSchema) -> String {
        let mut out = String::new();

        for field in schema.fields() {
            let default = match field.default.to_json() {
                Value::Null => "null".to_string(),
                Value::String(s) => format!("\"{}\"", s),
                other => other.to_string(),
            };

            out.push_str(&format!(
                "{} ({})\n",
                self.paint(BOLD, field.name),
                field.kind.type_name()
            ));
            out.push_str(&format!("  {}: {}\n", field.title, field.description));
            out.push_str(&format!("  env:     {}\n", field.env_var));
            out.push_str(&format!("  default: {}\n", default));
            if let Some(allowed) = field.kind.allowed() {
                out.push_str(&format!("  allowed: {}\n", allowed.join(", ")));
            }
            out.push('\n');
        }

        out
    }
}
