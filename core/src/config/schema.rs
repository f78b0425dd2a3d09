//! The configuration schema
//!
//! A literal, ordered table of every configurable field. Each entry names its
//! environment variable explicitly; a compile-time check keeps those names in
//! step with the field names.

use serde_json::{json, Map, Value};

use super::types::{LlmProvider, SearchApi};

pub const DEFAULT_MAX_WEB_RESEARCH_LOOPS: i64 = 3;
pub const DEFAULT_LOCAL_LLM: &str = "llama3.2";
pub const DEFAULT_LLM_PROVIDER: LlmProvider = LlmProvider::Ollama;
pub const DEFAULT_SEARCH_API: SearchApi = SearchApi::DuckDuckGo;
pub const DEFAULT_FETCH_FULL_PAGE: bool = true;
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434/";
pub const DEFAULT_LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";
pub const DEFAULT_STRIP_THINKING_TOKENS: bool = true;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_GROQ_MODEL: &str = "groq-bison";
pub const DEFAULT_GROQ_API_BASE_URL: &str = "https://api.groq.ai/v1";

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Boolean,
    String,
    /// A string that may be absent
    OptionalString,
    /// A string restricted to the listed names
    Choice(&'static [&'static str]),
}

impl FieldKind {
    /// Short type name for display
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::String => "string",
            FieldKind::OptionalString => "string?",
            FieldKind::Choice(_) => "enum",
        }
    }

    /// Allowed names for enumerated fields
    pub fn allowed(&self) -> Option<&'static [&'static str]> {
        match *self {
            FieldKind::Choice(allowed) => Some(allowed),
            _ => None,
        }
    }
}

/// Default value of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Integer(i64),
    Boolean(bool),
    String(&'static str),
    Null,
}

impl DefaultValue {
    pub fn to_json(&self) -> Value {
        match self {
            DefaultValue::Integer(n) => json!(n),
            DefaultValue::Boolean(b) => json!(b),
            DefaultValue::String(s) => json!(s),
            DefaultValue::Null => Value::Null,
        }
    }
}

/// A value that has been coerced to its field's declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
}

/// Descriptor of one configurable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub env_var: &'static str,
    pub kind: FieldKind,
    pub default: DefaultValue,
    pub title: &'static str,
    pub description: &'static str,
}

impl FieldSpec {
    /// Whether an API key or other secret is stored in this field
    pub fn is_secret(&self) -> bool {
        self.name.ends_with("_api_key")
    }

    /// Coerce a raw value to this field's declared type.
    ///
    /// The error is a human-readable reason, without the field name.
    pub fn coerce(&self, raw: &Value) -> Result<FieldValue, String> {
        match self.kind {
            FieldKind::Integer => coerce_integer(raw),
            FieldKind::Boolean => coerce_boolean(raw),
            FieldKind::String => match raw {
                Value::String(s) => Ok(FieldValue::String(s.clone())),
                _ => Err("must be a string".to_string()),
            },
            FieldKind::OptionalString => match raw {
                Value::String(s) => Ok(FieldValue::String(s.clone())),
                Value::Null => Ok(FieldValue::Null),
                _ => Err("must be a string or null".to_string()),
            },
            FieldKind::Choice(allowed) => match raw {
                Value::String(s) if allowed.contains(&s.as_str()) => {
                    Ok(FieldValue::String(s.clone()))
                }
                Value::String(_) => Err(format!("must be one of {}", allowed.join(", "))),
                _ => Err(format!("must be a string, one of {}", allowed.join(", "))),
            },
        }
    }
}

fn coerce_integer(raw: &Value) -> Result<FieldValue, String> {
    const REASON: &str = "must be a whole number that fits in a 64-bit signed integer";

    let parsed = match raw {
        Value::Number(n) => {
            if let Some(n) = n.as_i64() {
                Some(n)
            } else if let Some(f) = n.as_f64() {
                // Whole floats such as 4.0 are accepted, 4.5 is not
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        // true/false count as 1/0
        Value::Bool(b) => Some(i64::from(*b)),
        _ => return Err("must be an integer".to_string()),
    };

    parsed.map(FieldValue::Integer).ok_or_else(|| REASON.to_string())
}

fn coerce_boolean(raw: &Value) -> Result<FieldValue, String> {
    const REASON: &str = "must be a boolean";

    match raw {
        Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 => Ok(FieldValue::Boolean(false)),
            Some(f) if f == 1.0 => Ok(FieldValue::Boolean(true)),
            _ => Err(REASON.to_string()),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" | "y" => Ok(FieldValue::Boolean(true)),
            "false" | "0" | "no" | "off" | "f" | "n" => Ok(FieldValue::Boolean(false)),
            _ => Err(REASON.to_string()),
        },
        _ => Err(REASON.to_string()),
    }
}

/// Every configurable field, in schema order
pub const FIELDS: [FieldSpec; 13] = [
    FieldSpec {
        name: "max_web_research_loops",
        env_var: "MAX_WEB_RESEARCH_LOOPS",
        kind: FieldKind::Integer,
        default: DefaultValue::Integer(DEFAULT_MAX_WEB_RESEARCH_LOOPS),
        title: "Research Depth",
        description: "Number of research iterations to perform",
    },
    FieldSpec {
        name: "local_llm",
        env_var: "LOCAL_LLM",
        kind: FieldKind::String,
        default: DefaultValue::String(DEFAULT_LOCAL_LLM),
        title: "LLM Model Name",
        description: "Name of the LLM model to use",
    },
    FieldSpec {
        name: "llm_provider",
        env_var: "LLM_PROVIDER",
        kind: FieldKind::Choice(LlmProvider::NAMES),
        default: DefaultValue::String(DEFAULT_LLM_PROVIDER.as_str()),
        title: "LLM Provider",
        description: "Provider for the LLM (Ollama, LMStudio, OpenAI, or Groq)",
    },
    FieldSpec {
        name: "search_api",
        env_var: "SEARCH_API",
        kind: FieldKind::Choice(SearchApi::NAMES),
        default: DefaultValue::String(DEFAULT_SEARCH_API.as_str()),
        title: "Search API",
        description: "Web search API to use",
    },
    FieldSpec {
        name: "fetch_full_page",
        env_var: "FETCH_FULL_PAGE",
        kind: FieldKind::Boolean,
        default: DefaultValue::Boolean(DEFAULT_FETCH_FULL_PAGE),
        title: "Fetch Full Page",
        description: "Include the full page content in the search results",
    },
    FieldSpec {
        name: "ollama_base_url",
        env_var: "OLLAMA_BASE_URL",
        kind: FieldKind::String,
        default: DefaultValue::String(DEFAULT_OLLAMA_BASE_URL),
        title: "Ollama Base URL",
        description: "Base URL for Ollama API",
    },
    FieldSpec {
        name: "lmstudio_base_url",
        env_var: "LMSTUDIO_BASE_URL",
        kind: FieldKind::String,
        default: DefaultValue::String(DEFAULT_LMSTUDIO_BASE_URL),
        title: "LMStudio Base URL",
        description: "Base URL for LMStudio OpenAI-compatible API",
    },
    FieldSpec {
        name: "strip_thinking_tokens",
        env_var: "STRIP_THINKING_TOKENS",
        kind: FieldKind::Boolean,
        default: DefaultValue::Boolean(DEFAULT_STRIP_THINKING_TOKENS),
        title: "Strip Thinking Tokens",
        description: "Whether to strip <think> tokens from model responses",
    },
    FieldSpec {
        name: "openai_model",
        env_var: "OPENAI_MODEL",
        kind: FieldKind::String,
        default: DefaultValue::String(DEFAULT_OPENAI_MODEL),
        title: "OpenAI Model Name",
        description: "Name of the OpenAI model to use when LLM Provider is 'openai'",
    },
    FieldSpec {
        name: "openai_api_key",
        env_var: "OPENAI_API_KEY",
        kind: FieldKind::OptionalString,
        default: DefaultValue::Null,
        title: "OpenAI API Key",
        description: "API key for OpenAI; will fallback to OPENAI_API_KEY env var if not provided",
    },
    FieldSpec {
        name: "groq_model",
        env_var: "GROQ_MODEL",
        kind: FieldKind::String,
        default: DefaultValue::String(DEFAULT_GROQ_MODEL),
        title: "Groq Model Name",
        description: "Name of the Groq model to use when LLM Provider is 'groq'",
    },
    FieldSpec {
        name: "groq_api_key",
        env_var: "GROQ_API_KEY",
        kind: FieldKind::OptionalString,
        default: DefaultValue::Null,
        title: "Groq API Key",
        description: "API key for Groq; will fallback to GROQ_API_KEY env var if not provided",
    },
    FieldSpec {
        name: "groq_api_base_url",
        env_var: "GROQ_API_BASE_URL",
        kind: FieldKind::String,
        default: DefaultValue::String(DEFAULT_GROQ_API_BASE_URL),
        title: "Groq API Base URL",
        description: "Base URL for Groq API (OpenAI-compatible endpoint)",
    },
];

const fn bytes_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn is_upper_of(name: &[u8], env_var: &[u8]) -> bool {
    if name.len() != env_var.len() {
        return false;
    }
    let mut i = 0;
    while i < name.len() {
        if name[i].to_ascii_uppercase() != env_var[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn fields_are_consistent(fields: &[FieldSpec]) -> bool {
    let mut i = 0;
    while i < fields.len() {
        if !is_upper_of(fields[i].name.as_bytes(), fields[i].env_var.as_bytes()) {
            return false;
        }
        let mut j = i + 1;
        while j < fields.len() {
            if bytes_eq(fields[i].name.as_bytes(), fields[j].name.as_bytes()) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(
    fields_are_consistent(&FIELDS),
    "every field needs a unique name and an env_var equal to its upper-cased name"
);

/// Process-wide schema
pub static SCHEMA: ConfigurationSchema = ConfigurationSchema { fields: &FIELDS };

/// Ordered, immutable view over the field table
#[derive(Debug)]
pub struct ConfigurationSchema {
    fields: &'static [FieldSpec],
}

impl ConfigurationSchema {
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|field| field.name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON Schema document describing every field
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields {
            let mut property = Map::new();
            property.insert("title".to_string(), json!(field.title));
            property.insert("description".to_string(), json!(field.description));
            property.insert("default".to_string(), field.default.to_json());
            match field.kind {
                FieldKind::Integer => {
                    property.insert("type".to_string(), json!("integer"));
                }
                FieldKind::Boolean => {
                    property.insert("type".to_string(), json!("boolean"));
                }
                FieldKind::String => {
                    property.insert("type".to_string(), json!("string"));
                }
                FieldKind::OptionalString => {
                    property.insert(
                        "anyOf".to_string(),
                        json!([{ "type": "string" }, { "type": "null" }]),
                    );
                }
                FieldKind::Choice(allowed) => {
                    property.insert("type".to_string(), json!("string"));
                    property.insert("enum".to_string(), json!(allowed));
                }
            }
            properties.insert(field.name.to_string(), Value::Object(property));
        }

        json!({
            "title": "Configuration",
            "description": "The configurable fields for the research assistant.",
            "type": "object",
            "properties": properties,
        })
    }
}
