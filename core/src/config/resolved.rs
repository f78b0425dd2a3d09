//! Resolved configuration and the resolver
//!
//! Each field is taken from, in order of precedence:
//! 1. the environment variable named after the field (non-empty values only)
//! 2. the `configurable` entry in the run options (non-null values only)
//! 3. the schema default
//!
//! Values are then coerced to the field's declared type. Every failing field
//! is reported in a single [`ValidationError`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use super::env::{EnvSource, ProcessEnv};
use super::options::RunOptions;
use super::schema::{self, FieldSpec, FieldValue, SCHEMA};
use super::types::{LlmProvider, SearchApi};
use crate::error::{FieldIssue, ValidationError};

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Environment,
    Options,
    Default,
}

impl ValueSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueSource::Environment => "environment",
            ValueSource::Options => "options",
            ValueSource::Default => "default",
        }
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of every resolved field, in schema order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Provenance {
    entries: Vec<(&'static str, ValueSource)>,
}

impl Provenance {
    /// Source of the named field
    pub fn source(&self, field: &str) -> Option<ValueSource> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, source)| *source)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ValueSource)> + '_ {
        self.entries.iter().copied()
    }
}

/// The configurable fields for the research assistant, fully resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Number of research iterations to perform
    pub max_web_research_loops: i64,
    /// Name of the LLM model to use with local providers
    pub local_llm: String,
    pub llm_provider: LlmProvider,
    pub search_api: SearchApi,
    /// Include the full page content in the search results
    pub fetch_full_page: bool,
    pub ollama_base_url: String,
    pub lmstudio_base_url: String,
    /// Whether to strip `<think>` tokens from model responses
    pub strip_thinking_tokens: bool,
    pub openai_model: String,
    pub openai_api_key: Option<String>,
    pub groq_model: String,
    pub groq_api_key: Option<String>,
    pub groq_api_base_url: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            max_web_research_loops: schema::DEFAULT_MAX_WEB_RESEARCH_LOOPS,
            local_llm: schema::DEFAULT_LOCAL_LLM.to_string(),
            llm_provider: schema::DEFAULT_LLM_PROVIDER,
            search_api: schema::DEFAULT_SEARCH_API,
            fetch_full_page: schema::DEFAULT_FETCH_FULL_PAGE,
            ollama_base_url: schema::DEFAULT_OLLAMA_BASE_URL.to_string(),
            lmstudio_base_url: schema::DEFAULT_LMSTUDIO_BASE_URL.to_string(),
            strip_thinking_tokens: schema::DEFAULT_STRIP_THINKING_TOKENS,
            openai_model: schema::DEFAULT_OPENAI_MODEL.to_string(),
            openai_api_key: None,
            groq_model: schema::DEFAULT_GROQ_MODEL.to_string(),
            groq_api_key: None,
            groq_api_base_url: schema::DEFAULT_GROQ_API_BASE_URL.to_string(),
        }
    }
}

/// Connection details for the selected LLM provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmEndpoint<'a> {
    pub provider: LlmProvider,
    pub model: &'a str,
    /// `None` means the provider's own default endpoint
    pub base_url: Option<&'a str>,
    pub api_key: Option<&'a str>,
}

impl Configuration {
    /// Resolve against the process environment
    pub fn from_options(options: Option<&RunOptions>) -> Result<Self, ValidationError> {
        Self::resolve(options, &ProcessEnv)
    }

    /// Resolve every field from `env`, then `options`, then the schema default
    pub fn resolve<E>(options: Option<&RunOptions>, env: &E) -> Result<Self, ValidationError>
    where
        E: EnvSource + ?Sized,
    {
        Self::resolve_with_sources(options, env).map(|(config, _)| config)
    }

    /// Like [`Configuration::resolve`], also reporting where each value came from
    pub fn resolve_with_sources<E>(
        options: Option<&RunOptions>,
        env: &E,
    ) -> Result<(Self, Provenance), ValidationError>
    where
        E: EnvSource + ?Sized,
    {
        if let Some(options) = options {
            for key in options.unknown_keys() {
                debug!(key, "Ignoring option that is not a configuration field");
            }
        }

        let mut config = Configuration::default();
        let mut provenance = Provenance::default();
        let mut issues = Vec::new();

        for field in SCHEMA.fields() {
            let (raw, source) = match lookup(field, options, env) {
                Some(found) => found,
                None => {
                    provenance.entries.push((field.name, ValueSource::Default));
                    continue;
                }
            };

            debug!(field = field.name, source = %source, "Resolved configuration field");

            let applied = field
                .coerce(&raw)
                .and_then(|value| config.apply(field.name, value));
            match applied {
                Ok(()) => provenance.entries.push((field.name, source)),
                Err(reason) => issues.push(FieldIssue {
                    field: field.name,
                    source,
                    value: render(field, &raw),
                    reason,
                }),
            }
        }

        if !issues.is_empty() {
            let err = ValidationError::new(issues);
            let failed: Vec<&str> = err.fields().collect();
            warn!(fields = ?failed, "Configuration failed validation");
            return Err(err);
        }

        Ok((config, provenance))
    }

    /// Store a coerced value in the named field
    fn apply(&mut self, name: &str, value: FieldValue) -> Result<(), String> {
        match (name, value) {
            ("max_web_research_loops", FieldValue::Integer(n)) => self.max_web_research_loops = n,
            ("local_llm", FieldValue::String(s)) => self.local_llm = s,
            ("llm_provider", FieldValue::String(s)) => {
                self.llm_provider = s.parse::<LlmProvider>().map_err(|e| e.to_string())?
            }
            ("search_api", FieldValue::String(s)) => {
                self.search_api = s.parse::<SearchApi>().map_err(|e| e.to_string())?
            }
            ("fetch_full_page", FieldValue::Boolean(b)) => self.fetch_full_page = b,
            ("ollama_base_url", FieldValue::String(s)) => self.ollama_base_url = s,
            ("lmstudio_base_url", FieldValue::String(s)) => self.lmstudio_base_url = s,
            ("strip_thinking_tokens", FieldValue::Boolean(b)) => self.strip_thinking_tokens = b,
            ("openai_model", FieldValue::String(s)) => self.openai_model = s,
            ("openai_api_key", FieldValue::String(s)) => self.openai_api_key = Some(s),
            ("openai_api_key", FieldValue::Null) => self.openai_api_key = None,
            ("groq_model", FieldValue::String(s)) => self.groq_model = s,
            ("groq_api_key", FieldValue::String(s)) => self.groq_api_key = Some(s),
            ("groq_api_key", FieldValue::Null) => self.groq_api_key = None,
            ("groq_api_base_url", FieldValue::String(s)) => self.groq_api_base_url = s,
            (name, value) => return Err(format!("cannot store {value:?} in field '{name}'")),
        }
        Ok(())
    }

    /// Value of the named field as JSON
    pub fn get(&self, name: &str) -> Option<Value> {
        let value = match name {
            "max_web_research_loops" => Value::from(self.max_web_research_loops),
            "local_llm" => Value::from(self.local_llm.as_str()),
            "llm_provider" => Value::from(self.llm_provider.as_str()),
            "search_api" => Value::from(self.search_api.as_str()),
            "fetch_full_page" => Value::from(self.fetch_full_page),
            "ollama_base_url" => Value::from(self.ollama_base_url.as_str()),
            "lmstudio_base_url" => Value::from(self.lmstudio_base_url.as_str()),
            "strip_thinking_tokens" => Value::from(self.strip_thinking_tokens),
            "openai_model" => Value::from(self.openai_model.as_str()),
            "openai_api_key" => Value::from(self.openai_api_key.as_deref()),
            "groq_model" => Value::from(self.groq_model.as_str()),
            "groq_api_key" => Value::from(self.groq_api_key.as_deref()),
            "groq_api_base_url" => Value::from(self.groq_api_base_url.as_str()),
            _ => return None,
        };
        Some(value)
    }

    /// Model, base URL and key for the selected LLM provider
    pub fn llm_endpoint(&self) -> LlmEndpoint<'_> {
        let (model, base_url, api_key) = match self.llm_provider {
            LlmProvider::Ollama => (self.local_llm.as_str(), Some(self.ollama_base_url.as_str()), None),
            LlmProvider::LmStudio => (
                self.local_llm.as_str(),
                Some(self.lmstudio_base_url.as_str()),
                None,
            ),
            LlmProvider::OpenAI => (self.openai_model.as_str(), None, self.openai_api_key.as_deref()),
            LlmProvider::Groq => (
                self.groq_model.as_str(),
                Some(self.groq_api_base_url.as_str()),
                self.groq_api_key.as_deref(),
            ),
        };

        LlmEndpoint {
            provider: self.llm_provider,
            model,
            base_url,
            api_key,
        }
    }
}

/// Environment first, then options
fn lookup<E>(
    field: &FieldSpec,
    options: Option<&RunOptions>,
    env: &E,
) -> Option<(Value, ValueSource)>
where
    E: EnvSource + ?Sized,
{
    if let Some(value) = env.non_empty_var(field.env_var) {
        return Some((Value::String(value), ValueSource::Environment));
    }

    options
        .and_then(|options| options.get(field.name))
        .map(|value| (value.clone(), ValueSource::Options))
}

/// Render a rejected value for error messages, hiding secrets
fn render(field: &FieldSpec, raw: &Value) -> String {
    if field.is_secret() {
        "\"***\"".to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_any_source() {
        let config = Configuration::resolve(None, &env(&[])).unwrap();

        assert_eq!(config, Configuration::default());
        assert_eq!(config.max_web_research_loops, 3);
        assert_eq!(config.local_llm, "llama3.2");
        assert_eq!(config.llm_provider, LlmProvider::Ollama);
        assert_eq!(config.search_api, SearchApi::DuckDuckGo);
        assert!(config.fetch_full_page);
        assert_eq!(config.ollama_base_url, "http://localhost:11434/");
        assert_eq!(config.lmstudio_base_url, "http://localhost:1234/v1");
        assert!(config.strip_thinking_tokens);
        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.groq_model, "groq-bison");
        assert_eq!(config.groq_api_key, None);
        assert_eq!(config.groq_api_base_url, "https://api.groq.ai/v1");
    }

    #[test]
    fn test_default_matches_schema_table() {
        let config = Configuration::default();
        for field in SCHEMA.fields() {
            assert_eq!(
                config.get(field.name),
                Some(field.default.to_json()),
                "{}",
                field.name
            );
        }
        assert_eq!(config.get("not_a_field"), None);
    }

    #[test]
    fn test_empty_options_map_gives_defaults() {
        let options = RunOptions::new();
        let config = Configuration::resolve(Some(&options), &env(&[])).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_environment_overrides_options() {
        let options = RunOptions::new().with("search_api", "perplexity");
        let config =
            Configuration::resolve(Some(&options), &env(&[("SEARCH_API", "tavily")])).unwrap();
        assert_eq!(config.search_api, SearchApi::Tavily);
    }

    #[test]
    fn test_options_override_default() {
        let options = RunOptions::new().with("llm_provider", "groq");
        let config = Configuration::resolve(Some(&options), &env(&[])).unwrap();
        assert_eq!(config.llm_provider, LlmProvider::Groq);
    }

    #[test]
    fn test_lowercase_env_name_is_ignored() {
        let config = Configuration::resolve(None, &env(&[("search_api", "tavily")])).unwrap();
        assert_eq!(config.search_api, SearchApi::DuckDuckGo);
    }

    #[test]
    fn test_empty_env_falls_through_to_options() {
        let options = RunOptions::new().with("local_llm", "qwen3:8b");
        let config = Configuration::resolve(Some(&options), &env(&[("LOCAL_LLM", "")])).unwrap();
        assert_eq!(config.local_llm, "qwen3:8b");
    }

    #[test]
    fn test_null_option_uses_default() {
        let options = RunOptions::new()
            .with("openai_model", Value::Null)
            .with("openai_api_key", Value::Null);
        let config = Configuration::resolve(Some(&options), &env(&[])).unwrap();
        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert_eq!(config.openai_api_key, None);
    }

    #[test]
    fn test_env_values_are_coerced() {
        let config = Configuration::resolve(
            None,
            &env(&[
                ("MAX_WEB_RESEARCH_LOOPS", "7"),
                ("FETCH_FULL_PAGE", "false"),
                ("STRIP_THINKING_TOKENS", "0"),
                ("OPENAI_API_KEY", "sk-test"),
            ]),
        )
        .unwrap();

        assert_eq!(config.max_web_research_loops, 7);
        assert!(!config.fetch_full_page);
        assert!(!config.strip_thinking_tokens);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_options_values_are_coerced() {
        let options = RunOptions::new()
            .with("max_web_research_loops", json!("4"))
            .with("fetch_full_page", json!(0))
            .with("groq_api_key", "gsk-test");
        let config = Configuration::resolve(Some(&options), &env(&[])).unwrap();

        assert_eq!(config.max_web_research_loops, 4);
        assert!(!config.fetch_full_page);
        assert_eq!(config.groq_api_key.as_deref(), Some("gsk-test"));
    }

    #[test]
    fn test_negative_and_wide_loop_counts_are_accepted() {
        let options = RunOptions::new().with("max_web_research_loops", json!(-1));
        let config = Configuration::resolve(Some(&options), &env(&[])).unwrap();
        assert_eq!(config.max_web_research_loops, -1);

        let config = Configuration::resolve(
            Some(&options),
            &env(&[("MAX_WEB_RESEARCH_LOOPS", "5000000000")]),
        )
        .unwrap();
        assert_eq!(config.max_web_research_loops, 5_000_000_000);
        assert_eq!(config.get("max_web_research_loops"), Some(json!(5_000_000_000i64)));
    }

    #[test]
    fn test_from_options_reads_options_map() {
        let options = RunOptions::new().with("search_api", "searxng");
        let config = Configuration::from_options(Some(&options)).unwrap();

        // A SEARCH_API set in the surrounding environment still wins
        match ProcessEnv.non_empty_var("SEARCH_API") {
            Some(name) => assert_eq!(config.search_api.as_str(), name),
            None => assert_eq!(config.search_api, SearchApi::Searxng),
        }
    }

    #[test]
    fn test_unknown_search_api_fails() {
        let options = RunOptions::new().with("search_api", "bing");
        let err = Configuration::resolve(Some(&options), &env(&[])).unwrap_err();

        let issue = err.issue("search_api").unwrap();
        assert_eq!(issue.source, ValueSource::Options);
        assert_eq!(issue.value, "\"bing\"");
        assert!(issue.reason.contains("perplexity, tavily, duckduckgo, searxng"));
    }

    #[test]
    fn test_invalid_env_value_fails_even_when_option_is_valid() {
        let options = RunOptions::new().with("llm_provider", "openai");
        let err = Configuration::resolve(Some(&options), &env(&[("LLM_PROVIDER", "anthropic")]))
            .unwrap_err();
        assert_eq!(err.issue("llm_provider").unwrap().source, ValueSource::Environment);
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let options = RunOptions::new()
            .with("max_web_research_loops", "many")
            .with("fetch_full_page", "sometimes")
            .with("local_llm", json!(3));
        let err =
            Configuration::resolve(Some(&options), &env(&[("SEARCH_API", "bing")])).unwrap_err();

        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            [
                "max_web_research_loops",
                "local_llm",
                "search_api",
                "fetch_full_page"
            ]
        );
    }

    #[test]
    fn test_secret_values_are_masked_in_errors() {
        let options = RunOptions::new().with("openai_api_key", json!(12345));
        let err = Configuration::resolve(Some(&options), &env(&[])).unwrap_err();
        let issue = err.issue("openai_api_key").unwrap();
        assert_eq!(issue.value, "\"***\"");
        assert!(!err.to_string().contains("12345"));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let options = RunOptions::new()
            .with("llm_provider", "lmstudio")
            .with("max_web_research_loops", 2);
        let env = env(&[("SEARCH_API", "searxng")]);

        let first = Configuration::resolve(Some(&options), &env).unwrap();
        let second = Configuration::resolve(Some(&options), &env).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_provenance_reports_sources() {
        let options = RunOptions::new()
            .with("search_api", "perplexity")
            .with("llm_provider", "groq");
        let (_, provenance) = Configuration::resolve_with_sources(
            Some(&options),
            &env(&[("SEARCH_API", "tavily")]),
        )
        .unwrap();

        assert_eq!(provenance.source("search_api"), Some(ValueSource::Environment));
        assert_eq!(provenance.source("llm_provider"), Some(ValueSource::Options));
        assert_eq!(provenance.source("local_llm"), Some(ValueSource::Default));
        assert_eq!(provenance.source("unknown"), None);
        assert_eq!(provenance.iter().count(), SCHEMA.len());
    }

    #[test]
    fn test_unknown_option_keys_are_ignored() {
        let options = RunOptions::new().with("thread_id", "run-1");
        let config = Configuration::resolve(Some(&options), &env(&[])).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_llm_endpoint_follows_provider() {
        let mut config = Configuration::default();
        let endpoint = config.llm_endpoint();
        assert_eq!(endpoint.provider, LlmProvider::Ollama);
        assert_eq!(endpoint.model, "llama3.2");
        assert_eq!(endpoint.base_url, Some("http://localhost:11434/"));
        assert_eq!(endpoint.api_key, None);

        config.llm_provider = LlmProvider::LmStudio;
        assert_eq!(config.llm_endpoint().base_url, Some("http://localhost:1234/v1"));

        config.llm_provider = LlmProvider::OpenAI;
        config.openai_api_key = Some("sk-test".to_string());
        let endpoint = config.llm_endpoint();
        assert_eq!(endpoint.model, "gpt-3.5-turbo");
        assert_eq!(endpoint.base_url, None);
        assert_eq!(endpoint.api_key, Some("sk-test"));

        config.llm_provider = LlmProvider::Groq;
        let endpoint = config.llm_endpoint();
        assert_eq!(endpoint.model, "groq-bison");
        assert_eq!(endpoint.base_url, Some("https://api.groq.ai/v1"));
        assert_eq!(endpoint.api_key, None);
    }

    #[test]
    fn test_serializes_with_field_names() {
        let value = serde_json::to_value(Configuration::default()).unwrap();
        assert_eq!(value["search_api"], json!("duckduckgo"));
        assert_eq!(value["llm_provider"], json!("ollama"));
        assert_eq!(value["openai_api_key"], Value::Null);
        assert_eq!(value.as_object().unwrap().len(), SCHEMA.len());
    }
}
