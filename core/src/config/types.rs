//! Enumerated configuration values
//!
//! Names are matched exactly and in lower case, the same spelling used in
//! environment variables and options maps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Web search backends the research loop can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchApi {
    Perplexity,
    Tavily,
    #[serde(rename = "duckduckgo")]
    DuckDuckGo,
    Searxng,
}

impl SearchApi {
    /// All variants, in schema order
    pub const ALL: [SearchApi; 4] = [
        SearchApi::Perplexity,
        SearchApi::Tavily,
        SearchApi::DuckDuckGo,
        SearchApi::Searxng,
    ];

    /// Allowed names, in schema order
    pub const NAMES: &'static [&'static str] = &["perplexity", "tavily", "duckduckgo", "searxng"];

    /// Get the search API name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            SearchApi::Perplexity => "perplexity",
            SearchApi::Tavily => "tavily",
            SearchApi::DuckDuckGo => "duckduckgo",
            SearchApi::Searxng => "searxng",
        }
    }
}

impl fmt::Display for SearchApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchApi {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchApi::ALL
            .into_iter()
            .find(|api| api.as_str() == s)
            .ok_or_else(|| UnknownVariant::new(s, SearchApi::NAMES))
    }
}

/// LLM backends the research loop can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Ollama,
    #[serde(rename = "lmstudio")]
    LmStudio,
    #[serde(rename = "openai")]
    OpenAI,
    Groq,
}

impl LlmProvider {
    /// All variants, in schema order
    pub const ALL: [LlmProvider; 4] = [
        LlmProvider::Ollama,
        LlmProvider::LmStudio,
        LlmProvider::OpenAI,
        LlmProvider::Groq,
    ];

    /// Allowed names, in schema order
    pub const NAMES: &'static [&'static str] = &["ollama", "lmstudio", "openai", "groq"];

    /// Get the provider name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "ollama",
            LlmProvider::LmStudio => "lmstudio",
            LlmProvider::OpenAI => "openai",
            LlmProvider::Groq => "groq",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LlmProvider::ALL
            .into_iter()
            .find(|provider| provider.as_str() == s)
            .ok_or_else(|| UnknownVariant::new(s, LlmProvider::NAMES))
    }
}

/// A name that is not a member of an enumerated set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not one of {}", .allowed.join(", "))]
pub struct UnknownVariant {
    pub value: String,
    pub allowed: &'static [&'static str],
}

impl UnknownVariant {
    fn new(value: &str, allowed: &'static [&'static str]) -> Self {
        Self {
            value: value.to_string(),
            allowed,
        }
    }
}
