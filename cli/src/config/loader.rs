//! CLI configuration loader for researcher
//!
//! Builds the two inputs of resolution from command-line flags:
//! - the environment: the process environment, plus an optional dotenv file
//!   (`--env-file`, or `./.env` when present). Variables that are already
//!   set are never overwritten.
//! - the options map: an optional JSON file (`--options`) followed by
//!   `--set key=value` overrides, applied in order.

use anyhow::{anyhow, Context, Result};
use researcher_core::{Configuration, ProcessEnv, Provenance, RunOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the dotenv file picked up from the working directory
const DEFAULT_ENV_FILE: &str = ".env";

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Options map file
    options_path: Option<PathBuf>,
    /// `key=value` overrides, in the order given
    overrides: Vec<String>,
    /// Explicit dotenv file
    env_file: Option<PathBuf>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            options_path: None,
            overrides: Vec::new(),
            env_file: None,
        }
    }

    /// Set the options map file
    pub fn with_options_file(mut self, path: PathBuf) -> Self {
        self.options_path = Some(path);
        self
    }

    /// Add a `key=value` override
    pub fn with_override(mut self, assignment: String) -> Self {
        self.overrides.push(assignment);
        self
    }

    /// Set an explicit dotenv file
    pub fn with_env_file(mut self, path: PathBuf) -> Self {
        self.env_file = Some(path);
        self
    }

    /// Load inputs and resolve the configuration
    pub async fn load(&self) -> Result<(Configuration, Provenance)> {
        // Step 1: Populate the environment
        self.load_env_file()?;

        // Step 2: Build the options map
        let options = self.load_options().await?;

        // Step 3: Resolve
        let resolved = Configuration::resolve_with_sources(Some(&options), &ProcessEnv)
            .context("Configuration validation failed")?;

        info!(
            llm_provider = %resolved.0.llm_provider,
            search_api = %resolved.0.search_api,
            "Configuration resolved"
        );

        Ok(resolved)
    }

    /// Load the dotenv file into the process environment, returning its path
    pub fn load_env_file(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.env_file {
            if !path.is_file() {
                return Err(anyhow!("Env file does not exist: {}", path.display()));
            }
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file: {}", path.display()))?;
            debug!(path = %path.display(), "Loaded env file");
            return Ok(Some(path.clone()));
        }

        let default_path = std::env::current_dir()?.join(DEFAULT_ENV_FILE);
        if default_path.is_file() {
            dotenvy::from_path(&default_path).with_context(|| {
                format!("Failed to load env file: {}", default_path.display())
            })?;
            debug!(path = %default_path.display(), "Loaded env file");
            return Ok(Some(default_path));
        }

        Ok(None)
    }

    /// Build the options map from the file and overrides
    pub async fn load_options(&self) -> Result<RunOptions> {
        let mut options = match &self.options_path {
            Some(path) => self.load_file(path).await?,
            None => RunOptions::new(),
        };

        for assignment in &self.overrides {
            options
                .apply_override(assignment)
                .with_context(|| format!("Failed to apply --set {}", assignment))?;
        }

        Ok(options)
    }

    /// Load a single options file
    async fn load_file(&self, path: &Path) -> Result<RunOptions> {
        if !path.is_file() {
            return Err(anyhow!("Options file does not exist: {}", path.display()));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read options file: {}", path.display()))?;

        RunOptions::from_json_str(&content)
            .with_context(|| format!("Failed to parse options file: {}", path.display()))
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_options_file_then_overrides() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("options.json");
        let content = r#"{
            "configurable": {
                "search_api": "perplexity",
                "max_web_research_loops": 5
            }
        }"#;
        tokio::fs::write(&path, content).await.unwrap();

        let options = CliConfigLoader::new()
            .with_options_file(path)
            .with_override("search_api=tavily".to_string())
            .load_options()
            .await
            .unwrap();

        assert_eq!(options.get("search_api"), Some(&json!("tavily")));
        assert_eq!(options.get("max_web_research_loops"), Some(&json!(5)));
    }

    #[tokio::test]
    async fn test_missing_options_file_errors() {
        let temp_dir = tempdir().unwrap();
        let result = CliConfigLoader::new()
            .with_options_file(temp_dir.path().join("missing.json"))
            .load_options()
            .await;

        let message = result.unwrap_err().to_string();
        assert!(message.contains("Options file does not exist"));
    }

    #[tokio::test]
    async fn test_malformed_options_file_errors() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("options.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let result = CliConfigLoader::new()
            .with_options_file(path)
            .load_options()
            .await;

        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to parse options file"));
    }

    #[tokio::test]
    async fn test_bad_override_errors() {
        let result = CliConfigLoader::new()
            .with_override("search_api".to_string())
            .load_options()
            .await;

        assert!(format!("{:#}", result.unwrap_err()).contains("expected key=value"));
    }

    #[test]
    fn test_missing_env_file_errors() {
        let temp_dir = tempdir().unwrap();
        let result = CliConfigLoader::new()
            .with_env_file(temp_dir.path().join("missing.env"))
            .load_env_file();

        assert!(result.is_err());
    }
}
