//! # researcher Core
//!
//! Core library for the deep research assistant.
//!
//! This library declares the assistant's configurable fields and resolves
//! them from environment variables, a per-run options map and the schema
//! defaults. The research loop, search clients and LLM clients consume the
//! resolved [`Configuration`].

// Core modules
pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{
    Configuration, ConfigurationSchema, EnvSource, LlmEndpoint, LlmProvider, ProcessEnv,
    Provenance, RunOptions, SearchApi, ValueSource, SCHEMA,
};
pub use error::{ConfigError, Error, FieldIssue, Result, ValidationError};

/// Initialize tracing with a specific debug mode.
///
/// Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}
