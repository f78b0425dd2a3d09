//! Error types and handling for the researcher core

use std::fmt;

use thiserror::Error;

use crate::config::ValueSource;

/// Result type alias for researcher operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the researcher core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid override '{input}': expected key=value")]
    InvalidOverride { input: String },
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Config(ConfigError::Validation(err))
    }
}

/// A single field that failed type coercion or membership checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Schema field name
    pub field: &'static str,
    /// Where the rejected value came from
    pub source: ValueSource,
    /// The rejected value, rendered as JSON
    pub value: String,
    /// Why it was rejected
    pub reason: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (got {} from {})",
            self.field, self.reason, self.value, self.source
        )
    }
}

/// Raised when resolved values do not fit the schema. Carries every failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// Names of the fields that failed
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.issues.iter().map(|issue| issue.field)
    }

    /// Look up the issue for a specific field
    pub fn issue(&self, field: &str) -> Option<&FieldIssue> {
        self.issues.iter().find(|issue| issue.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.issues.len();
        write!(
            f,
            "{} validation error{} for Configuration",
            count,
            if count == 1 { "" } else { "s" }
        )?;
        for issue in &self.issues {
            write!(f, "\n  {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
