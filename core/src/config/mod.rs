//! Configuration module for the researcher core
//!
//! Declares the field schema and resolves a [`Configuration`] from the
//! environment, a caller-supplied options map and the schema defaults.

pub mod env;
pub mod options;
pub mod resolved;
pub mod schema;
pub mod types;

pub use env::{EnvSource, ProcessEnv};
pub use options::RunOptions;
pub use resolved::{Configuration, LlmEndpoint, Provenance, ValueSource};
pub use schema::{ConfigurationSchema, DefaultValue, FieldKind, FieldSpec, FieldValue, SCHEMA};
pub use types::{LlmProvider, SearchApi, UnknownVariant};
