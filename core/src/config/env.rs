//! Environment variable sources
//!
//! Resolution reads the environment through [`EnvSource`] so callers and
//! tests can supply a fixed map instead of the process environment.

use std::collections::{BTreeMap, HashMap};

/// Read-only lookup of environment variables
pub trait EnvSource {
    /// Value of `name`, or `None` when unset
    fn var(&self, name: &str) -> Option<String>;

    /// Value of `name`, treating an empty string as unset
    fn non_empty_var(&self, name: &str) -> Option<String> {
        self.var(name).filter(|value| !value.is_empty())
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        // Non-unicode values are treated as unset
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}
