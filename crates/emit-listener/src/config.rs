//! Registry configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! The defaults reproduce the classic emitter behaviour: a fired once
//! listener clears its whole event, and the first failing listener aborts
//! the dispatch.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::key::DEFAULT_KEY_PREFIX;

/// What gets evicted after a once listener fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnceEviction {
    /// Delete every listener registered under the event.
    #[default]
    WholeEvent,
    /// Remove only the once entry; other listeners stay registered.
    EntryOnly,
}

/// How `emit` reacts to a listener returning an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop at the first failing listener and return its error.
    #[default]
    FailFast,
    /// Run every listener, then report all failures together.
    ContinueOnError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Prepended to every derived event key.
    pub key_prefix: String,
    pub once_eviction: OnceEviction,
    pub error_policy: ErrorPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            once_eviction: OnceEviction::default(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_prefix.is_empty() {
            return Err(ConfigError::EmptyKeyPrefix);
        }
        Ok(())
    }

    pub fn with_once_eviction(mut self, once_eviction: OnceEviction) -> Self {
        self.once_eviction = once_eviction;
        self
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }
}
