//! Mailer configuration
//!
//! Configuration is read from RON, with every field optional:
//!
//! ```ron
//! (
//!     context_policy: Clear,
//!     bus: (
//!         capacity: 1000,
//!     ),
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{bus::InMemoryBus, error::ConfigError};

/// What to do with a template context that cannot be serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextPolicy {
    /// Empty the context and queue the email anyway. Template variables are
    /// lost; rendering falls back to whatever the consumer provides.
    #[default]
    Clear,
    /// Fail the send with
    /// [`MailerError::UnserializableContext`](crate::MailerError::UnserializableContext).
    Reject,
}

/// Configuration for the in-memory bus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBusConfig {
    /// Maximum number of envelopes to hold (omit for unlimited)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub capacity: Option<usize>,
}

impl MemoryBusConfig {
    #[must_use]
    pub fn into_bus(self) -> InMemoryBus {
        self.capacity
            .map_or_else(InMemoryBus::new, InMemoryBus::with_capacity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailerConfig {
    #[serde(default)]
    pub context_policy: ContextPolicy,

    #[serde(default)]
    pub bus: MemoryBusConfig,
}

impl MailerConfig {
    ///
    /// Parse a configuration from a RON string.
    ///
    /// Optional values may be written without `Some(..)`.
    ///
    /// # Errors
    ///
    /// If the string is not valid RON for this schema.
    ///
    pub fn from_ron(config: &str) -> Result<Self, ConfigError> {
        Ok(ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .from_str(config)?)
    }

    ///
    /// Read and parse a RON configuration file.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or does not parse.
    ///
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }
}
