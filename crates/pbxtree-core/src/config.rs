//! Project session configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::id::{HashedIds, IdGenerator, SequentialIds};

/// How new identifiers are minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum IdStrategy {
    /// Monotonic counter.
    Sequential,
    /// BLAKE3 hash of seed, counter and hint.
    #[default]
    Hashed,
}

/// Configuration for a project session.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SessionConfig {
    /// Directory that source-root and group-relative paths resolve against.
    pub source_root: PathBuf,

    /// Identifier minting strategy.
    #[builder(default)]
    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Seed for hashed identifiers.
    #[builder(default = "0")]
    #[serde(default)]
    pub id_seed: u64,
}

impl SessionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.source_root {
            if root.as_os_str().is_empty() {
                return Err("Source root cannot be empty".to_string());
            }
        } else {
            return Err("Source root is required".to_string());
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Create a new session config builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Create a simple config for a source root.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            id_strategy: IdStrategy::default(),
            id_seed: 0,
        }
    }

    /// Build the identifier generator described by this config.
    pub fn id_generator(&self) -> Box<dyn IdGenerator> {
        match self.id_strategy {
            IdStrategy::Sequential => Box::new(SequentialIds::default()),
            IdStrategy::Hashed => Box::new(HashedIds::new(self.id_seed)),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
