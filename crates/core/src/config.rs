//! Catalog configuration
//!
//! Sources, lowest to highest precedence:
//! 1. [`ShelfConfig::default`]
//! 2. A TOML file read by [`ShelfConfig::load`]
//! 3. Environment overrides applied by [`ShelfConfig::merge_with_env`]
//!
//! ```toml
//! [limits]
//! max_title_len = 200
//! max_author_len = 100
//!
//! [store]
//! initial_capacity = 1024
//! ```

use crate::validation::ValidationLimits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Environment variable overriding `limits.max_title_len`
pub const ENV_MAX_TITLE_LEN: &str = "SHELF_MAX_TITLE_LEN";
/// Environment variable overriding `limits.max_author_len`
pub const ENV_MAX_AUTHOR_LEN: &str = "SHELF_MAX_AUTHOR_LEN";
/// Environment variable overriding `store.initial_capacity`
pub const ENV_INITIAL_CAPACITY: &str = "SHELF_INITIAL_CAPACITY";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment override could not be parsed
    #[error("invalid value for {var}: {value:?}")]
    Env {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// Values parse but make no sense
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Store sizing options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreOptions {
    /// Number of books to pre-size the indexes for
    pub initial_capacity: usize,
}

/// Top-level catalog configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShelfConfig {
    /// Field length limits
    pub limits: ValidationLimits,
    /// Store sizing
    pub store: StoreOptions,
}

impl ShelfConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ShelfConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded shelf configuration");
        Ok(config)
    }

    /// Apply `SHELF_*` environment overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary lookup
    ///
    /// Split out from [`merge_with_env`](Self::merge_with_env) so tests do
    /// not have to mutate the process environment.
    pub fn merge_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(n) = parse_override(&lookup, ENV_MAX_TITLE_LEN)? {
            self.limits.max_title_len = n;
        }
        if let Some(n) = parse_override(&lookup, ENV_MAX_AUTHOR_LEN)? {
            self.limits.max_author_len = n;
        }
        if let Some(n) = parse_override(&lookup, ENV_INITIAL_CAPACITY)? {
            self.store.initial_capacity = n;
        }
        self.validate()
    }

    /// Reject limits no input could satisfy
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_title_len == 0 {
            return Err(ConfigError::Invalid("limits.max_title_len must be positive".into()));
        }
        if self.limits.max_author_len == 0 {
            return Err(ConfigError::Invalid("limits.max_author_len must be positive".into()));
        }
        Ok(())
    }
}

fn parse_override<F>(lookup: &F, var: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => {
            let n = value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Env { var, value: value.clone() })?;
            info!(var, value = n, "applied environment override");
            Ok(Some(n))
        }
    }
}
