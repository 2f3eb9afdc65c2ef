//! FuncLang runtime configuration
//!
//! Configuration is read from TOML. Every field has a default, so an empty
//! document is a valid configuration.
//!
//! ```toml
//! [heap]
//! initial_capacity = 64
//! trace_allocations = false
//!
//! [log]
//! level = "debug"
//! ```
//!
//! # Usage
//!
//! ```rust
//! use funclang::util::config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_toml_str("[heap]\ninitial_capacity = 64\n").unwrap();
//! assert_eq!(config.heap.initial_capacity, 64);
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runtime::memory::HeapConfig;
use crate::util::logger::LogLevel;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RuntimeConfig {
    /// Heap settings
    #[serde(default)]
    pub heap: HeapConfig,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
}

impl RuntimeConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::ParseError)
    }

    /// Load configuration from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::IoError(e)),
        };
        Self::from_toml_str(&content)
    }

    /// Render configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Config parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Config serialize error: {0}")]
    SerializeError(toml::ser::Error),
}
