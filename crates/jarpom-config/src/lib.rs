//! jarpom configuration
//!
//! Provides the settings consumed by the resolver and the POM renderer:
//! - Prefix group rules, pinned versions, suffix rewrites, priorities
//! - Local repository and search service settings
//! - POM coordinates and header/footer templates
//!
//! # Configuration Hierarchy
//!
//! Sources are layered in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config (~/.jarpom/config.toml)
//! 3. Project config (./jarpom.toml, searched upwards) or an explicit file
//! 4. Environment variables (JARPOM_*)
//! 5. CLI flags (handled by caller)
//!
//! # Example
//!
//! ```no_run
//! use jarpom_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loaded = ConfigLoader::new().load(None, Path::new(".")).unwrap();
//! println!("search service: {}", loaded.settings.search.url);
//! ```

pub mod file;
pub mod loader;
pub mod settings;
pub mod template;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file {file}: {error}")]
    IoError {
        file: PathBuf,
        error: std::io::Error,
    },

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid value for '{field}' in {file}: {reason}")]
    InvalidFileValue {
        field: String,
        reason: String,
        file: PathBuf,
    },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Attach the offending file to a value error
    pub fn in_file(self, file: impl Into<PathBuf>) -> Self {
        match self {
            Self::InvalidValue { field, reason } => Self::InvalidFileValue {
                field,
                reason,
                file: file.into(),
            },
            other => other,
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use file::ConfigFile;
pub use loader::{ConfigLoader, LoadedConfig};
pub use settings::{PomSettings, SearchSettings, Settings};
pub use template::{PomContext, Template};
