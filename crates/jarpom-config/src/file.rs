//! Configuration file (jarpom.toml, ~/.jarpom/config.toml)
//!
//! Every key is optional so the same schema serves the global file, the
//! project file and explicit `--config` files.

use crate::{ConfigError, ConfigResult};
use jarpom_resolve::{GroupRule, SuffixRule};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// One configuration layer as written on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Local Maven repository root; `~/` is expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_repository: Option<PathBuf>,

    /// Priority for paths with no listed directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_priority: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSection>,

    /// Ordered prefix rules; the first matching prefix wins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_rules: Option<Vec<GroupRule>>,

    /// Group ID -> literal version emitted for every artifact of the group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_group_version: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_suffix: Option<Vec<SuffixRule>>,

    /// Directory name -> priority class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priorities: Option<HashMap<String, i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pom: Option<PomSection>,
}

/// `[search]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// `[pom]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PomSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Template text placed before the dependency block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Template text placed after the dependency block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl ConfigFile {
    /// Parse TOML text without validation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read, parse and validate a configuration file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError {
                    file: path.to_path_buf(),
                    error: e,
                }
            }
        })?;

        let config = Self::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate().map_err(|e| e.in_file(path))?;
        Ok(config)
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(rules) = &self.group_rules {
            for rule in rules {
                if rule.prefix.is_empty() {
                    return Err(ConfigError::invalid(
                        "group_rules.prefix",
                        "prefix cannot be empty",
                    ));
                }
                if rule.group.is_empty() {
                    return Err(ConfigError::invalid(
                        "group_rules.group",
                        format!("group for prefix '{}' cannot be empty", rule.prefix),
                    ));
                }
            }
        }

        if let Some(suffixes) = &self.artifact_suffix {
            if suffixes.iter().any(|rule| rule.suffix.is_empty()) {
                return Err(ConfigError::invalid(
                    "artifact_suffix.suffix",
                    "suffix cannot be empty",
                ));
            }
        }

        if let Some(pins) = &self.static_group_version {
            if let Some((group, _)) = pins.iter().find(|(_, version)| version.is_empty()) {
                return Err(ConfigError::invalid(
                    "static_group_version",
                    format!("version for '{}' cannot be empty", group),
                ));
            }
        }

        if let Some(search) = &self.search {
            if matches!(&search.url, Some(url) if url.trim().is_empty()) {
                return Err(ConfigError::invalid("search.url", "url cannot be empty"));
            }
            if search.timeout_secs == Some(0) {
                return Err(ConfigError::invalid(
                    "search.timeout_secs",
                    "timeout must be at least one second",
                ));
            }
        }

        Ok(())
    }
}
