//! Configuration Loader
//!
//! Layers configuration sources over the built-in defaults:
//! 1. Global config (~/.jarpom/config.toml) - optional
//! 2. Explicit file (must exist) or project config (jarpom.toml, searched upwards)
//! 3. Environment variables (JARPOM_*)

use crate::file::ConfigFile;
use crate::settings::{expand_home, Settings};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the project configuration file
pub const PROJECT_FILE_NAME: &str = "jarpom.toml";

pub const ENV_SEARCH_URL: &str = "JARPOM_SEARCH_URL";
pub const ENV_LOCAL_REPOSITORY: &str = "JARPOM_LOCAL_REPOSITORY";
pub const ENV_OFFLINE: &str = "JARPOM_OFFLINE";

/// Configuration loader
pub struct ConfigLoader {
    /// Overrides the global config location; `None` means ~/.jarpom/config.toml
    global_config_path: Option<PathBuf>,
    use_env: bool,
}

/// Layered settings plus the files that contributed to them
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub settings: Settings,
    /// Files applied, in order
    pub sources: Vec<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            global_config_path: None,
            use_env: true,
        }
    }

    /// Read the global layer from `path` instead of the home directory
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Skip the JARPOM_* environment layer
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load and layer every source
    ///
    /// With `explicit` set the project file search is skipped and the file
    /// must exist; otherwise `jarpom.toml` is looked up from `start_dir`
    /// towards the filesystem root.
    pub fn load(&self, explicit: Option<&Path>, start_dir: &Path) -> ConfigResult<LoadedConfig> {
        let mut settings = Settings::default();
        let mut sources = Vec::new();

        if let Some(global) = self.global_path() {
            if global.exists() {
                Self::apply_file(&mut settings, &mut sources, &global)?;
            } else {
                debug!("No global config at {}", global.display());
            }
        }

        let project = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_project_config(start_dir),
        };
        if let Some(path) = project {
            Self::apply_file(&mut settings, &mut sources, &path)?;
        }

        if self.use_env {
            apply_env_overrides(&mut settings)?;
        }

        Ok(LoadedConfig { settings, sources })
    }

    fn apply_file(
        settings: &mut Settings,
        sources: &mut Vec<PathBuf>,
        path: &Path,
    ) -> ConfigResult<()> {
        debug!("Loading config {}", path.display());
        let file = ConfigFile::load_from_file(path)?;
        settings.apply(file).map_err(|e| e.in_file(path))?;
        sources.push(path.to_path_buf());
        Ok(())
    }

    fn global_path(&self) -> Option<PathBuf> {
        self.global_config_path.clone().or_else(global_config_path)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// ~/.jarpom/config.toml, if a home directory exists
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".jarpom").join("config.toml"))
}

/// Nearest `jarpom.toml` at or above `start_dir`
pub fn find_project_config(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(PROJECT_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Apply JARPOM_* variables on top of the file layers
///
/// `JARPOM_OFFLINE` accepts true/1/yes and false/0/no.
pub fn apply_env_overrides(settings: &mut Settings) -> ConfigResult<()> {
    if let Ok(url) = env::var(ENV_SEARCH_URL) {
        if url.trim().is_empty() {
            return Err(ConfigError::invalid(ENV_SEARCH_URL, "url cannot be empty"));
        }
        settings.search.url = url;
    }

    if let Ok(path) = env::var(ENV_LOCAL_REPOSITORY) {
        settings.local_repository = if path.is_empty() {
            None
        } else {
            Some(expand_home(Path::new(&path)))
        };
    }

    if let Ok(offline) = env::var(ENV_OFFLINE) {
        match offline.to_lowercase().as_str() {
            "true" | "1" | "yes" => settings.search.enabled = false,
            "false" | "0" | "no" | "" => {}
            other => {
                return Err(ConfigError::invalid(
                    ENV_OFFLINE,
                    format!("expected a boolean, got '{}'", other),
                ))
            }
        }
    }

    Ok(())
}
