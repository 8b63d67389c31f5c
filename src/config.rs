//! Configuration for NoBox
//!
//! Centralized configuration with sensible defaults.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

/// Environment variable that overrides the storage root
pub const DATA_DIR_ENV: &str = "NOBOX_HOME";

/// Application name used for the platform data directory
pub const APP_NAME: &str = "nobox";

/// Main configuration for a NoBox store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory shared by all formats
    /// Internal structure:
    ///   {data_root}/
    ///     ├── json/{database}/{collection}.json
    ///     └── yaml/{database}/{collection}.yaml
    pub data_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("./nobox_data"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve the storage root from the environment
    ///
    /// Order: `NOBOX_HOME`, then the platform data directory
    /// (e.g. `~/.local/share/nobox` on Linux), then the default.
    pub fn from_env() -> Self {
        if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Self {
                data_root: PathBuf::from(dir),
            };
        }

        match ProjectDirs::from("", "", APP_NAME) {
            Some(dirs) => Self {
                data_root: dirs.data_dir().to_path_buf(),
            },
            None => {
                tracing::warn!("No home directory found, falling back to ./nobox_data");
                Self::default()
            }
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the storage root directory
    pub fn data_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_root = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
