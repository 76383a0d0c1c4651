//! Configuration management for tce-fetch

pub mod schema;

pub use schema::Config;

use crate::error::{TceError, TceResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tce-fetch")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub fn load(&self) -> TceResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&self, path: &Path) -> TceResult<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| TceError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| TceError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub fn save(&self, config: &Config) -> TceResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| TceError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).map_err(|e| {
            TceError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Repository settings given on the command line or in the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mirror: Option<String>,
    pub version: Option<String>,
    pub arch: Option<String>,
    pub kernel: Option<String>,
    pub out: Option<String>,
}

impl Config {
    /// Apply command line values on top of the file configuration
    pub fn apply(&mut self, overrides: Overrides) {
        let repo = &mut self.repository;
        if let Some(mirror) = overrides.mirror {
            repo.mirror = mirror;
        }
        if let Some(version) = overrides.version {
            repo.version = version;
        }
        if let Some(arch) = overrides.arch {
            repo.arch = arch;
        }
        if let Some(kernel) = overrides.kernel {
            repo.kernel = kernel;
        }
        if let Some(out) = overrides.out {
            self.output.dir = out;
        }
    }

    /// Output directory with `%a` and `%v` expanded
    pub fn base_dir(&self) -> PathBuf {
        expand_base_dir(
            &self.output.dir,
            &self.repository.arch,
            &self.repository.version,
        )
    }
}

/// Expand `%a` (architecture) and `%v` (release) in a directory template
pub fn expand_base_dir(template: &str, arch: &str, version: &str) -> PathBuf {
    PathBuf::from(template.replace("%a", arch).replace("%v", version))
}
