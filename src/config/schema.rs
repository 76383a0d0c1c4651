//! Configuration schema for tce-fetch
//!
//! Configuration is stored at `~/.config/tce-fetch/config.toml`

use crate::resolve::ChecksumAlgorithm;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Mirror and release to fetch from
    pub repository: RepositoryConfig,

    /// Where fetched files go
    pub output: OutputConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Extension repository settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Mirror base URL
    pub mirror: String,

    /// Tiny Core release, e.g. "8.x"
    pub version: String,

    /// Architecture, e.g. "x86" or "x86_64"
    pub arch: String,

    /// Kernel name substituted for `KERNEL` in extension names
    pub kernel: String,

    /// Published digest to verify against
    pub checksum: ChecksumAlgorithm,

    /// Request timeout in seconds (0 = wait forever)
    pub timeout_secs: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            mirror: "http://tinycorelinux.net".to_string(),
            version: "8.x".to_string(),
            arch: "x86".to_string(),
            kernel: "4.8.17-tinycore".to_string(),
            checksum: ChecksumAlgorithm::Md5,
            timeout_secs: 0,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory template; `%v` is the release, `%a` the architecture
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "tce/%v/%a".to_string(),
        }
    }
}
