//! Error types for tce-fetch
//!
//! All modules use `TceResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tce-fetch operations
pub type TceResult<T> = Result<T, TceError>;

/// All errors that can occur in tce-fetch
#[derive(Error, Debug)]
pub enum TceError {
    // Transport errors
    #[error("Request failed for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Server returned {status} for {url}")]
    HttpStatus { url: String, status: String },

    // Resolution errors
    #[error("Extension not found: {0}")]
    PackageNotFound(String),

    #[error("Hash for {name} does not match ({actual} != {expected})")]
    ChecksumMismatch {
        name: String,
        actual: String,
        expected: String,
    },

    #[error("Invalid extension name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl TceError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a transport error for a URL
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::PackageNotFound(_) => {
                Some("Check the extension name, --arch and --release against the mirror")
            }
            Self::ChecksumMismatch { .. } => {
                Some("Delete the cached .tcz file and run again to download a fresh copy")
            }
            Self::Transport { .. } => Some("Check network access to the mirror (--mirror)"),
            Self::ConfigInvalid { .. } => Some("Run: tce-fetch config init --force"),
            _ => None,
        }
    }
}
