//! Extension names and the resource files derived from them

use crate::error::{TceError, TceResult};
use crate::resolve::ChecksumAlgorithm;
use std::fmt;

/// Token in dependency names that stands for the running kernel
pub const PLACEHOLDER: &str = "KERNEL";

/// File extension of an extension payload
pub const PACKAGE_SUFFIX: &str = ".tcz";

/// The three files the mirror may publish for one extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// The extension itself (`<name>.tcz`)
    Payload,
    /// Published digest (`<name>.tcz.md5.txt`)
    Checksum(ChecksumAlgorithm),
    /// Dependency list (`<name>.tcz.dep`)
    Dependencies,
}

impl ResourceKind {
    /// File name suffix for this kind
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Payload => PACKAGE_SUFFIX,
            Self::Checksum(algorithm) => algorithm.suffix(),
            Self::Dependencies => ".tcz.dep",
        }
    }

    /// Relative resource path for an extension name
    pub fn path_for(&self, name: &str) -> String {
        format!("{}{}", name, self.suffix())
    }

    /// Split a cache file name into extension name and kind.
    ///
    /// Longer suffixes are tried first since every suffix starts with `.tcz`.
    pub fn classify(file_name: &str) -> Option<(&str, ResourceKind)> {
        let kinds = [
            Self::Checksum(ChecksumAlgorithm::Md5),
            Self::Checksum(ChecksumAlgorithm::Sha256),
            Self::Dependencies,
            Self::Payload,
        ];

        kinds.into_iter().find_map(|kind| {
            file_name
                .strip_suffix(kind.suffix())
                .filter(|name| !name.is_empty())
                .map(|name| (name, kind))
        })
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload => write!(f, "payload"),
            Self::Checksum(algorithm) => write!(f, "{}", algorithm),
            Self::Dependencies => write!(f, "dep"),
        }
    }
}

/// Replace every placeholder token in `name` with the kernel identifier
pub fn expand_placeholder(name: &str, kernel: &str) -> String {
    name.replace(PLACEHOLDER, kernel)
}

/// Validate that an extension name stays inside the cache directory
/// once a suffix is appended to it.
pub fn validate_name(name: &str) -> TceResult<()> {
    let invalid = |reason: &str| TceError::InvalidPackageName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(invalid("must not contain path separators"));
    }
    if name.contains("..") {
        return Err(invalid("must not contain '..'"));
    }
    Ok(())
}
