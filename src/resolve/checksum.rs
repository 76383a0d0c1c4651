//! Payload integrity checks

use crate::error::{TceError, TceResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{BufRead, BufReader, Read};

/// Digest published next to each payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    /// `.tcz.md5.txt`, published by every Tiny Core mirror
    #[default]
    Md5,
    /// `.tcz.sha256.txt`
    Sha256,
}

impl ChecksumAlgorithm {
    /// Suffix of the checksum resource for this algorithm
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Md5 => ".tcz.md5.txt",
            Self::Sha256 => ".tcz.sha256.txt",
        }
    }

    /// Hash the whole stream, returning lowercase hex
    pub fn digest<R: Read>(&self, mut reader: R) -> std::io::Result<String> {
        let mut buffer = [0u8; 8192];
        match self {
            Self::Md5 => {
                let mut context = md5::Context::new();
                loop {
                    let n = reader.read(&mut buffer)?;
                    if n == 0 {
                        break;
                    }
                    context.consume(&buffer[..n]);
                }
                Ok(hex::encode(context.compute().0))
            }
            Self::Sha256 => {
                let mut hasher = Sha256::new();
                loop {
                    let n = reader.read(&mut buffer)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buffer[..n]);
                }
                Ok(hex::encode(hasher.finalize()))
            }
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Read the expected digest: the first whitespace-delimited token.
///
/// Checksum files look like `<hex>  <name>.tcz`; an empty file yields `None`.
pub fn read_expected<R: Read>(reader: R, resource: &str) -> TceResult<Option<String>> {
    for line in BufReader::new(reader).lines() {
        let line = line.map_err(|e| TceError::io(format!("reading {}", resource), e))?;
        if let Some(token) = line.split_whitespace().next() {
            return Ok(Some(token.to_string()));
        }
    }
    Ok(None)
}

/// Compare a payload against its published digest
pub fn verify<R: Read>(
    algorithm: ChecksumAlgorithm,
    payload: R,
    name: &str,
    expected: &str,
) -> TceResult<()> {
    let actual = algorithm
        .digest(payload)
        .map_err(|e| TceError::io(format!("hashing {}", name), e))?;

    if actual != expected {
        return Err(TceError::ChecksumMismatch {
            name: name.to_string(),
            actual,
            expected: expected.to_string(),
        });
    }
    Ok(())
}
