//! Content hashing for package fingerprints.

use hex::{FromHex, FromHexError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of hex characters in the textual form of a [`ContentHash`].
const HEX_LEN: usize = 32;

/// A 128-bit content hash of compiled package code, computed with XXH3.
///
/// The hex form is what clients store and send back, so serialization goes
/// through the 32-character lowercase string rather than the raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Computes the content hash of compiled code.
    pub fn of(code: &str) -> Self {
        Self::from_bytes(code.as_bytes())
    }
}

/// Error returned when a string is not a valid hex-encoded [`ContentHash`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseHashError {
    /// The input does not have exactly 32 characters.
    #[error("content hash must be 32 hex characters, got {0}")]
    Length(usize),

    /// The input contains a character outside `[0-9a-fA-F]`.
    #[error("invalid hex character '{0}' in content hash")]
    InvalidChar(char),
}

impl FromStr for ContentHash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HEX_LEN {
            return Err(ParseHashError::Length(s.chars().count()));
        }
        let bytes = <[u8; 16]>::from_hex(s).map_err(|e| match e {
            FromHexError::InvalidHexCharacter { c, .. } => ParseHashError::InvalidChar(c),
            _ => ParseHashError::Length(s.chars().count()),
        })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for ContentHash {
    type Error = ParseHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
