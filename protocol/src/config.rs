//! # Protocol Configuration & Constants
//!
//! Every constant the chain depends on lives here, together with the
//! genesis parameters. The genesis block is configured, not mined: its
//! fields are supplied when the chain is constructed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::is_digest_hex;

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Library protocol version. Bump on any change to the digest preimage.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// The digest algorithm behind every block hash.
pub const HASH_ALGORITHM: &str = "SHA-256";

/// Digest length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Digest length once rendered as hex.
pub const DIGEST_HEX_LENGTH: usize = HASH_OUTPUT_LENGTH * 2;

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// Index of the genesis block. Always zero.
pub const GENESIS_INDEX: u64 = 0;

/// Default genesis timestamp (seconds since the Unix epoch).
pub const GENESIS_TIMESTAMP: u64 = 213_985;

/// Default genesis payload.
pub const GENESIS_PAYLOAD: &str = "HelloWorld";

/// Errors raised while loading a genesis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read genesis config {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid genesis document.
    #[error("invalid genesis config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configured genesis hash is not a 64-char lowercase hex digest.
    #[error("genesis hash is not a hex digest: {0:?}")]
    MalformedHash(String),
}

/// Literal values for the genesis block.
///
/// The index (0) and previous hash (empty) are fixed by definition and not
/// configurable. When `hash` is `None` the genesis block is sealed: its hash
/// is computed over the configured fields like any other block. A supplied
/// hash is taken as-is; [`crate::storage::Chain::verify`] reports it if it
/// does not match the fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisConfig {
    /// Genesis timestamp in seconds.
    #[serde(default = "default_timestamp")]
    pub timestamp: u64,
    /// Genesis payload.
    #[serde(default = "default_payload")]
    pub payload: String,
    /// Fixed genesis hash. `None` seals the block.
    #[serde(default)]
    pub hash: Option<String>,
}

fn default_timestamp() -> u64 {
    GENESIS_TIMESTAMP
}

fn default_payload() -> String {
    GENESIS_PAYLOAD.to_string()
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            timestamp: GENESIS_TIMESTAMP,
            payload: GENESIS_PAYLOAD.to_string(),
            hash: None,
        }
    }
}

impl GenesisConfig {
    /// A sealed genesis with the given timestamp and payload.
    pub fn sealed(timestamp: u64, payload: impl Into<String>) -> Self {
        Self {
            timestamp,
            payload: payload.into(),
            hash: None,
        }
    }

    /// Parse a genesis configuration from JSON.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.check()?;
        Ok(config)
    }

    /// Load a genesis configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Reject configured hashes that could never pass the structural check.
    pub fn check(&self) -> Result<(), ConfigError> {
        match &self.hash {
            Some(h) if !is_digest_hex(h) => Err(ConfigError::MalformedHash(h.clone())),
            _ => Ok(()),
        }
    }
}
