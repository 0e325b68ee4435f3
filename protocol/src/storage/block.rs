//! # Block Structure
//!
//! A block is the unit of the chain: a position, a timestamp, an opaque text
//! payload, the predecessor's digest, and its own digest.
//!
//! ## Block Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  index: u64           (genesis = 0)         │
//! │  timestamp: u64       (seconds)             │
//! │  payload: String      (uninterpreted)       │
//! │  previous_hash: String (empty for genesis)  │
//! │  hash: String         (SHA-256, lower hex)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Hash Computation
//!
//! The digest covers `index || previous_hash || timestamp || payload`, in
//! that order. Integers are encoded as u64 little-endian. Both strings are
//! length-prefixed with their byte length (u64 LE) so no two field tuples
//! share a preimage.

use serde::{Deserialize, Serialize};

use super::validation::{StructuralFault, ValidationError};
use crate::config::{GenesisConfig, GENESIS_INDEX};
use crate::crypto::sha256_hex;

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A single chain entry. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Block {
    index: u64,
    timestamp: u64,
    payload: String,
    previous_hash: String,
    hash: String,
}

impl Block {
    /// Build the genesis block from configured literals.
    ///
    /// A sealed config (no fixed hash) gets a real digest over its fields.
    pub fn genesis(config: &GenesisConfig) -> Self {
        let hash = match &config.hash {
            Some(fixed) => fixed.clone(),
            None => compute_block_hash(GENESIS_INDEX, "", config.timestamp, &config.payload),
        };

        Block {
            index: GENESIS_INDEX,
            timestamp: config.timestamp,
            payload: config.payload.clone(),
            previous_hash: String::new(),
            hash,
        }
    }

    /// Build a block whose hash is computed from the given fields.
    pub fn sealed(
        index: u64,
        previous_hash: impl Into<String>,
        timestamp: u64,
        payload: impl Into<String>,
    ) -> Self {
        let previous_hash = previous_hash.into();
        let payload = payload.into();
        let hash = compute_block_hash(index, &previous_hash, timestamp, &payload);
        Block {
            index,
            timestamp,
            payload,
            previous_hash,
            hash,
        }
    }

    /// Assemble a block from raw fields without computing anything.
    ///
    /// This is how externally supplied candidates enter the system. Nothing
    /// is checked here; that is the validator's job.
    pub fn from_parts(
        index: u64,
        timestamp: u64,
        payload: impl Into<String>,
        previous_hash: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Block {
            index,
            timestamp,
            payload: payload.into(),
            previous_hash: previous_hash.into(),
            hash: hash.into(),
        }
    }

    /// Decode a candidate block from JSON.
    ///
    /// Missing fields, unknown fields, and wrong JSON types (a string index,
    /// a negative timestamp, a numeric payload) are all structural faults.
    pub fn from_json(s: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(s)
            .map_err(|e| ValidationError::Structural(StructuralFault::Malformed(e.to_string())))
    }

    /// Recompute the digest from this block's fields.
    pub fn compute_hash(&self) -> String {
        compute_block_hash(self.index, &self.previous_hash, self.timestamp, &self.payload)
    }

    /// Check that the stored hash matches the fields, with no reference to
    /// any other block.
    pub fn verify_integrity(&self) -> Result<(), ValidationError> {
        let computed = self.compute_hash();
        if computed != self.hash {
            return Err(ValidationError::Integrity {
                index: self.index,
                stored: self.hash.clone(),
                computed,
            });
        }
        Ok(())
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == GENESIS_INDEX
    }
}

// ---------------------------------------------------------------------------
// Hash Computation
// ---------------------------------------------------------------------------

/// The block digest: SHA-256 over
/// `index || len(previous_hash) || previous_hash || timestamp || len(payload) || payload`,
/// rendered as 64 lowercase hex characters.
///
/// Pure and deterministic.
///
/// ```
/// use linkchain_protocol::compute_block_hash;
///
/// let a = compute_block_hash(1, "", 10, "data");
/// assert_eq!(a, compute_block_hash(1, "", 10, "data"));
/// assert_ne!(a, compute_block_hash(1, "", 11, "data"));
/// ```
pub fn compute_block_hash(index: u64, previous_hash: &str, timestamp: u64, payload: &str) -> String {
    let mut preimage = Vec::with_capacity(32 + previous_hash.len() + payload.len());
    preimage.extend_from_slice(&index.to_le_bytes());
    preimage.extend_from_slice(&(previous_hash.len() as u64).to_le_bytes());
    preimage.extend_from_slice(previous_hash.as_bytes());
    preimage.extend_from_slice(&timestamp.to_le_bytes());
    preimage.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    preimage.extend_from_slice(payload.as_bytes());
    sha256_hex(&preimage)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
