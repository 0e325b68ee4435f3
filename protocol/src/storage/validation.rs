//! # Block Validation
//!
//! Decides whether a candidate may follow a given predecessor. Checks run in
//! a fixed order and stop at the first failure:
//!
//! 1. **Structure** — hashes are digest-shaped; only index 0 may carry an
//!    empty previous hash, and index 0 must.
//! 2. **Index continuity** — `candidate.index == previous.index + 1`.
//! 3. **Hash linkage** — `candidate.previous_hash == previous.hash`.
//! 4. **Digest integrity** — the recomputed digest equals `candidate.hash`.
//!
//! Rejections are routine outcomes, not programming errors, so they come
//! back as [`ValidationError`] values. Nothing here panics and nothing here
//! mutates either block.

use std::fmt;

use thiserror::Error;

use super::block::Block;
use crate::crypto::is_digest_hex;

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

/// A field is missing or has the wrong shape.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StructuralFault {
    /// `hash` is not a 64-char lowercase hex digest.
    #[error("hash is not a hex digest: {0:?}")]
    MalformedHash(String),

    /// `previous_hash` on a non-genesis block is not a hex digest.
    #[error("previous hash is not a hex digest: {0:?}")]
    MalformedPreviousHash(String),

    /// A block at index 0 must have an empty previous hash.
    #[error("genesis block must have an empty previous hash, found {0:?}")]
    GenesisPreviousHashNotEmpty(String),

    /// The block could not be decoded at all (missing field, wrong type).
    #[error("malformed block: {0}")]
    Malformed(String),
}

/// The candidate does not attach to its predecessor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LinkageFault {
    /// Index is not exactly predecessor + 1.
    #[error("index gap: expected {expected}, found {found}")]
    IndexGap {
        /// `previous.index + 1`.
        expected: u64,
        /// `candidate.index`.
        found: u64,
    },

    /// The predecessor sits at `u64::MAX`; no index can follow it.
    #[error("tip at index {tip} has no successor")]
    IndexExhausted {
        /// The predecessor's index.
        tip: u64,
    },

    /// `previous_hash` does not reference the predecessor.
    #[error("previous hash mismatch: expected {expected}, found {found}")]
    PreviousHashMismatch {
        /// The predecessor's hash.
        expected: String,
        /// What the candidate points at.
        found: String,
    },
}

/// Why a candidate was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("structural error: {0}")]
    Structural(#[from] StructuralFault),

    #[error("linkage error: {0}")]
    Linkage(#[from] LinkageFault),

    /// Stored hash does not match the fields. Tampering or corruption.
    #[error("integrity error: block {index} stores {stored}, fields hash to {computed}")]
    Integrity {
        /// Index of the offending block.
        index: u64,
        /// The hash the block carries.
        stored: String,
        /// The hash its fields actually produce.
        computed: String,
    },
}

/// Coarse category of a rejection, for logging and metrics labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    Structural,
    Linkage,
    Integrity,
}

impl RejectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectionKind::Structural => "structural",
            RejectionKind::Linkage => "linkage",
            RejectionKind::Integrity => "integrity",
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValidationError {
    pub fn kind(&self) -> RejectionKind {
        match self {
            ValidationError::Structural(_) => RejectionKind::Structural,
            ValidationError::Linkage(_) => RejectionKind::Linkage,
            ValidationError::Integrity { .. } => RejectionKind::Integrity,
        }
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// The four possible outcomes of offering a candidate to the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Accepted,
    StructuralError,
    LinkageError,
    IntegrityError,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Accepted => "accepted",
            Outcome::StructuralError => "structural error",
            Outcome::LinkageError => "linkage error",
            Outcome::IntegrityError => "integrity error",
        };
        f.write_str(s)
    }
}

/// Tagged validation result carrying the full reason on rejection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(ValidationError),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Verdict::Accepted => Outcome::Accepted,
            Verdict::Rejected(e) => match e.kind() {
                RejectionKind::Structural => Outcome::StructuralError,
                RejectionKind::Linkage => Outcome::LinkageError,
                RejectionKind::Integrity => Outcome::IntegrityError,
            },
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Verdict::Accepted => Ok(()),
            Verdict::Rejected(e) => Err(e),
        }
    }
}

impl<T> From<Result<T, ValidationError>> for Verdict {
    fn from(r: Result<T, ValidationError>) -> Self {
        match r {
            Ok(_) => Verdict::Accepted,
            Err(e) => Verdict::Rejected(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Shape check on a single block. Types are already enforced by [`Block`];
/// what remains is the content of the hash strings.
pub fn validate_structure(block: &Block) -> Result<(), ValidationError> {
    if !is_digest_hex(block.hash()) {
        return Err(StructuralFault::MalformedHash(block.hash().to_string()).into());
    }

    if block.is_genesis() {
        if !block.previous_hash().is_empty() {
            return Err(StructuralFault::GenesisPreviousHashNotEmpty(
                block.previous_hash().to_string(),
            )
            .into());
        }
    } else if !is_digest_hex(block.previous_hash()) {
        return Err(
            StructuralFault::MalformedPreviousHash(block.previous_hash().to_string()).into(),
        );
    }

    Ok(())
}

/// Genesis acceptance: index 0 with a valid shape. The digest is not
/// required to match, since a genesis hash may be a configured constant.
pub fn validate_genesis(block: &Block) -> Result<(), ValidationError> {
    if !block.is_genesis() {
        return Err(LinkageFault::IndexGap {
            expected: 0,
            found: block.index(),
        }
        .into());
    }
    validate_structure(block)
}

/// Full candidate check against its would-be predecessor.
pub fn validate_candidate(candidate: &Block, previous: &Block) -> Result<(), ValidationError> {
    validate_structure(candidate)?;

    let expected = previous
        .index()
        .checked_add(1)
        .ok_or(LinkageFault::IndexExhausted {
            tip: previous.index(),
        })?;
    if candidate.index() != expected {
        return Err(LinkageFault::IndexGap {
            expected,
            found: candidate.index(),
        }
        .into());
    }

    if candidate.previous_hash() != previous.hash() {
        return Err(LinkageFault::PreviousHashMismatch {
            expected: previous.hash().to_string(),
            found: candidate.previous_hash().to_string(),
        }
        .into());
    }

    candidate.verify_integrity()
}

/// Boolean form of [`validate_candidate`].
pub fn is_acceptable(candidate: &Block, previous: &Block) -> bool {
    validate_candidate(candidate, previous).is_ok()
}
