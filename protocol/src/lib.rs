// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # linkchain — Core Library
//!
//! An append-only, hash-linked sequence of blocks. Each block commits to its
//! own fields with a SHA-256 digest and to its predecessor by storing the
//! predecessor's digest. Nothing gets into the chain without passing the
//! validator first, and nothing already in the chain ever changes.
//!
//! ## Architecture
//!
//! - **crypto** — SHA-256 digest provider and the "digest-shaped" predicate.
//! - **clock** — Time sources: wall clock (non-decreasing) and a manual clock.
//! - **config** — Genesis parameters and protocol constants.
//! - **storage** — Blocks, the block factory, the validator, and the chain store.
//!
//! ## Data Flow
//!
//! ```text
//! payload → BlockFactory (tip + clock) → candidate
//!        → Chain::append → validate_candidate(candidate, tip)
//!        → Ok: candidate becomes the new tip
//!        → Err(ValidationError): chain untouched, candidate dropped
//! ```
//!
//! The chain is single-writer. [`storage::SharedChain`] wraps it in a
//! read-write lock so multiple threads can share one chain without two
//! candidates ever being validated against the same tip.

pub mod clock;
pub mod config;
pub mod crypto;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::GenesisConfig;
pub use storage::{
    compute_block_hash, is_acceptable, validate_candidate, Block, BlockFactory, Chain,
    ChainError, Outcome, SharedChain, ValidationError, Verdict,
};
