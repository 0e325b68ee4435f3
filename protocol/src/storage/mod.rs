//! # Storage Module
//!
//! The in-memory chain and everything that guards it.
//!
//! ## Architecture
//!
//! ```text
//! block.rs      — Block structure, genesis block, digest computation
//! factory.rs    — Candidate construction from the current tip + a clock
//! validation.rs — Structural, linkage and integrity checks
//! chain.rs      — The owned block sequence and its single append path
//! ```
//!
//! ## Design Decisions
//!
//! 1. **Blocks are immutable.** Fields are private; the only way to get a
//!    block with a given hash is to build it. Tampered or foreign blocks
//!    come in through [`Block::from_parts`] or [`Block::from_json`] and must
//!    pass the validator like everyone else.
//!
//! 2. **Typed rejections.** A failed append says *which* invariant broke.
//!    Callers decide whether to log, retry, or escalate.
//!
//! 3. **One writer.** [`Chain::append`] takes `&mut self`. Sharing across
//!    threads goes through [`SharedChain`], which holds the write lock for
//!    the whole read-tip/validate/push sequence.

pub mod block;
pub mod chain;
pub mod factory;
pub mod validation;

pub use block::{compute_block_hash, Block};
pub use chain::{Chain, ChainError, SharedChain};
pub use factory::{next_block, BlockFactory};
pub use validation::{
    is_acceptable, validate_candidate, validate_genesis, validate_structure, LinkageFault,
    Outcome, RejectionKind, StructuralFault, ValidationError, Verdict,
};
