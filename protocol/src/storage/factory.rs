//! # Block Factory
//!
//! Turns a payload into a candidate that extends the current tip. The
//! factory only reads the chain; appending is a separate step that goes
//! through the validator.

use super::block::Block;
use super::chain::Chain;
use crate::clock::Clock;

/// Build the block that would follow `previous`, stamped with `timestamp`.
///
/// Pure: the same inputs always give the same block.
pub fn next_block(previous: &Block, payload: impl Into<String>, timestamp: u64) -> Block {
    Block::sealed(
        previous.index().saturating_add(1),
        previous.hash(),
        timestamp,
        payload,
    )
}

/// Candidate builder bound to a time source.
#[derive(Debug, Default)]
pub struct BlockFactory<C> {
    clock: C,
}

impl<C: Clock> BlockFactory<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Build a candidate on top of `chain`'s tip.
    ///
    /// Two calls with the same tip and payload differ only if the clock
    /// moved in between.
    pub fn create_next(&self, chain: &Chain, payload: impl Into<String>) -> Block {
        self.create_after(chain.tip(), payload)
    }

    /// Build a candidate on top of an explicit predecessor.
    pub fn create_after(&self, previous: &Block, payload: impl Into<String>) -> Block {
        next_block(previous, payload, self.clock.now_secs())
    }
}
