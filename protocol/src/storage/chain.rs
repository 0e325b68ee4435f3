//! # Chain Store
//!
//! Owns the ordered block sequence. The chain is created holding exactly
//! the genesis block, grows only through [`Chain::append`], and never
//! shrinks. Every append runs the validator against the current tip; a
//! rejected candidate leaves the chain exactly as it was.
//!
//! ## Thread Safety
//!
//! [`Chain`] itself is a plain owned value with `&mut self` mutation. For
//! multiple callers, [`SharedChain`] wraps it in a `parking_lot::RwLock`:
//! reads share the lock, and an append holds the write lock across
//! read-tip, validate, and push so two candidates can never both be
//! checked against the same stale tip.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::block::Block;
use super::factory::BlockFactory;
use super::validation::{validate_candidate, validate_genesis, ValidationError};
use crate::clock::Clock;
use crate::config::GenesisConfig;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors from building or auditing a whole chain.
///
/// Single appends report a bare [`ValidationError`]; this type adds the
/// position of the failure when a full history is involved.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChainError {
    /// A history must contain at least the genesis block.
    #[error("history is empty; a chain needs a genesis block")]
    EmptyHistory,

    /// The first block is not an acceptable genesis.
    #[error("invalid genesis block: {0}")]
    InvalidGenesis(ValidationError),

    /// The block at `position` does not follow its predecessor.
    #[error("block at position {position} (claims index {claimed}) rejected: {source}")]
    Rejected {
        /// Position in the history.
        position: u64,
        /// The index the rejected block carries.
        claimed: u64,
        /// What went wrong.
        #[source]
        source: ValidationError,
    },
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Ordered, append-only sequence of accepted blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    // Never empty: every constructor installs genesis first.
    blocks: Vec<Block>,
}

impl Default for Chain {
    /// A chain holding the default, sealed genesis block.
    fn default() -> Self {
        Self {
            blocks: vec![Block::genesis(&GenesisConfig::default())],
        }
    }
}

impl Chain {
    /// Create a chain holding only the configured genesis block.
    pub fn new(config: &GenesisConfig) -> Result<Self, ChainError> {
        Self::from_genesis(Block::genesis(config))
    }

    /// Create a chain from an explicit genesis block.
    pub fn from_genesis(genesis: Block) -> Result<Self, ChainError> {
        validate_genesis(&genesis).map_err(ChainError::InvalidGenesis)?;
        info!(genesis = %genesis.hash(), "chain initialized");
        Ok(Self {
            blocks: vec![genesis],
        })
    }

    /// Rebuild a chain by replaying every block of an exported history
    /// through [`Chain::append`].
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Result<Self, ChainError> {
        let mut iter = blocks.into_iter();
        let genesis = iter.next().ok_or(ChainError::EmptyHistory)?;
        let mut chain = Self::from_genesis(genesis)?;

        for (offset, block) in iter.enumerate() {
            let position = offset as u64 + 1;
            let claimed = block.index();
            chain
                .append(block)
                .map_err(|source| ChainError::Rejected {
                    position,
                    claimed,
                    source,
                })?;
        }
        Ok(chain)
    }

    /// The most recently accepted block.
    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain invariant violated: no genesis block")
    }

    /// The genesis block.
    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// All accepted blocks in index order.
    pub fn history(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false. Present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Validate `candidate` against the tip and, if it passes, make it the
    /// new tip. This is the only way the chain grows.
    pub fn append(&mut self, candidate: Block) -> Result<&Block, ValidationError> {
        if let Err(e) = validate_candidate(&candidate, self.tip()) {
            warn!(
                index = candidate.index(),
                kind = %e.kind(),
                reason = %e,
                "candidate rejected"
            );
            return Err(e);
        }

        debug!(index = candidate.index(), hash = %candidate.hash(), "block appended");
        self.blocks.push(candidate);
        Ok(self.tip())
    }

    /// Audit the whole history: genesis shape and digest, then every link.
    ///
    /// Append already enforces all of this, so on a chain built only through
    /// [`Chain::append`] the one thing that can fail is a configured genesis
    /// hash that does not match its fields.
    pub fn verify(&self) -> Result<(), ChainError> {
        let genesis = self.genesis();
        validate_genesis(genesis)
            .and_then(|()| genesis.verify_integrity())
            .map_err(ChainError::InvalidGenesis)?;

        for (i, pair) in self.blocks.windows(2).enumerate() {
            validate_candidate(&pair[1], &pair[0]).map_err(|source| ChainError::Rejected {
                position: i as u64 + 1,
                claimed: pair[1].index(),
                source,
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SharedChain
// ---------------------------------------------------------------------------

/// A [`Chain`] shared between threads.
///
/// Cloning is cheap and yields another handle to the same chain.
#[derive(Clone, Debug, Default)]
pub struct SharedChain {
    inner: Arc<RwLock<Chain>>,
}

impl SharedChain {
    pub fn new(chain: Chain) -> Self {
        Self {
            inner: Arc::new(RwLock::new(chain)),
        }
    }

    /// Snapshot of the current tip.
    pub fn tip(&self) -> Block {
        self.inner.read().tip().clone()
    }

    /// Snapshot of the full history.
    pub fn history(&self) -> Vec<Block> {
        self.inner.read().history().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` against the chain under a read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Chain) -> R) -> R {
        f(&self.inner.read())
    }

    /// Validate and append under the write lock.
    pub fn append(&self, candidate: Block) -> Result<Block, ValidationError> {
        let mut chain = self.inner.write();
        chain.append(candidate).cloned()
    }

    /// Build a candidate on the current tip and append it, all under one
    /// write lock. Concurrent producers using this never collide.
    pub fn append_payload<C: Clock>(
        &self,
        factory: &BlockFactory<C>,
        payload: impl Into<String>,
    ) -> Result<Block, ValidationError> {
        let mut chain = self.inner.write();
        let candidate = factory.create_next(&chain, payload);
        chain.append(candidate).cloned()
    }

    pub fn verify(&self) -> Result<(), ChainError> {
        self.inner.read().verify()
    }

    /// Take the chain back out if this is the last handle.
    pub fn try_into_inner(self) -> Result<Chain, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<Chain> for SharedChain {
    fn from(chain: Chain) -> Self {
        Self::new(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::factory::next_block;
    use crate::storage::validation::{LinkageFault, RejectionKind};

    fn chain_of(n: usize) -> Chain {
        let mut chain = Chain::default();
        for i in 0..n {
            let candidate = next_block(chain.tip(), format!("block {i}"), 1_000 + i as u64);
            chain.append(candidate).unwrap();
        }
        chain
    }

    #[test]
    fn fresh_chain_holds_only_genesis() {
        let chain = Chain::default();
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());
        assert_eq!(chain.tip().index(), 0);
        assert_eq!(chain.tip().previous_hash(), "");
        assert_eq!(chain.genesis(), chain.tip());
    }

    #[test]
    fn new_rejects_malformed_genesis_hash() {
        let config = GenesisConfig {
            hash: Some("answlgP".to_string()),
            ..GenesisConfig::default()
        };
        assert!(matches!(
            Chain::new(&config),
            Err(ChainError::InvalidGenesis(ValidationError::Structural(_)))
        ));
    }

    #[test]
    fn from_genesis_rejects_non_zero_index() {
        let block = Block::sealed(1, "a".repeat(64), 1, "x");
        assert!(matches!(
            Chain::from_genesis(block),
            Err(ChainError::InvalidGenesis(_))
        ));
    }

    #[test]
    fn append_extends_by_one() {
        let mut chain = Chain::default();
        let candidate = next_block(chain.tip(), "second block", 10);
        let expected = candidate.clone();

        let tip = chain.append(candidate).unwrap();
        assert_eq!(tip, &expected);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.tip().index(), 1);
        assert_eq!(chain.tip().previous_hash(), chain.genesis().hash());
    }

    #[test]
    fn rejected_append_leaves_chain_unchanged() {
        let mut chain = chain_of(3);
        let before = chain.clone();

        let stale = next_block(chain.get(1).unwrap(), "stale", 99);
        let err = chain.append(stale).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::Linkage);
        assert_eq!(chain, before);
    }

    #[test]
    fn get_by_index() {
        let chain = chain_of(2);
        assert_eq!(chain.get(0).unwrap().index(), 0);
        assert_eq!(chain.get(2).unwrap().index(), 2);
        assert!(chain.get(3).is_none());
        assert!(chain.get(u64::MAX).is_none());
    }

    #[test]
    fn verify_accepts_built_chain() {
        assert_eq!(chain_of(5).verify(), Ok(()));
    }

    #[test]
    fn verify_flags_unsealed_genesis() {
        let config = GenesisConfig {
            hash: Some("ab".repeat(32)),
            ..GenesisConfig::default()
        };
        let chain = Chain::new(&config).unwrap();
        assert!(matches!(
            chain.verify(),
            Err(ChainError::InvalidGenesis(ValidationError::Integrity { .. }))
        ));
    }

    #[test]
    fn from_blocks_round_trips_history() {
        let chain = chain_of(4);
        let rebuilt = Chain::from_blocks(chain.history().to_vec()).unwrap();
        assert_eq!(rebuilt, chain);
    }

    #[test]
    fn from_blocks_reports_position_of_break() {
        let chain = chain_of(3);
        let mut blocks = chain.history().to_vec();
        blocks.remove(2);

        assert_eq!(
            Chain::from_blocks(blocks),
            Err(ChainError::Rejected {
                position: 2,
                claimed: 3,
                source: LinkageFault::IndexGap {
                    expected: 2,
                    found: 3
                }
                .into(),
            })
        );
    }

    #[test]
    fn from_blocks_reports_position_not_claimed_index() {
        let genesis = Block::genesis(&GenesisConfig::default());
        let rogue = Block::sealed(u64::MAX, genesis.hash(), 1, "rogue");

        match Chain::from_blocks(vec![genesis, rogue]) {
            Err(ChainError::Rejected {
                position, claimed, ..
            }) => {
                assert_eq!(position, 1);
                assert_eq!(claimed, u64::MAX);
            }
            other => panic!("expected rejection at position 1, got {other:?}"),
        }
    }

    #[test]
    fn verify_reports_position_of_break() {
        let mut chain = chain_of(2);
        // Swap in a block that claims a far-off index; only reachable by
        // editing the history directly.
        let forged = Block::sealed(40, chain.genesis().hash(), 1, "forged");
        chain.blocks[1] = forged;

        match chain.verify() {
            Err(ChainError::Rejected {
                position, claimed, ..
            }) => {
                assert_eq!(position, 1);
                assert_eq!(claimed, 40);
            }
            other => panic!("expected rejection at position 1, got {other:?}"),
        }
    }

    #[test]
    fn from_blocks_requires_genesis() {
        assert_eq!(Chain::from_blocks(Vec::new()), Err(ChainError::EmptyHistory));
    }

    #[test]
    fn shared_chain_append_payload() {
        let shared = SharedChain::default();
        let factory = BlockFactory::new(ManualClock::at(5));

        let block = shared.append_payload(&factory, "hello").unwrap();
        assert_eq!(block.index(), 1);
        assert_eq!(shared.len(), 2);
        assert_eq!(shared.tip(), block);
        assert_eq!(shared.read(|c| c.verify()), Ok(()));
    }

    #[test]
    fn shared_chain_try_into_inner() {
        let shared = SharedChain::new(chain_of(1));
        let other = shared.clone();
        let shared = shared.try_into_inner().unwrap_err();
        drop(other);
        let chain = shared.try_into_inner().unwrap();
        assert_eq!(chain.len(), 2);
    }
}
