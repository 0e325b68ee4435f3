//! Command implementations. Each returns data; `main` decides how to print.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use linkchain_protocol::config::{GenesisConfig, PROTOCOL_VERSION};
use linkchain_protocol::storage::Block;
use linkchain_protocol::{BlockFactory, Chain, Clock, Outcome, Verdict};

/// Build a chain from `payloads` on top of the configured genesis.
pub fn build_chain<C: Clock>(
    genesis: &GenesisConfig,
    factory: &BlockFactory<C>,
    payloads: &[String],
) -> Result<Chain> {
    let mut chain = Chain::new(genesis).context("genesis block rejected")?;
    for payload in payloads {
        let candidate = factory.create_next(&chain, payload.as_str());
        chain
            .append(candidate)
            .with_context(|| format!("freshly built block for payload {payload:?} rejected"))?;
    }
    tracing::info!(blocks = chain.len(), tip = %chain.tip().hash(), "chain built");
    Ok(chain)
}

/// Load the genesis configuration, falling back to the built-in default.
pub fn load_genesis(path: Option<&Path>) -> Result<GenesisConfig> {
    match path {
        Some(p) => GenesisConfig::from_json_file(p)
            .with_context(|| format!("failed to load genesis config from {}", p.display())),
        None => Ok(GenesisConfig::default()),
    }
}

/// Replay an exported history and describe the result as JSON.
///
/// A history that fails is not an error of this function; the report says
/// what broke. Only unreadable input is.
pub fn verify_history(raw: &str) -> Value {
    let blocks: Vec<Block> = match serde_json::from_str(raw) {
        Ok(blocks) => blocks,
        Err(e) => {
            return json!({
                "ok": false,
                "outcome": Outcome::StructuralError.to_string(),
                "error": format!("malformed history: {e}"),
            })
        }
    };

    let chain = match Chain::from_blocks(blocks) {
        Ok(chain) => chain,
        Err(e) => return failure_report(&e),
    };
    if let Err(e) = chain.verify() {
        return failure_report(&e);
    }

    json!({
        "ok": true,
        "outcome": Outcome::Accepted.to_string(),
        "length": chain.len(),
        "tip": chain.tip().hash(),
    })
}

fn failure_report(e: &linkchain_protocol::ChainError) -> Value {
    use linkchain_protocol::ChainError;

    let (position, claimed, outcome) = match e {
        ChainError::EmptyHistory => (None, None, Outcome::StructuralError),
        ChainError::InvalidGenesis(v) => (Some(0), None, Verdict::Rejected(v.clone()).outcome()),
        ChainError::Rejected {
            position,
            claimed,
            source,
        } => (
            Some(*position),
            Some(*claimed),
            Verdict::Rejected(source.clone()).outcome(),
        ),
    };
    tracing::warn!(error = %e, "history failed verification");
    json!({
        "ok": false,
        "outcome": outcome.to_string(),
        "position": position,
        "claimedIndex": claimed,
        "error": e.to_string(),
    })
}

/// Verify the history stored in `path`.
pub fn verify_file(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history from {}", path.display()))?;
    Ok(verify_history(&raw))
}

/// The accept-then-reject walkthrough, one JSON line per step.
pub fn demo<C: Clock>(factory: &BlockFactory<C>) -> Result<Vec<Value>> {
    let mut chain = Chain::new(&GenesisConfig::default())?;
    let genesis_hash = chain.genesis().hash().to_string();
    let mut steps = vec![json!({
        "step": "genesis",
        "length": chain.len(),
        "tip": genesis_hash,
    })];

    let second = factory.create_next(&chain, "second block");
    let verdict = Verdict::from(chain.append(second));
    steps.push(json!({
        "step": "append second block",
        "outcome": verdict.outcome().to_string(),
        "length": chain.len(),
        "tipIndex": chain.tip().index(),
        "tipPreviousHash": chain.tip().previous_hash(),
    }));

    let rogue = Block::sealed(2, genesis_hash.as_str(), factory.clock().now_secs(), "rogue");
    let verdict = Verdict::from(chain.append(rogue));
    let reason = match &verdict {
        Verdict::Rejected(e) => Some(e.to_string()),
        Verdict::Accepted => None,
    };
    steps.push(json!({
        "step": "append index 2 linked to genesis",
        "outcome": verdict.outcome().to_string(),
        "reason": reason,
        "length": chain.len(),
    }));

    Ok(steps)
}

pub fn version_lines() -> Vec<String> {
    vec![
        format!("linkchain-node {}", env!("CARGO_PKG_VERSION")),
        format!("protocol       {}", PROTOCOL_VERSION),
        format!(
            "hash           {}",
            linkchain_protocol::config::HASH_ALGORITHM
        ),
    ]
}
