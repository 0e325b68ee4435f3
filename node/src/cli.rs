//! # CLI Interface
//!
//! Defines the command-line argument structure for `linkchain-node` using
//! `clap` derive. Four subcommands: `build`, `verify`, `demo`, and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// linkchain node: build and audit hash-linked block sequences.
///
/// Chains live in memory for the duration of one command. `build` prints
/// the resulting history as JSON on stdout; `verify` reads such a history
/// back and replays it through the validator.
#[derive(Parser, Debug)]
#[command(
    name = "linkchain-node",
    about = "Build and verify append-only hash-linked chains",
    version,
    propagate_version = true
)]
pub struct LinkchainCli {
    /// Log output format: "pretty" or "json".
    #[arg(long, global = true, env = "LINKCHAIN_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(
        long,
        global = true,
        env = "LINKCHAIN_LOG_LEVEL",
        default_value = "linkchain_node=info,linkchain_protocol=info"
    )]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a chain from payloads and print its history as JSON.
    Build(BuildArgs),
    /// Replay an exported JSON history through the validator.
    Verify(VerifyArgs),
    /// Walk through a short accept/reject scenario and print each outcome.
    Demo,
    /// Print version information and exit.
    Version,
}

/// Arguments for the `build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Payload for one block. Repeat for more blocks, in order.
    #[arg(long = "payload", short = 'p', required = true)]
    pub payloads: Vec<String>,

    /// Genesis configuration file (JSON). Defaults to the built-in genesis.
    #[arg(long, short = 'g', env = "LINKCHAIN_GENESIS")]
    pub genesis: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `verify` subcommand.
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Path to a JSON array of blocks, as printed by `build`.
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}
