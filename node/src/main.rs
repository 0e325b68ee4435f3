// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # linkchain Node
//!
//! Entry point for the `linkchain-node` binary. Parses CLI arguments,
//! initializes logging, and runs one command against an in-memory chain.
//!
//! - `build`   — build a chain from payloads, print the history as JSON
//! - `verify`  — replay an exported history through the validator
//! - `demo`    — accept one block, reject a mislinked one
//! - `version` — print build version information

mod cli;
mod commands;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;

use linkchain_protocol::{BlockFactory, SystemClock};

use cli::{Commands, LinkchainCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = LinkchainCli::parse();
    logging::init_logging(&cli.log_level, LogFormat::from_str_lossy(&cli.log_format));

    match cli.command {
        Commands::Build(args) => build(args),
        Commands::Verify(args) => verify(args),
        Commands::Demo => {
            for step in commands::demo(&BlockFactory::new(SystemClock::new()))? {
                println!("{step}");
            }
            Ok(())
        }
        Commands::Version => {
            for line in commands::version_lines() {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn build(args: cli::BuildArgs) -> Result<()> {
    let genesis = commands::load_genesis(args.genesis.as_deref())?;
    let factory = BlockFactory::new(SystemClock::new());
    let chain = commands::build_chain(&genesis, &factory, &args.payloads)?;

    let out = if args.pretty {
        serde_json::to_string_pretty(chain.history())
    } else {
        serde_json::to_string(chain.history())
    }
    .context("failed to serialize chain history")?;
    println!("{out}");
    Ok(())
}

fn verify(args: cli::VerifyArgs) -> Result<()> {
    tracing::info!(file = %args.file.display(), "verifying history");
    let report = commands::verify_file(&args.file)?;
    println!("{report}");

    if report["ok"] != true {
        bail!("history at {} failed verification", args.file.display());
    }
    Ok(())
}
