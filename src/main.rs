// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::env;
use tokio::io::BufReader;

use logpipe::config::{load_and_validate_config, ChainBuilder};
use logpipe::engine::run_lines;
use logpipe::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <config.yaml|config.toml>", args[0]);
        eprintln!("Reads log lines from stdin and feeds them through the configured handler chain.");
        eprintln!("Example: tail -f /var/log/syslog | {} configs/simple-chain.yaml", args[0]);
        std::process::exit(2);
    }

    let config = load_and_validate_config(&args[1])
        .with_context(|| format!("loading {}", args[1]))?;
    let chain = ChainBuilder::from_config(&config).await?;

    // shuts the chain down on every exit path once it is built
    let summary = run_lines(&chain, BufReader::new(tokio::io::stdin())).await?;
    tracing::info!(
        received = summary.received,
        unhandled = summary.unhandled,
        "All handlers shut down"
    );
    Ok(())
}
