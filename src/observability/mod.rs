// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for diagnostic and operational
//! logging throughout logpipe. Message types follow a struct-based pattern with a
//! `Display` implementation so that log text is not scattered through the code as
//! magic strings.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::handler` - queued handler lifecycle
//! * `messages::chain` - chain construction and shutdown
//! * `messages::validation` - configuration validation
//!
//! [`init_tracing`] installs the `tracing-subscriber` formatter used by the binary.

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber honouring `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
