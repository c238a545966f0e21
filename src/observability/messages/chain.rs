// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for handler chain construction and shutdown.

use crate::observability::messages::{StructuredLog, StructuredSpan};
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Chain assembled from configuration.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ChainBuilt<'a> {
    pub handler_ids: &'a [&'a str],
}

impl Display for ChainBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler chain built with {} handler(s): {}",
            self.handler_ids.len(),
            self.handler_ids.join(" -> ")
        )
    }
}

impl StructuredLog for ChainBuilt<'_> {
    fn log(&self) {
        tracing::info!(handler_count = self.handler_ids.len(), "{}", self);
    }
}

/// Chain shutdown started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ChainShutdownStarted {
    pub handler_count: usize,
}

impl Display for ChainShutdownStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Shutting down {} handler(s)", self.handler_count)
    }
}

impl StructuredLog for ChainShutdownStarted {
    fn log(&self) {
        tracing::info!(handler_count = self.handler_count, "{}", self);
    }
}

impl StructuredSpan for ChainShutdownStarted {
    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "chain_shutdown",
            span_name = name,
            handler_count = self.handler_count,
        )
    }
}

/// Chain shutdown finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ChainShutdownCompleted {
    pub handler_count: usize,
    pub failures: usize,
    pub duration: std::time::Duration,
}

impl Display for ChainShutdownCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler chain shut down: {} handler(s), {} failure(s), duration={:?}",
            self.handler_count, self.failures, self.duration
        )
    }
}

impl StructuredLog for ChainShutdownCompleted {
    fn log(&self) {
        tracing::info!(
            handler_count = self.handler_count,
            failures = self.failures,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// A single handler failed to shut down cleanly.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct HandlerShutdownFailed<'a> {
    pub handler_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for HandlerShutdownFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler '{}' failed to shut down: {}",
            self.handler_id, self.error
        )
    }
}

impl StructuredLog for HandlerShutdownFailed<'_> {
    fn log(&self) {
        tracing::error!(handler_id = self.handler_id, error = %self.error, "{}", self);
    }
}

/// Input stream fully consumed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct InputExhausted {
    pub received: u64,
    pub unhandled: u64,
}

impl Display for InputExhausted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Input exhausted: {} line(s) received, {} not consumed by any handler",
            self.received, self.unhandled
        )
    }
}

impl StructuredLog for InputExhausted {
    fn log(&self) {
        tracing::info!(received = self.received, unhandled = self.unhandled, "{}", self);
    }
}

/// Reading or dispatching input stopped early. The chain is still shut down.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct InputFailed<'a> {
    pub received: u64,
    pub error: &'a dyn std::error::Error,
}

impl Display for InputFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Input stopped after {} line(s): {}",
            self.received, self.error
        )
    }
}

impl StructuredLog for InputFailed<'_> {
    fn log(&self) {
        tracing::error!(received = self.received, error = %self.error, "{}", self);
    }
}
