// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for queued handler lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Handler construction
//! * Queue overflow drops
//! * The shutdown handshake and protocol violations
//! * Sink failures and batch flushes in concrete handlers

use crate::observability::messages::{StructuredLog, StructuredSpan};
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Handler constructed and ready to accept messages.
///
/// # Log Level
/// `info!` - Important operational event
pub struct HandlerStarted<'a> {
    pub handler: &'a str,
    pub capacity: usize,
    pub forward: bool,
    pub filtered: bool,
}

impl Display for HandlerStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler '{}' started: capacity={}, forward={}, filtered={}",
            self.handler, self.capacity, self.forward, self.filtered
        )
    }
}

impl StructuredLog for HandlerStarted<'_> {
    fn log(&self) {
        tracing::info!(
            handler = self.handler,
            capacity = self.capacity,
            forward = self.forward,
            filtered = self.filtered,
            "{}", self
        );
    }
}

impl StructuredSpan for HandlerStarted<'_> {
    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "handler",
            span_name = name,
            handler = self.handler,
            capacity = self.capacity,
        )
    }
}

/// Message dropped because the handler queue was full.
///
/// Dropping is normal behavior, so this is only visible at trace level.
///
/// # Log Level
/// `trace!` - High-volume diagnostic event
pub struct MessageDropped<'a> {
    pub handler: &'a str,
    pub capacity: usize,
}

impl Display for MessageDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler '{}' queue full (capacity={}), message dropped",
            self.handler, self.capacity
        )
    }
}

impl StructuredLog for MessageDropped<'_> {
    fn log(&self) {
        tracing::trace!(handler = self.handler, capacity = self.capacity, "{}", self);
    }
}

/// Shutdown sentinel received; input closed, waiting for the consumer.
///
/// # Log Level
/// `debug!` - Lifecycle detail
pub struct ShutdownRequested<'a> {
    pub handler: &'a str,
}

impl Display for ShutdownRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler '{}' input closed, waiting for consumer to drain",
            self.handler
        )
    }
}

impl StructuredLog for ShutdownRequested<'_> {
    fn log(&self) {
        tracing::debug!(handler = self.handler, "{}", self);
    }
}

impl StructuredSpan for ShutdownRequested<'_> {
    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("shutdown", span_name = name, handler = self.handler)
    }
}

/// Consumer confirmed shutdown.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ShutdownCompleted<'a> {
    pub handler: &'a str,
    pub duration: std::time::Duration,
}

impl Display for ShutdownCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler '{}' shut down in {:?}",
            self.handler, self.duration
        )
    }
}

impl StructuredLog for ShutdownCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            handler = self.handler,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// Handler protocol misuse detected.
///
/// # Log Level
/// `error!` - Bug in a concrete handler or in the driver
pub struct ProtocolViolation<'a> {
    pub handler: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ProtocolViolation<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler '{}' protocol violation: {}",
            self.handler, self.error
        )
    }
}

impl StructuredLog for ProtocolViolation<'_> {
    fn log(&self) {
        tracing::error!(handler = self.handler, error = %self.error, "{}", self);
    }
}

/// A concrete handler failed to deliver a message to its sink.
///
/// The handler keeps draining; the message is lost.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct SinkWriteFailed<'a> {
    pub handler: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for SinkWriteFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Handler '{}' failed to write to its sink: {}", self.handler, self.error)
    }
}

impl StructuredLog for SinkWriteFailed<'_> {
    fn log(&self) {
        tracing::error!(handler = self.handler, error = %self.error, "{}", self);
    }
}

/// Batch handed to a batch sink.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BatchFlushed<'a> {
    pub handler: &'a str,
    pub size: usize,
    pub first_priority: Option<u8>,
}

impl Display for BatchFlushed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Handler '{}' flushed a batch of {} message(s)", self.handler, self.size)
    }
}

impl StructuredLog for BatchFlushed<'_> {
    fn log(&self) {
        tracing::info!(
            handler = self.handler,
            size = self.size,
            first_priority = self.first_priority,
            "{}", self
        );
    }
}
