// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit the same event with structured fields at the level
//! documented on the type.
//!
//! * `handler` - queued handler lifecycle and drop events
//! * `chain` - handler chain construction and shutdown
//! * `validation` - configuration validation problems
//!
//! # Usage Pattern
//!
//! ```rust
//! use logpipe::observability::messages::{handler::HandlerStarted, StructuredLog};
//!
//! let msg = HandlerStarted {
//!     handler: "errors_to_file",
//!     capacity: 1024,
//!     forward: true,
//!     filtered: false,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod chain;
pub mod handler;
pub mod validation;

/// A log event that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the event at its documented level.
    fn log(&self);
}

/// An event that opens a unit of work. Its span carries the event's fields
/// and wraps everything logged until that work is done.
pub trait StructuredSpan: StructuredLog {
    fn span(&self, name: &str) -> Span;
}
