// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by handlers.
//!
//! Capacity overflow is deliberately absent: a full queue drops the message
//! silently. Everything here is either a protocol violation by the code driving
//! or implementing a handler, or an I/O failure of a concrete handler's sink.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandlerError {
    /// `handle` was called after the shutdown sentinel had been received.
    #[error("handler '{handler}' is shut down and accepts no further messages")]
    Closed { handler: String },

    /// The consumer side went away without confirming shutdown via `end()`.
    #[error("handler '{handler}' consumer exited without confirming shutdown")]
    ConsumerAbandoned { handler: String },

    /// `end()` was called while the input side was still open.
    #[error("handler '{handler}' called end() before its input was closed")]
    EndBeforeClose { handler: String },

    /// `end()` was called with messages still buffered; they are discarded.
    #[error("handler '{handler}' called end() with {remaining} undrained message(s)")]
    UndrainedBacklog { handler: String, remaining: usize },

    /// Sink I/O failure inside a concrete handler.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Message serialization failure inside a concrete handler.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HandlerError {
    /// True for errors caused by misuse of the handler protocol rather than
    /// by the environment.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            HandlerError::Closed { .. }
                | HandlerError::ConsumerAbandoned { .. }
                | HandlerError::EndBeforeClose { .. }
                | HandlerError::UndrainedBacklog { .. }
        )
    }
}
