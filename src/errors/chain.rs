// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::HandlerError;

/// Errors surfaced by the handler chain driver.
#[derive(Error, Debug)]
pub enum ChainError {
    /// A handler failed while processing a message or shutting down.
    #[error("handler '{handler_id}' failed: {source}")]
    Handler {
        handler_id: String,
        #[source]
        source: HandlerError,
    },

    /// The input stream could not be read.
    #[error("failed to read input: {source}")]
    Input {
        #[source]
        source: std::io::Error,
    },

    /// The chain has already been shut down.
    #[error("handler chain is shut down")]
    ShutDown,
}
