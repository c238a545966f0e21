// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Line-oriented input for a [`HandlerChain`].
//!
//! Input is split on `\n` as raw bytes and decoded lossily, so a stray
//! non-UTF-8 byte in a syslog stream costs one replacement character instead
//! of the rest of the stream.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::HandlerChain;
use crate::errors::ChainError;
use crate::message::LogMessage;
use crate::observability::messages::chain::{InputExhausted, InputFailed};
use crate::observability::messages::StructuredLog;

/// Line counts from one pass over an input stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    /// Non-blank lines dispatched into the chain.
    pub received: u64,
    /// Lines that came out of the last handler without being consumed.
    pub unhandled: u64,
}

/// Dispatch every non-blank line of `reader` until end of input.
///
/// Stops at the first read or dispatch error. Does not shut the chain down;
/// see [`run_lines`] for that.
pub async fn feed_lines<R>(chain: &HandlerChain, reader: R) -> Result<FeedSummary, ChainError>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = FeedSummary::default();
    let mut segments = reader.split(b'\n');

    loop {
        let segment = match segments.next_segment().await {
            Ok(Some(segment)) => segment,
            Ok(None) => break,
            Err(source) => {
                let error = ChainError::Input { source };
                InputFailed {
                    received: summary.received,
                    error: &error,
                }
                .log();
                return Err(error);
            }
        };

        let line = String::from_utf8_lossy(&segment);
        if line.trim().is_empty() {
            continue;
        }
        summary.received += 1;

        match chain.dispatch(LogMessage::from_line(&line).into_message()).await {
            Ok(Some(_)) => summary.unhandled += 1,
            Ok(None) => {}
            Err(error) => {
                InputFailed {
                    received: summary.received,
                    error: &error,
                }
                .log();
                return Err(error);
            }
        }
    }

    InputExhausted {
        received: summary.received,
        unhandled: summary.unhandled,
    }
    .log();
    Ok(summary)
}

/// Feed `reader` through the chain, then shut the chain down.
///
/// Shutdown runs however feeding ended. An input error takes precedence over
/// a shutdown error in the result.
pub async fn run_lines<R>(chain: &HandlerChain, reader: R) -> Result<FeedSummary, ChainError>
where
    R: AsyncBufRead + Unpin,
{
    let fed = feed_lines(chain, reader).await;
    let shut_down = chain.shutdown().await;
    let summary = fed?;
    shut_down?;
    Ok(summary)
}
