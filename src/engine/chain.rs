// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ordered handler chain driver.
//!
//! The chain feeds each message to its handlers in order. A handler returning
//! `Ok(Some(_))` passes the (possibly different) message on to the next one; a
//! handler returning `Ok(None)` ends propagation for that message.
//!
//! Shutdown sends the sentinel to every handler in the same order and waits for
//! each before moving to the next, so when [`HandlerChain::shutdown`] returns,
//! every handler has drained its queue and released its resources.
//!
//! # Example
//! ```rust
//! use logpipe::engine::HandlerChain;
//! use logpipe::handlers::local::MemoryHandler;
//! use logpipe::handlers::QueueOptions;
//! use logpipe::message::LogMessage;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let memory = Arc::new(MemoryHandler::spawn("memory", QueueOptions::default(), None));
//! let sink = memory.sink();
//!
//! let mut chain = HandlerChain::new();
//! chain.push("memory", memory);
//!
//! let leftover = chain.dispatch(LogMessage::new("hello").into_message()).await?;
//! assert!(leftover.is_none()); // consumed by the memory handler
//!
//! chain.shutdown().await?;
//! assert_eq!(sink.len().await, 1);
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::errors::ChainError;
use crate::message::Message;
use crate::observability::messages::chain::{
    ChainShutdownCompleted, ChainShutdownStarted, HandlerShutdownFailed,
};
use crate::observability::messages::{StructuredLog, StructuredSpan};
use crate::traits::Handler;

struct ChainEntry {
    id: String,
    handler: Arc<dyn Handler>,
}

/// An ordered list of handlers sharing one message stream.
#[derive(Default)]
pub struct HandlerChain {
    entries: Vec<ChainEntry>,
    shut_down: AtomicBool,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler at the end of the chain.
    pub fn push(&mut self, id: impl Into<String>, handler: Arc<dyn Handler>) {
        self.entries.push(ChainEntry {
            id: id.into(),
            handler,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handler IDs in dispatch order.
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Feed one message through the chain.
    ///
    /// Returns the message that came out of the last handler, or `None` if a
    /// handler consumed it.
    pub async fn dispatch(&self, message: Message) -> Result<Option<Message>, ChainError> {
        if self.is_shut_down() {
            return Err(ChainError::ShutDown);
        }

        let mut current = message;
        for entry in &self.entries {
            let next = entry
                .handler
                .handle(Some(current))
                .await
                .map_err(|source| ChainError::Handler {
                    handler_id: entry.id.clone(),
                    source,
                })?;
            match next {
                Some(message) => current = message,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Shut every handler down in dispatch order.
    ///
    /// A failing handler does not stop the others from being shut down; the
    /// first failure is returned once all handlers have been visited.
    pub async fn shutdown(&self) -> Result<(), ChainError> {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return Err(ChainError::ShutDown);
        }

        let shutdown_started = ChainShutdownStarted {
            handler_count: self.entries.len(),
        };
        let span = shutdown_started.span("chain");
        span.in_scope(|| shutdown_started.log());
        let started = Instant::now();

        let (failures, first_failure) = self.shutdown_each().instrument(span.clone()).await;

        span.in_scope(|| {
            ChainShutdownCompleted {
                handler_count: self.entries.len(),
                failures,
                duration: started.elapsed(),
            }
            .log()
        });

        match first_failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn shutdown_each(&self) -> (usize, Option<ChainError>) {
        let mut first_failure = None;
        let mut failures = 0;
        for entry in &self.entries {
            if let Err(source) = entry.handler.handle(None).await {
                HandlerShutdownFailed {
                    handler_id: &entry.id,
                    error: &source,
                }
                .log();
                failures += 1;
                if first_failure.is_none() {
                    first_failure = Some(ChainError::Handler {
                        handler_id: entry.id.clone(),
                        source,
                    });
                }
            }
        }
        (failures, first_failure)
    }
}
