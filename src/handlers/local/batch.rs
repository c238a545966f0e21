// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Handler that groups messages into batches.
//!
//! The consumer selects over its queue and a flush timer, so a batch is
//! delivered when it reaches `batch_size` or when `flush_interval` elapses,
//! whichever comes first. The partial batch left at shutdown is delivered
//! before shutdown is confirmed.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;

use crate::config::consts::{DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_INTERVAL_MS};
use crate::errors::HandlerError;
use crate::handlers::filter::MessageFilter;
use crate::handlers::queued::{Inbox, QueueOptions, QueuedHandler};
use crate::message::Message;
use crate::observability::messages::handler::{BatchFlushed, SinkWriteFailed};
use crate::observability::messages::StructuredLog;
use crate::traits::Handler;

/// Destination for completed batches.
#[async_trait]
pub trait BatchSink: Send + 'static {
    async fn flush(&mut self, batch: Vec<Message>) -> Result<(), HandlerError>;
}

/// Default sink: records each batch as a structured log event.
#[derive(Debug)]
pub struct TracingBatchSink {
    handler: String,
}

impl TracingBatchSink {
    pub fn new(handler: impl Into<String>) -> Self {
        Self { handler: handler.into() }
    }
}

#[async_trait]
impl BatchSink for TracingBatchSink {
    async fn flush(&mut self, batch: Vec<Message>) -> Result<(), HandlerError> {
        BatchFlushed {
            handler: &self.handler,
            size: batch.len(),
            first_priority: batch.first().map(|m| m.priority()),
        }
        .log();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    pub batch_size: usize,
    pub flush_interval: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: Duration::from_millis(DEFAULT_FLUSH_INTERVAL_MS),
        }
    }
}

pub struct BatchHandler {
    base: QueuedHandler,
}

impl BatchHandler {
    pub fn spawn<S: BatchSink>(
        name: impl Into<String>,
        options: QueueOptions,
        filter: Option<MessageFilter>,
        settings: BatchSettings,
        sink: S,
    ) -> Self {
        let (base, inbox) = QueuedHandler::new(name, options, filter);
        let span = inbox.span().clone();
        tokio::spawn(Self::consume(inbox, sink, settings).instrument(span));
        Self { base }
    }

    async fn consume<S: BatchSink>(mut inbox: Inbox, mut sink: S, settings: BatchSettings) -> Result<(), HandlerError> {
        let batch_size = settings.batch_size.max(1);
        let mut batch = Vec::with_capacity(batch_size);
        // tokio rejects a zero period
        let flush_interval = settings.flush_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                next = inbox.queue().recv() => match next {
                    Some(message) => {
                        batch.push(message);
                        if batch.len() >= batch_size {
                            deliver(&inbox, &mut sink, &mut batch).await;
                        }
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    if !batch.is_empty() {
                        deliver(&inbox, &mut sink, &mut batch).await;
                    }
                }
            }
        }

        if !batch.is_empty() {
            deliver(&inbox, &mut sink, &mut batch).await;
        }
        drop(sink);
        inbox.end()
    }
}

async fn deliver<S: BatchSink>(inbox: &Inbox, sink: &mut S, batch: &mut Vec<Message>) {
    let full = std::mem::take(batch);
    if let Err(e) = sink.flush(full).await {
        SinkWriteFailed { handler: inbox.name(), error: &e }.log();
    }
}

#[async_trait]
impl Handler for BatchHandler {
    async fn handle(&self, message: Option<Message>) -> Result<Option<Message>, HandlerError> {
        self.base.handle(message).await
    }

    fn name(&self) -> &str {
        self.base.name()
    }
}
