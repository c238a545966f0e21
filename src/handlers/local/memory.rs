// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::Instrument;

use crate::errors::HandlerError;
use crate::handlers::filter::MessageFilter;
use crate::handlers::queued::{Inbox, QueueOptions, QueuedHandler};
use crate::message::Message;
use crate::traits::Handler;

/// Shared, growable store of the messages a [`MemoryHandler`] consumed.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl MemorySink {
    pub async fn snapshot(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }

    async fn push(&self, message: Message) {
        self.messages.lock().await.push(message);
    }
}

/// Keeps every consumed message in memory.
pub struct MemoryHandler {
    base: QueuedHandler,
    sink: MemorySink,
}

impl MemoryHandler {
    /// Create the handler and spawn its consumer task on the current runtime.
    pub fn spawn(name: impl Into<String>, options: QueueOptions, filter: Option<MessageFilter>) -> Self {
        let (base, inbox) = QueuedHandler::new(name, options, filter);
        let sink = MemorySink::default();
        let span = inbox.span().clone();
        tokio::spawn(Self::consume(inbox, sink.clone()).instrument(span));
        Self { base, sink }
    }

    pub fn sink(&self) -> MemorySink {
        self.sink.clone()
    }

    async fn consume(mut inbox: Inbox, sink: MemorySink) -> Result<(), HandlerError> {
        while let Some(message) = inbox.get().await {
            sink.push(message).await;
        }
        inbox.end()
    }
}

#[async_trait]
impl Handler for MemoryHandler {
    async fn handle(&self, message: Option<Message>) -> Result<Option<Message>, HandlerError> {
        self.base.handle(message).await
    }

    fn name(&self) -> &str {
        self.base.name()
    }
}
