// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Queued handler base: non-blocking enqueue, optional filtering and a
//! two-signal shutdown handshake.
//!
//! [`QueuedHandler::new`] returns two halves:
//!
//! * [`QueuedHandler`] - the producer side. It implements [`Handler`] and is
//!   what the driver talks to.
//! * [`Inbox`] - the consumer side. The concrete handler moves it into its own
//!   task and pulls messages with [`Inbox::get`] (or selects on
//!   [`Inbox::queue`]) until the input is closed and drained, then confirms
//!   shutdown with [`Inbox::end`].
//!
//! # Lifecycle
//!
//! ```text
//! OPEN --[handle(None)]--> CLOSING --[inbox drained + end()]--> CLOSED
//! ```
//!
//! `handle(Some(_))` never waits on the consumer: when the queue is full the
//! message is dropped. `handle(None)` closes the queue and then waits until the
//! consumer calls `end()`.
//!
//! # Example
//! ```rust
//! use logpipe::handlers::{QueuedHandler, QueueOptions};
//! use logpipe::message::LogMessage;
//! use logpipe::traits::Handler;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (handler, mut inbox) = QueuedHandler::new("printer", QueueOptions::default(), None);
//!
//! let consumer = tokio::spawn(async move {
//!     while let Some(msg) = inbox.get().await {
//!         println!("{}", msg.content);
//!     }
//!     inbox.end()
//! });
//!
//! handler.handle(Some(LogMessage::new("hello").into_message())).await?;
//! handler.handle(None).await?; // returns once the consumer has called end()
//! consumer.await??;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::{mpsc, oneshot, Mutex, Semaphore};
use tracing::{Instrument, Span};

use crate::config::consts::DEFAULT_QUEUE_CAPACITY;
use crate::errors::HandlerError;
use crate::handlers::filter::MessageFilter;
use crate::message::Message;
use crate::observability::messages::handler::{
    HandlerStarted, MessageDropped, ProtocolViolation, ShutdownCompleted, ShutdownRequested,
};
use crate::observability::messages::{StructuredLog, StructuredSpan};
use crate::traits::Handler;

/// Queue sizing and propagation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QueueOptions {
    /// Maximum number of buffered messages. Zero drops every message.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Return messages to the driver for downstream handlers, whether or not
    /// they matched the filter.
    #[serde(default)]
    pub forward: bool,
}

fn default_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            forward: false,
        }
    }
}

impl QueueOptions {
    pub fn new(capacity: usize, forward: bool) -> Self {
        Self { capacity, forward }
    }
}

/// Lifecycle state of a queued handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    /// Accepting messages.
    Open,
    /// Input closed; the consumer is draining its backlog.
    Closing,
    /// Consumer finished (or abandoned) shutdown. Terminal.
    Closed,
}

struct Inlet {
    sender: Option<mpsc::Sender<Message>>,
    end: Option<oneshot::Receiver<()>>,
    state: HandlerState,
}

/// Producer side of a queued handler.
pub struct QueuedHandler {
    name: String,
    options: QueueOptions,
    filter: Option<MessageFilter>,
    inlet: Mutex<Inlet>,
}

impl QueuedHandler {
    /// Create a handler and the inbox its consumer task will read from.
    pub fn new(
        name: impl Into<String>,
        options: QueueOptions,
        filter: Option<MessageFilter>,
    ) -> (Self, Inbox) {
        let name = name.into();
        // tokio channels need 1..=MAX_PERMITS slots; with capacity 0 the slot is never written
        let (sender, receiver) = mpsc::channel(options.capacity.clamp(1, Semaphore::MAX_PERMITS));
        let (end_tx, end_rx) = oneshot::channel();

        let started = HandlerStarted {
            handler: &name,
            capacity: options.capacity,
            forward: options.forward,
            filtered: filter.is_some(),
        };
        let span = started.span("consumer");
        span.in_scope(|| started.log());

        let handler = Self {
            name: name.clone(),
            options,
            filter,
            inlet: Mutex::new(Inlet {
                sender: Some(sender),
                end: Some(end_rx),
                state: HandlerState::Open,
            }),
        };
        let inbox = Inbox {
            name,
            receiver,
            end: end_tx,
            span,
        };
        (handler, inbox)
    }

    pub fn options(&self) -> QueueOptions {
        self.options
    }

    pub async fn state(&self) -> HandlerState {
        self.inlet.lock().await.state
    }

    async fn accept(&self, message: Message) -> Result<Option<Message>, HandlerError> {
        let inlet = self.inlet.lock().await;
        let sender = match (inlet.state, inlet.sender.as_ref()) {
            (HandlerState::Open, Some(sender)) => sender,
            _ => return Err(self.violation(HandlerError::Closed { handler: self.name.clone() })),
        };

        if let Some(filter) = &self.filter {
            if !filter(&message) {
                return Ok(self.options.forward.then_some(message));
            }
        }

        let forwarded = self.options.forward.then(|| Arc::clone(&message));
        self.enqueue(sender, message);
        Ok(forwarded)
    }

    fn enqueue(&self, sender: &mpsc::Sender<Message>, message: Message) {
        if self.options.capacity == 0 {
            self.dropped();
            return;
        }
        match sender.try_send(message) {
            Ok(()) => {}
            // a vanished consumer surfaces at shutdown as ConsumerAbandoned
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => self.dropped(),
        }
    }

    fn dropped(&self) {
        MessageDropped {
            handler: &self.name,
            capacity: self.options.capacity,
        }
        .log();
    }

    async fn shutdown(&self) -> Result<Option<Message>, HandlerError> {
        let end = {
            let mut inlet = self.inlet.lock().await;
            let end = match inlet.state {
                HandlerState::Open => inlet.end.take(),
                _ => None,
            };
            let Some(end) = end else {
                return Err(self.violation(HandlerError::Closed { handler: self.name.clone() }));
            };
            // dropping the only sender closes the queue
            inlet.sender = None;
            inlet.state = HandlerState::Closing;
            end
        };

        let requested = ShutdownRequested { handler: &self.name };
        let span = requested.span("handshake");
        span.in_scope(|| requested.log());
        let started = Instant::now();
        let confirmed = end.instrument(span).await;
        self.inlet.lock().await.state = HandlerState::Closed;

        match confirmed {
            Ok(()) => {
                ShutdownCompleted {
                    handler: &self.name,
                    duration: started.elapsed(),
                }
                .log();
                Ok(None)
            }
            Err(_) => Err(self.violation(HandlerError::ConsumerAbandoned {
                handler: self.name.clone(),
            })),
        }
    }

    fn violation(&self, error: HandlerError) -> HandlerError {
        ProtocolViolation {
            handler: &self.name,
            error: &error,
        }
        .log();
        error
    }
}

#[async_trait]
impl Handler for QueuedHandler {
    async fn handle(&self, message: Option<Message>) -> Result<Option<Message>, HandlerError> {
        match message {
            Some(message) => self.accept(message).await,
            None => self.shutdown().await,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for QueuedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedHandler")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

/// Consumer side of a queued handler.
///
/// Owned by the concrete handler's processing task. Dropping it without
/// calling [`Inbox::end`] makes the pending `handle(None)` fail with
/// [`HandlerError::ConsumerAbandoned`].
#[derive(Debug)]
pub struct Inbox {
    name: String,
    receiver: mpsc::Receiver<Message>,
    end: oneshot::Sender<()>,
    span: Span,
}

impl Inbox {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Span opened when the handler started. Consumer tasks run inside it.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Next message in FIFO order.
    ///
    /// Waits while the queue is empty and open. Returns `None` once the input
    /// is closed and every buffered message has been returned, and keeps
    /// returning `None` after that.
    pub async fn get(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    /// The underlying receiver, for consumers that select over several
    /// sources. `recv()` yielding `None` means closed and drained, exactly like
    /// [`Inbox::get`] returning `None`.
    pub fn queue(&mut self) -> &mut mpsc::Receiver<Message> {
        &mut self.receiver
    }

    /// Confirm shutdown, releasing the driver waiting in `handle(None)`.
    ///
    /// Must be the consumer's last step, after the queue has been observed
    /// closed and drained. Calling it earlier is an error: any remaining
    /// backlog is discarded, the end signal is not raised and the driver's
    /// `handle(None)` fails with [`HandlerError::ConsumerAbandoned`].
    pub fn end(mut self) -> Result<(), HandlerError> {
        let mut remaining = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(_) => remaining += 1,
                Err(TryRecvError::Empty) => {
                    return Err(self.violation(HandlerError::EndBeforeClose {
                        handler: self.name.clone(),
                    }))
                }
                Err(TryRecvError::Disconnected) => break,
            }
        }
        if remaining > 0 {
            return Err(self.violation(HandlerError::UndrainedBacklog {
                handler: self.name.clone(),
                remaining,
            }));
        }

        // the driver may already be gone; nothing left to notify then
        let _ = self.end.send(());
        Ok(())
    }

    fn violation(&self, error: HandlerError) -> HandlerError {
        ProtocolViolation {
            handler: &self.name,
            error: &error,
        }
        .log();
        error
    }
}
