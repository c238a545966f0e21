// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Handler implementations for the logpipe chain.
//!
//! Every handler implements the [`Handler`](crate::traits::Handler) trait and can
//! be instantiated through the configuration-driven factory.
//!
//! # Building Blocks
//!
//! ## Queued Base
//! [`QueuedHandler`] turns the handler contract into a non-blocking producer path
//! plus a consumer-driven pull model:
//! - **Bounded queue**: overflow drops the message, the producer never waits
//! - **Filtering**: optional predicate deciding what enters the queue
//! - **Forwarding**: optionally pass every message on to later handlers
//! - **Shutdown handshake**: `handle(None)` returns only after the consumer
//!   drained its queue and confirmed with [`Inbox::end`]
//!
//! ## Local Handlers
//! In-process handlers built on the queued base:
//! - **WriterHandler**: text or JSON lines to a file or stdout
//! - **MemoryHandler**: collects messages for inspection
//! - **BatchHandler**: size- and time-bounded batches
//!
//! ## Stub Handlers (Test-Only)
//! Synchronous handlers for exercising the chain driver. Not available in
//! production builds.
//!
//! # Architecture
//!
//! ```text
//! Configuration → LocalHandlerFactory → Handler Instance → HandlerChain
//! ```

pub mod filter;
pub mod local;
pub mod queued;
#[cfg(test)]
pub mod stub;

pub use filter::{message_filter, FilterConfig, MessageFilter};
pub use queued::{HandlerState, Inbox, QueueOptions, QueuedHandler};
