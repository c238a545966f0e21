// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::message::Message;

/// A stage in the log handler chain.
///
/// The driver calls `handle` once per message, in arrival order, and passes the
/// result on to the next handler in the chain:
///
/// * `Ok(Some(message))` - keep propagating (the message may be the same `Arc`
///   or a different one).
/// * `Ok(None)` - the message was consumed; stop propagating it.
///
/// Calling `handle(None)` asks the handler to shut down. The call must not
/// return until all outstanding work is complete and every resource owned by
/// the handler has been released; it then returns `Ok(None)`. Exactly one such
/// call is expected per handler; any call afterwards is a protocol violation
/// reported as [`HandlerError::Closed`].
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, message: Option<Message>) -> Result<Option<Message>, HandlerError>;

    fn name(&self) -> &str;
}
