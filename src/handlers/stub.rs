// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::HandlerError;
use crate::message::Message;
use crate::traits::Handler;

/// Returns every message unchanged and counts what it saw
#[derive(Default)]
pub struct PassthroughHandler {
    pub seen: AtomicUsize,
    pub shut_down: AtomicBool,
}

#[async_trait::async_trait]
impl Handler for PassthroughHandler {
    async fn handle(&self, message: Option<Message>) -> Result<Option<Message>, HandlerError> {
        match message {
            Some(message) => {
                self.seen.fetch_add(1, Ordering::SeqCst);
                Ok(Some(message))
            }
            None => {
                self.shut_down.store(true, Ordering::SeqCst);
                Ok(None)
            }
        }
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}

/// Consumes every message, stopping propagation
#[derive(Default)]
pub struct SwallowHandler {
    pub seen: AtomicUsize,
}

#[async_trait::async_trait]
impl Handler for SwallowHandler {
    async fn handle(&self, message: Option<Message>) -> Result<Option<Message>, HandlerError> {
        if message.is_some() {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        "swallow"
    }
}

/// Fails its shutdown as if its consumer had crashed
pub struct AbandonedHandler;

#[async_trait::async_trait]
impl Handler for AbandonedHandler {
    async fn handle(&self, message: Option<Message>) -> Result<Option<Message>, HandlerError> {
        match message {
            Some(message) => Ok(Some(message)),
            None => Err(HandlerError::ConsumerAbandoned {
                handler: "abandoned".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "abandoned"
    }
}

pub fn shared<H: Handler + 'static>(handler: H) -> (Arc<H>, Arc<dyn Handler>) {
    let handler = Arc::new(handler);
    let dynamic: Arc<dyn Handler> = handler.clone();
    (handler, dynamic)
}
