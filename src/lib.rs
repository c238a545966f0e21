// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;        // config loading + chain builder
pub mod engine;        // handler chain driver
pub mod errors;        // error handling
pub mod handlers;      // queued base + local handlers
pub mod message;       // log message model
pub mod observability;
pub mod traits;        // handler contract

pub use crate::config::{ChainBuilder, Config};
pub use crate::engine::HandlerChain;
pub use crate::message::{LogMessage, Message};
pub use crate::traits::Handler;
