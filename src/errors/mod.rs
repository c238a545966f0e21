// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod chain;
mod config;
mod handler;

pub use chain::ChainError;
pub use config::{ConfigError, ValidationError};
pub use handler::HandlerError;
