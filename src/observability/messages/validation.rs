// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration validation problems.
//!
//! This module contains message types for logging events related to:
//! * Duplicate handler ID detection
//! * Queue capacity bounds

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Duplicate handler ID detected in configuration.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use logpipe::observability::messages::validation::DuplicateHandlerId;
///
/// let msg = DuplicateHandlerId {
///     handler_id: "to_disk",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct DuplicateHandlerId<'a> {
    pub handler_id: &'a str,
}

impl Display for DuplicateHandlerId<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate handler ID: '{}'", self.handler_id)
    }
}

impl StructuredLog for DuplicateHandlerId<'_> {
    fn log(&self) {
        tracing::error!(handler_id = self.handler_id, "{}", self);
    }
}

/// Queue capacity above the configured hard limit.
///
/// # Log Level
/// `warn!` - Rejected configuration value
pub struct CapacityOutOfRange<'a> {
    pub handler_id: &'a str,
    pub capacity: usize,
    pub maximum: usize,
}

impl Display for CapacityOutOfRange<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Handler '{}' capacity {} exceeds maximum {}",
            self.handler_id, self.capacity, self.maximum
        )
    }
}

impl StructuredLog for CapacityOutOfRange<'_> {
    fn log(&self) {
        tracing::warn!(
            handler_id = self.handler_id,
            capacity = self.capacity,
            maximum = self.maximum,
            "{}", self
        );
    }
}
