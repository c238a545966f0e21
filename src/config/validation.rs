// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation for the handler chain.
//!
//! All checks run and every problem is reported, so a broken file can be
//! fixed in one pass:
//!
//! 1. The chain declares at least one handler
//! 2. Handler IDs are unique
//! 3. Queue capacities are within [`MAX_QUEUE_CAPACITY`]
//! 4. Implementation-specific options have the right shape

use std::collections::HashSet;

use crate::config::consts::MAX_QUEUE_CAPACITY;
use crate::config::{Config, HandlerConfig, HandlerKind};
use crate::errors::ValidationError;
use crate::handlers::local::WriteFormat;
use crate::observability::messages::validation::{CapacityOutOfRange, DuplicateHandlerId};
use crate::observability::messages::StructuredLog;

pub fn validate_config(cfg: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if cfg.handlers.is_empty() {
        errors.push(ValidationError::EmptyChain);
    }

    let mut seen = HashSet::new();
    for handler in &cfg.handlers {
        if !seen.insert(handler.id.as_str()) {
            DuplicateHandlerId {
                handler_id: &handler.id,
            }
            .log();
            errors.push(ValidationError::DuplicateHandlerId {
                handler_id: handler.id.clone(),
            });
        }

        if handler.capacity > MAX_QUEUE_CAPACITY {
            CapacityOutOfRange {
                handler_id: &handler.id,
                capacity: handler.capacity,
                maximum: MAX_QUEUE_CAPACITY,
            }
            .log();
            errors.push(ValidationError::CapacityOutOfRange {
                handler_id: handler.id.clone(),
                capacity: handler.capacity,
                maximum: MAX_QUEUE_CAPACITY,
            });
        }

        validate_options(handler, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_options(handler: &HandlerConfig, errors: &mut Vec<ValidationError>) {
    let invalid = |option: &str, reason: &str| ValidationError::InvalidOption {
        handler_id: handler.id.clone(),
        option: option.to_string(),
        reason: reason.to_string(),
    };

    match handler.kind {
        HandlerKind::Writer => {
            if let Some(value) = handler.options.get("path") {
                if value.as_str().is_none() {
                    errors.push(invalid("path", "expected a string"));
                }
            }
            if let Some(value) = handler.options.get("format") {
                if value.as_str().and_then(WriteFormat::parse).is_none() {
                    errors.push(invalid("format", "expected 'text' or 'json'"));
                }
            }
        }
        HandlerKind::Batch => {
            for key in ["batch_size", "flush_interval_ms"] {
                if let Some(value) = handler.options.get(key) {
                    if !matches!(value.as_u64(), Some(n) if n > 0) {
                        errors.push(invalid(key, "expected a positive integer"));
                    }
                }
            }
        }
        HandlerKind::Memory => {}
    }
}
