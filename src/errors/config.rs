// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while validating a handler configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two handlers share an ID
    DuplicateHandlerId {
        handler_id: String,
    },
    /// The queue capacity exceeds the hard maximum
    CapacityOutOfRange {
        handler_id: String,
        capacity: usize,
        maximum: usize,
    },
    /// An option was provided with a value of the wrong shape
    InvalidOption {
        handler_id: String,
        option: String,
        reason: String,
    },
    /// The configuration declares no handlers at all
    EmptyChain,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateHandlerId { handler_id } => {
                write!(f, "Duplicate handler ID: '{}'", handler_id)
            }
            ValidationError::CapacityOutOfRange {
                handler_id,
                capacity,
                maximum,
            } => {
                write!(
                    f,
                    "Handler '{}' capacity {} exceeds the maximum of {}",
                    handler_id, capacity, maximum
                )
            }
            ValidationError::InvalidOption {
                handler_id,
                option,
                reason,
            } => {
                write!(
                    f,
                    "Handler '{}' option '{}' is invalid: {}",
                    handler_id, option, reason
                )
            }
            ValidationError::EmptyChain => write!(f, "Configuration declares no handlers"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors produced while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported config extension for {} (expected .yaml, .yml or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Invalid(Vec<ValidationError>),

    #[error("failed to create handler '{handler_id}': {reason}")]
    HandlerCreation { handler_id: String, reason: String },
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
