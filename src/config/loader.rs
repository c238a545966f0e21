// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::consts::DEFAULT_QUEUE_CAPACITY;
use crate::errors::ConfigError;
use crate::handlers::filter::FilterConfig;
use crate::handlers::queued::QueueOptions;

/// Main configuration structure: the ordered handler chain.
///
/// Handlers see each message in the order they are declared here, and are
/// shut down in the same order.
///
/// # Example
/// ```yaml
/// handlers:
///   - id: auth_failures
///     type: writer
///     capacity: 256
///     forward: true
///     filter:
///       facilities: [auth, authpriv]
///       contains: "Failed password"
///     options:
///       path: /var/log/auth-failures.log
///   - id: everything_else
///     type: batch
///     options:
///       batch_size: 500
///       flush_interval_ms: 2000
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    pub handlers: Vec<HandlerConfig>,
}

/// Configuration for a single handler in the chain.
///
/// # Fields
/// * `id` - Unique identifier for this handler
/// * `kind` - The handler implementation (`type` in the file)
/// * `capacity` - Queue capacity; 0 drops every message
/// * `forward` - Pass messages on to later handlers even when queued here
/// * `filter` - Criteria a message must meet to be queued
/// * `options` - Implementation-specific options
#[derive(Debug, Deserialize)]
pub struct HandlerConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: HandlerKind,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub forward: bool,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>, // handler-specific options
}

fn default_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl HandlerConfig {
    pub fn queue_options(&self) -> QueueOptions {
        QueueOptions::new(self.capacity, self.forward)
    }

    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(|v| v.as_str())
    }

    pub fn option_u64(&self, key: &str) -> Option<u64> {
        self.options.get(key).and_then(|v| v.as_u64())
    }
}

/// Handler implementations that can be built from configuration.
///
/// # Variants
/// * `Writer` - Writes lines to a file or stdout
/// * `Memory` - Keeps messages in memory
/// * `Batch` - Groups messages into size- or time-bounded batches
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Writer,
    Memory,
    Batch,
}

/// Load a config from a YAML (`.yaml`/`.yml`) or TOML (`.toml`) file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load a config and run every validation check on it.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
