// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;

use super::{BatchHandler, BatchSettings, MemoryHandler, TracingBatchSink, WriteFormat, WriteTarget, WriterHandler};
use crate::config::HandlerConfig;
use crate::config::HandlerKind;
use crate::errors::ConfigError;
use crate::traits::Handler;

/// Factory for creating local (in-process) handler instances
pub struct LocalHandlerFactory;

impl LocalHandlerFactory {
    /// Create a handler from configuration and start its consumer task.
    ///
    /// The `type` field selects the implementation:
    /// - `writer` -> WriterHandler (`path`, default stdout; `format`, default text)
    /// - `memory` -> MemoryHandler
    /// - `batch` -> BatchHandler logging each batch (`batch_size`, `flush_interval_ms`)
    pub async fn create_handler(config: &HandlerConfig) -> Result<Arc<dyn Handler>, ConfigError> {
        let options = config.queue_options();
        let filter = config.filter.clone().into_filter();

        match config.kind {
            HandlerKind::Writer => {
                let format = match config.option_str("format") {
                    Some(value) => WriteFormat::parse(value).ok_or_else(|| ConfigError::HandlerCreation {
                        handler_id: config.id.clone(),
                        reason: format!("unknown format '{}'", value),
                    })?,
                    None => WriteFormat::default(),
                };
                let target = WriteTarget::from_option(config.option_str("path"));
                let handler = WriterHandler::open(config.id.clone(), options, filter, target, format)
                    .await
                    .map_err(|e| ConfigError::HandlerCreation {
                        handler_id: config.id.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(Arc::new(handler))
            }
            HandlerKind::Memory => Ok(Arc::new(MemoryHandler::spawn(config.id.clone(), options, filter))),
            HandlerKind::Batch => {
                let mut settings = BatchSettings::default();
                if let Some(size) = config.option_u64("batch_size") {
                    settings.batch_size = positive(config, "batch_size", size)? as usize;
                }
                if let Some(ms) = config.option_u64("flush_interval_ms") {
                    settings.flush_interval = Duration::from_millis(positive(config, "flush_interval_ms", ms)?);
                }
                let sink = TracingBatchSink::new(config.id.clone());
                Ok(Arc::new(BatchHandler::spawn(config.id.clone(), options, filter, settings, sink)))
            }
        }
    }

    /// List all available local handler implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec!["writer", "memory", "batch"]
    }
}

fn positive(config: &HandlerConfig, option: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::HandlerCreation {
            handler_id: config.id.clone(),
            reason: format!("option '{}' must be a positive integer", option),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::filter::FilterConfig;
    use crate::message::{LogMessage, Severity};
    use std::collections::HashMap;

    fn create_test_config(id: &str, kind: HandlerKind) -> HandlerConfig {
        HandlerConfig {
            id: id.to_string(),
            kind,
            capacity: 8,
            forward: false,
            filter: FilterConfig::default(),
            options: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_create_each_kind() {
        for kind in [HandlerKind::Memory, HandlerKind::Batch, HandlerKind::Writer] {
            let config = create_test_config("h", kind);
            let handler = LocalHandlerFactory::create_handler(&config)
                .await
                .unwrap_or_else(|e| panic!("Failed to create {:?}: {}", kind, e));
            assert_eq!(handler.name(), "h");
            assert!(handler.handle(None).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_filter_from_config_is_applied() {
        let mut config = create_test_config("errors", HandlerKind::Memory);
        config.forward = true;
        config.filter.min_severity = Some(Severity::Error);
        let handler = LocalHandlerFactory::create_handler(&config).await.unwrap();

        let notice = LogMessage::new("fine").into_message();
        assert!(handler.handle(Some(notice)).await.unwrap().is_some());
        handler.handle(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_writer_opens_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.log");
        let mut config = create_test_config("w", HandlerKind::Writer);
        config.options.insert(
            "path".into(),
            serde_yaml::Value::String(path.to_string_lossy().into_owned()),
        );
        config
            .options
            .insert("format".into(), serde_yaml::Value::String("json".into()));

        let handler = LocalHandlerFactory::create_handler(&config).await.unwrap();
        handler
            .handle(Some(LogMessage::new("hi").into_message()))
            .await
            .unwrap();
        handler.handle(None).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"content\":\"hi\""));
    }

    #[tokio::test]
    async fn test_writer_with_unopenable_path_fails() {
        let mut config = create_test_config("w", HandlerKind::Writer);
        config.options.insert(
            "path".into(),
            serde_yaml::Value::String("/nonexistent-dir/for/sure/out.log".into()),
        );
        let err = LocalHandlerFactory::create_handler(&config).await.err().unwrap();
        assert!(matches!(err, ConfigError::HandlerCreation { .. }));
    }

    #[tokio::test]
    async fn test_batch_with_zero_options_fails() {
        for option in ["batch_size", "flush_interval_ms"] {
            let mut config = create_test_config("b", HandlerKind::Batch);
            config
                .options
                .insert(option.into(), serde_yaml::Value::Number(0u64.into()));
            let err = LocalHandlerFactory::create_handler(&config).await.err().unwrap();
            match err {
                ConfigError::HandlerCreation { handler_id, reason } => {
                    assert_eq!(handler_id, "b");
                    assert!(reason.contains(option));
                }
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn test_list_available_implementations() {
        let available = LocalHandlerFactory::list_available_implementations();
        assert_eq!(available, vec!["writer", "memory", "batch"]);
    }
}
