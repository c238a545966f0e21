#[cfg(test)]
mod integration_tests {
    use crate::config::{load_and_validate_config, ChainBuilder, HandlerKind};
    use crate::handlers::local::WriteFormat;
    use crate::message::{Facility, LogMessage, Severity};

    /// Test that YAML configurations can be loaded and parsed correctly
    #[test]
    fn test_simple_chain_yaml_loading() {
        let config = load_and_validate_config("configs/simple-chain.yaml").unwrap();

        assert_eq!(config.handlers.len(), 3);
        assert_eq!(config.handlers[0].id, "errors");
        assert_eq!(config.handlers[1].id, "auth");
        assert_eq!(config.handlers[2].id, "batches");
        assert!(config.handlers[0].forward);
        assert!(config.handlers[1].forward);
        assert!(!config.handlers[2].forward);
        assert_eq!(config.handlers[0].filter.min_severity, Some(Severity::Error));
        assert_eq!(
            config.handlers[1].filter.facilities,
            vec![Facility::Auth, Facility::Authpriv]
        );
        assert_eq!(config.handlers[2].kind, HandlerKind::Batch);
        assert_eq!(config.handlers[2].option_u64("batch_size"), Some(10));
    }

    /// Test that TOML configurations load through the same path
    #[test]
    fn test_file_output_toml_loading() {
        let config = load_and_validate_config("configs/file-output.toml").unwrap();

        assert_eq!(config.handlers.len(), 1);
        assert_eq!(config.handlers[0].kind, HandlerKind::Writer);
        assert_eq!(config.handlers[0].filter.tags, vec!["sshd".to_string()]);
        assert_eq!(
            config.handlers[0].option_str("format").and_then(WriteFormat::parse),
            Some(WriteFormat::Json)
        );
    }

    /// Test building and driving a chain from YAML configuration
    #[tokio::test]
    async fn test_chain_from_yaml_routes_messages() {
        let config = load_and_validate_config("configs/simple-chain.yaml").unwrap();
        let chain = ChainBuilder::from_config(&config).await.unwrap();
        assert_eq!(chain.ids(), vec!["errors", "auth", "batches"]);

        // copied by "errors", skipped by "auth", consumed by "batches"
        let error = LogMessage::new("boom").with_severity(Severity::Error).into_message();
        assert!(chain.dispatch(error).await.unwrap().is_none());

        // skipped by "errors", copied by "auth", consumed by "batches"
        let auth = LogMessage::new("login")
            .with_facility(Facility::Auth)
            .into_message();
        assert!(chain.dispatch(auth).await.unwrap().is_none());

        chain.shutdown().await.unwrap();
    }

    /// Test that an unvalidated configuration with a zero flush interval is
    /// rejected at build time instead of crashing the consumer task
    #[tokio::test]
    async fn test_chain_rejects_zero_flush_interval_without_validation() {
        let yaml = r#"
handlers:
  - id: m
    type: memory
  - id: b
    type: batch
    options:
      flush_interval_ms: 0
"#;
        let config: crate::config::Config = serde_yaml::from_str(yaml).unwrap();
        let err = ChainBuilder::from_config(&config).await.err().unwrap();
        assert!(matches!(
            err,
            crate::errors::ConfigError::HandlerCreation { ref handler_id, .. } if handler_id == "b"
        ));
    }
}
