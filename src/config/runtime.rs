// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::Config;
use crate::engine::HandlerChain;
use crate::errors::ConfigError;
use crate::handlers::local::LocalHandlerFactory;
use crate::observability::messages::{chain::ChainBuilt, StructuredLog};

/// Chain builder - turns a validated configuration into a running handler chain.
///
/// Every handler's consumer task is spawned on the current tokio runtime as it
/// is created, so this must be called from within a runtime.
///
/// # Examples
///
/// ```
/// use logpipe::config::{ChainBuilder, Config, HandlerConfig, HandlerKind};
/// use logpipe::handlers::FilterConfig;
/// use std::collections::HashMap;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     handlers: vec![HandlerConfig {
///         id: "memory".to_string(),
///         kind: HandlerKind::Memory,
///         capacity: 16,
///         forward: false,
///         filter: FilterConfig::default(),
///         options: HashMap::new(),
///     }],
/// };
///
/// let chain = ChainBuilder::from_config(&config).await?;
/// assert_eq!(chain.ids(), vec!["memory"]);
/// chain.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct ChainBuilder;

impl ChainBuilder {
    /// Build the handler chain in configuration order.
    ///
    /// If a handler fails to build, the handlers created so far are shut down
    /// before the error is returned.
    pub async fn from_config(cfg: &Config) -> Result<HandlerChain, ConfigError> {
        let mut chain = HandlerChain::new();

        for handler_cfg in &cfg.handlers {
            match LocalHandlerFactory::create_handler(handler_cfg).await {
                Ok(handler) => chain.push(handler_cfg.id.clone(), handler),
                Err(e) => {
                    // failures here are already logged by the chain
                    let _ = chain.shutdown().await;
                    return Err(e);
                }
            }
        }

        ChainBuilt {
            handler_ids: &chain.ids(),
        }
        .log();
        Ok(chain)
    }
}
