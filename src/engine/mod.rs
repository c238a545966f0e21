pub mod chain;
pub mod feed;
#[cfg(test)]
pub mod integration_tests;

pub use chain::HandlerChain;
pub use feed::{feed_lines, run_lines, FeedSummary};
