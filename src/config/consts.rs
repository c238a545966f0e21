/// Default number of messages a handler queue can hold
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
/// Largest queue capacity accepted from configuration
pub const MAX_QUEUE_CAPACITY: usize = 1 << 20;
/// Default number of messages per batch for the batch handler
pub const DEFAULT_BATCH_SIZE: usize = 100;
/// Default flush interval for the batch handler, in milliseconds
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1_000;
