// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod batch;
pub mod factory;
pub mod memory;
pub mod writer;

pub use batch::{BatchHandler, BatchSettings, BatchSink, TracingBatchSink};
pub use factory::LocalHandlerFactory;
pub use memory::{MemoryHandler, MemorySink};
pub use writer::{WriteFormat, WriteTarget, WriterHandler};
