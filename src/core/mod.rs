//! Core logger types and traits

pub mod context;
pub mod encoder;
pub mod error;
pub mod event;
pub mod event_pool;
pub mod global;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod remote;
pub mod sink;

pub use context::ContextBuilder;
pub use error::{LoggerError, Result};
pub use event::Event;
pub use event_pool::{EventPool, PoolStats, MAX_POOLED_CAPACITY};
pub use global::{default_logger, set_default};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, SinkErrorCallback};
pub use metrics::LoggerMetrics;
pub use remote::RemoteSink;
pub use sink::Sink;
