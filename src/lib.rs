//! # Rust Event Logger
//!
//! A structured JSON logger built around cheap, chainable events.
//!
//! A [`Logger`] is immutable configuration: a minimum level, a list of sinks,
//! an optional remote sink and a block of pre-serialized context fields.
//! Every configuration method returns a new, independent logger. Log calls
//! produce an [`Event`] that accumulates typed fields and writes one JSON
//! object per line when finished.
//!
//! ## Features
//!
//! - **Zero work when disabled**: a suppressed level never touches the
//!   buffer pool or formats anything
//! - **Pooled buffers**: steady-state logging reuses event buffers
//! - **Inherited context**: derived loggers carry fields serialized once
//! - **Fan-out**: local sinks plus one remote sink, sync or async
//!
//! ## Example
//!
//! ```
//! use rust_event_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new()
//!     .with_output(sink.clone())
//!     .with_level(LogLevel::Debug);
//!
//! let request = logger.with_context().str("request_id", "r-42").logger();
//! request.debug().uint("bytes", 512).msg("read body");
//!
//! let record: serde_json::Value = serde_json::from_str(&sink.lines()[0]).unwrap();
//! assert_eq!(record["request_id"], "r-42");
//! assert_eq!(record["bytes"], 512);
//! assert_eq!(record["level"], "debug");
//! ```

pub mod compat;
pub mod config;
pub mod core;
pub mod macros;
pub mod remote;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        ContextBuilder, Event, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
        RemoteSink, Result, Sink,
    };
    pub use crate::remote::HttpOption;
    pub use crate::sinks::{MemorySink, StderrSink, StdoutSink};
}

pub use compat::StdWriter;
pub use config::LoggerConfig;
pub use core::{
    default_logger, set_default, ContextBuilder, Event, EventPool, LogLevel, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, PoolStats, RemoteSink, Result, Sink,
    SinkErrorCallback,
};
pub use remote::{HttpOption, HttpRemoteSink};
pub use sinks::{MemorySink, StderrSink, StdoutSink, WriterSink};
