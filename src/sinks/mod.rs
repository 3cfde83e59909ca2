//! Local sink implementations
//!
//! Every sink receives complete records terminated by `\n` and serializes its
//! own writes, so one sink can be shared by many loggers and threads.

#[cfg(feature = "file")]
pub mod file;
pub mod memory;
pub mod stdout;
pub mod writer;

#[cfg(feature = "file")]
pub use file::FileSink;
pub use memory::MemorySink;
pub use stdout::{StderrSink, StdoutSink};
pub use writer::WriterSink;
