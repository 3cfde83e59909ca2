//! Bridge for line-oriented text loggers
//!
//! Code that only knows how to write text lines, such as a
//! `"YYYY/MM/DD HH:MM:SS message\n"` logger, can be pointed at a
//! [`StdWriter`]. Each write becomes one `info` record tagged
//! `"source":"stdlib"`, sharing the logger's context, sinks and remote.

use crate::core::{LogLevel, Logger};
use std::fmt;
use std::io;

/// Lines shorter than this are taken verbatim, without prefix stripping
const MIN_PREFIXED_LEN: usize = 20;

/// Offset just past the second space of `line`, or 0 if there is none
///
/// For `"2024/01/02 15:04:05 message"` this is where `message` starts.
pub fn find_message_start(line: &[u8]) -> usize {
    line.iter()
        .enumerate()
        .filter(|(_, b)| **b == b' ')
        .nth(1)
        .map_or(0, |(i, _)| i + 1)
}

/// Extract the message part of one written chunk
///
/// A chunk longer than 20 bytes that ends in a newline is assumed to carry a
/// date and time prefix, which is dropped. The trailing newline is always
/// removed.
pub fn extract_message(chunk: &[u8]) -> &[u8] {
    let Some(body) = chunk.strip_suffix(b"\n") else {
        return chunk;
    };
    if chunk.len() > MIN_PREFIXED_LEN {
        &body[find_message_start(body)..]
    } else {
        body
    }
}

/// `io::Write` adapter turning text lines into records
///
/// # Example
///
/// ```
/// use rust_event_logger::prelude::*;
/// use std::io::Write;
///
/// let sink = MemorySink::new();
/// let logger = Logger::new().with_output(sink.clone());
///
/// let mut writer = logger.std_writer();
/// writer.write_all(b"2024/01/02 15:04:05 legacy subsystem started\n").unwrap();
///
/// let line = sink.contents();
/// assert!(line.contains(r#""source":"stdlib","message":"legacy subsystem started""#));
/// ```
///
/// The writer follows [`Logger::set_output`] on the logger it was made from.
#[derive(Debug)]
pub struct StdWriter {
    logger: Logger,
}

impl StdWriter {
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.share_output(),
        }
    }
}

impl Clone for StdWriter {
    fn clone(&self) -> Self {
        Self {
            logger: self.logger.share_output(),
        }
    }
}

impl io::Write for StdWriter {
    /// Always reports the whole chunk as written; delivery failures are
    /// handled like any other record's
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.logger
            .new_event(LogLevel::Info)
            .str("source", "stdlib")
            .msg_bytes(extract_message(buf));
        Ok(buf.len())
    }

    /// Formats the whole line before writing, so `writeln!` yields one record
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(text) => self.write_all(text.as_bytes()),
            None => self.write_all(fmt::format(args).as_bytes()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.logger
            .flush_sinks()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

impl Logger {
    /// Writer that turns each chunk written to it into an `info` record
    pub fn std_writer(&self) -> StdWriter {
        StdWriter::new(self)
    }

    /// Log `message` at info level, tagged as coming from plain-text logging
    pub fn print(&self, message: &str) {
        self.new_event(LogLevel::Info)
            .str("source", "stdlib")
            .msg(message);
    }

    /// Formatted variant of [`Logger::print`]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.new_event(LogLevel::Info)
            .str("source", "stdlib")
            .msgf(args);
    }
}
