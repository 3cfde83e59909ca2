//! Context builder for loggers with inherited fields
//!
//! Context fields are serialized once, when the derived logger is built, and
//! copied as raw bytes into every event that logger creates.

use super::encoder;
use super::logger::Logger;

/// Fluent accumulator of context fields
///
/// The builder works on its own private copy of the parent logger, so
/// builders started from the same parent, even on different threads, never
/// see each other's fields and the parent itself is never modified.
///
/// # Example
///
/// ```
/// use rust_event_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let root = Logger::new().with_output(sink.clone());
///
/// let request = root
///     .with_context()
///     .str("request_id", "r1")
///     .int("attempt", 2)
///     .bool("retry", true)
///     .logger();
///
/// request.info().msg("handled");
/// assert!(sink.contents().starts_with(r#"{"request_id":"r1","attempt":2,"retry":true,"#));
/// ```
#[must_use = "call `logger()` to obtain the derived logger"]
pub struct ContextBuilder {
    logger: Logger,
}

impl ContextBuilder {
    pub(crate) fn new(parent: &Logger) -> Self {
        Self {
            logger: parent.clone(),
        }
    }

    /// Add a string field
    pub fn str(mut self, key: &str, val: &str) -> Self {
        encoder::append_str(self.logger.context_mut(), key, val);
        self
    }

    /// Add a string field from bytes that may not be valid UTF-8
    pub fn bytes_str(mut self, key: &str, val: &[u8]) -> Self {
        encoder::append_bytes_str(self.logger.context_mut(), key, val);
        self
    }

    /// Add a signed integer field
    pub fn int(mut self, key: &str, val: i64) -> Self {
        encoder::append_int(self.logger.context_mut(), key, val);
        self
    }

    /// Add an unsigned integer field
    pub fn uint(mut self, key: &str, val: u64) -> Self {
        encoder::append_uint(self.logger.context_mut(), key, val);
        self
    }

    /// Add a boolean field
    pub fn bool(mut self, key: &str, val: bool) -> Self {
        encoder::append_bool(self.logger.context_mut(), key, val);
        self
    }

    /// Finish and return the derived logger
    pub fn logger(self) -> Logger {
        self.logger
    }
}
