//! Per-call event accumulator
//!
//! An [`Event`] is created by a level method on [`Logger`](super::Logger),
//! collects fields in call order and is consumed by one of the terminal
//! methods ([`Event::msg`], [`Event::msgf`], [`Event::send`]). Because the
//! terminal methods take `self`, an event cannot be touched after it was
//! written.
//!
//! An event for a disabled level is an empty handle: every method on it is a
//! no-op and nothing was allocated or taken from the pool.

use super::encoder;
use super::error::LoggerError;
use super::log_level::LogLevel;
use super::logger::Dispatch;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Single-use accumulator for one log record
///
/// # Example
///
/// ```
/// use rust_event_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let logger = Logger::new().with_output(sink.clone());
///
/// logger.info()
///     .str("user", "alice")
///     .int("attempt", 3)
///     .bool("admin", false)
///     .msg("login");
///
/// assert!(sink.contents().contains(r#""user":"alice","attempt":3,"admin":false,"message":"login""#));
/// ```
#[must_use = "an event writes nothing until `msg`, `msgf` or `send` is called"]
pub struct Event {
    inner: Option<ActiveEvent>,
}

struct ActiveEvent {
    buf: Vec<u8>,
    level: LogLevel,
    dispatch: Arc<Dispatch>,
}

impl Event {
    pub(crate) fn new(level: LogLevel, buf: Vec<u8>, dispatch: Arc<Dispatch>) -> Self {
        Self {
            inner: Some(ActiveEvent {
                buf,
                level,
                dispatch,
            }),
        }
    }

    /// The placeholder returned for a disabled level
    #[inline]
    pub(crate) const fn disabled() -> Self {
        Self { inner: None }
    }

    /// Whether this event will produce output
    #[inline]
    pub fn enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Severity of the event, `None` when suppressed
    pub fn level(&self) -> Option<LogLevel> {
        self.inner.as_ref().map(|active| active.level)
    }

    #[inline]
    fn with_buf(mut self, f: impl FnOnce(&mut Vec<u8>)) -> Self {
        if let Some(active) = self.inner.as_mut() {
            f(&mut active.buf);
        }
        self
    }

    /// Add a string field
    pub fn str(self, key: &str, val: &str) -> Self {
        self.with_buf(|buf| encoder::append_str(buf, key, val))
    }

    /// Add a string field from bytes that may not be valid UTF-8
    pub fn bytes_str(self, key: &str, val: &[u8]) -> Self {
        self.with_buf(|buf| encoder::append_bytes_str(buf, key, val))
    }

    /// Add a signed integer field
    pub fn int(self, key: &str, val: i64) -> Self {
        self.with_buf(|buf| encoder::append_int(buf, key, val))
    }

    /// Add an unsigned integer field
    pub fn uint(self, key: &str, val: u64) -> Self {
        self.with_buf(|buf| encoder::append_uint(buf, key, val))
    }

    /// Add a boolean field
    pub fn bool(self, key: &str, val: bool) -> Self {
        self.with_buf(|buf| encoder::append_bool(buf, key, val))
    }

    /// Add a timestamp field
    pub fn time(self, key: &str, val: DateTime<Utc>) -> Self {
        self.with_buf(|buf| encoder::append_time(buf, key, val))
    }

    /// Add an `error` field with the error's display text
    ///
    /// `None` adds nothing, so the result of an operation can be passed
    /// straight through:
    ///
    /// ```
    /// # use rust_event_logger::prelude::*;
    /// # let logger = Logger::new().with_output(MemorySink::new());
    /// let result: std::result::Result<(), std::io::Error> = Ok(());
    /// logger.error().err(result.err()).msg("request finished");
    /// ```
    pub fn err<E: fmt::Display>(self, err: Option<E>) -> Self {
        match err {
            Some(err) if self.enabled() => {
                let text = err.to_string();
                self.with_buf(|buf| encoder::append_str(buf, "error", &text))
            }
            _ => self,
        }
    }

    /// Write the event with a message
    pub fn msg(mut self, message: &str) {
        if let Some(active) = self.inner.take() {
            active.finish(|buf| encoder::append_str(buf, "message", message));
        }
    }

    /// Write the event with a message that may not be valid UTF-8
    pub fn msg_bytes(mut self, message: &[u8]) {
        if let Some(active) = self.inner.take() {
            active.finish(|buf| encoder::append_bytes_str(buf, "message", message));
        }
    }

    /// Write the event with a formatted message
    ///
    /// Nothing is formatted when the event is suppressed.
    pub fn msgf(self, args: fmt::Arguments<'_>) {
        if !self.enabled() {
            return;
        }
        match args.as_str() {
            Some(message) => self.msg(message),
            None => self.msg(&fmt::format(args)),
        }
    }

    /// Write the event with an empty message
    pub fn send(self) {
        self.msg("");
    }
}

impl ActiveEvent {
    /// Append the trailing fields, close the record and fan it out
    ///
    /// The buffers go back to the pool when `self` and `record` drop, whatever
    /// the sinks did.
    fn finish(mut self, append_message: impl FnOnce(&mut Vec<u8>)) {
        append_message(&mut self.buf);
        encoder::append_time(&mut self.buf, "time", Utc::now());
        encoder::append_str(&mut self.buf, "level", self.level.as_str());

        let dispatch = &self.dispatch;
        let mut record = PooledRecord::new(dispatch);
        encoder::close_record_into(&self.buf, &mut record.buf);
        record.buf.push(b'\n');

        dispatch.metrics.record_written();

        for sink in dispatch.sinks.iter() {
            let result = isolate(|| sink.write(&record.buf));
            if let Err(err) = result {
                dispatch.metrics.record_sink_failure();
                dispatch.report(sink.name(), &err);
            }
        }

        if let Some(remote) = dispatch.remote.as_ref() {
            let payload = &record.buf[..record.buf.len() - 1];
            let result = if dispatch.async_remote {
                isolate(|| remote.write_async(payload))
            } else {
                isolate(|| remote.write(payload))
            };
            if let Err(err) = result {
                dispatch.metrics.record_remote_failure();
                dispatch.report(remote.name(), &err);
            }
        }
    }
}

impl Drop for ActiveEvent {
    fn drop(&mut self) {
        self.dispatch.pool.release(std::mem::take(&mut self.buf));
    }
}

/// Output buffer for the closed record, borrowed from the event's pool
struct PooledRecord<'a> {
    buf: Vec<u8>,
    dispatch: &'a Dispatch,
}

impl<'a> PooledRecord<'a> {
    fn new(dispatch: &'a Dispatch) -> Self {
        Self {
            buf: dispatch.pool.acquire(),
            dispatch,
        }
    }
}

impl Drop for PooledRecord<'_> {
    fn drop(&mut self) {
        self.dispatch.pool.release(std::mem::take(&mut self.buf));
    }
}

/// Run one sink call, turning a panic into an error so the remaining sinks
/// still run
fn isolate(f: impl FnOnce() -> super::Result<()>) -> super::Result<()> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            Err(LoggerError::writer(format!("sink panicked: {}", panic_msg)))
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(active) => f
                .debug_struct("Event")
                .field("level", &active.level)
                .field("fields", &String::from_utf8_lossy(&active.buf))
                .finish(),
            None => f.write_str("Event(suppressed)"),
        }
    }
}
