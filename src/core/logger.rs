//! Main logger implementation
//!
//! A [`Logger`] is configured once and then only read. Every configuration
//! method returns a new, fully independent logger, so a logger handed to
//! another thread or component can never change underneath it.

use super::{
    context::ContextBuilder,
    error::{LoggerError, Result},
    event::Event,
    event_pool::EventPool,
    log_level::{LogLevel, LEVEL_COUNT},
    metrics::LoggerMetrics,
    remote::RemoteSink,
    sink::Sink,
};
use crate::remote::{HttpOption, HttpRemoteSink};
use crate::sinks::StdoutSink;
use parking_lot::RwLock;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Callback invoked with the sink name and error when a write fails
///
/// Failures never reach the code that logged the record; this is the hook for
/// making them visible.
pub type SinkErrorCallback = Arc<dyn Fn(&str, &LoggerError) + Send + Sync>;

/// Everything an event needs to deliver itself
///
/// Shared read-only between the logger and its in-flight events.
#[derive(Clone)]
pub(crate) struct Dispatch {
    pub(crate) sinks: Arc<[Arc<dyn Sink>]>,
    pub(crate) remote: Option<Arc<dyn RemoteSink>>,
    pub(crate) async_remote: bool,
    pub(crate) pool: Arc<EventPool>,
    pub(crate) metrics: Arc<LoggerMetrics>,
    pub(crate) on_error: Option<SinkErrorCallback>,
}

impl Dispatch {
    /// Hand a failure to the error callback, if any
    ///
    /// A panicking callback is contained here so the remaining sinks and the
    /// remote still receive the record.
    pub(crate) fn report(&self, sink_name: &str, err: &LoggerError) {
        if let Some(callback) = self.on_error.as_ref() {
            let _ = panic::catch_unwind(AssertUnwindSafe(|| callback(sink_name, err)));
        }
    }

    /// Copy with a freshly allocated sink list
    fn deep_clone(&self) -> Self {
        Self {
            sinks: self.sinks.iter().cloned().collect(),
            ..self.clone()
        }
    }
}

/// Immutable JSON event logger: a minimum level, pre-serialized context and
/// the sinks every record is written to
pub struct Logger {
    level: LogLevel,
    enabled: [bool; LEVEL_COUNT],
    context: Vec<u8>,
    /// Replaced wholesale by `set_output`; events clone the `Arc` they see.
    /// Clones get their own lock, adapters made by `share_output` do not.
    dispatch: Arc<RwLock<Arc<Dispatch>>>,
}

impl Logger {
    /// Create a logger writing `info` and above to standard output
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    fn from_parts(level: LogLevel, context: Vec<u8>, dispatch: Dispatch) -> Self {
        let mut logger = Self {
            level,
            enabled: [false; LEVEL_COUNT],
            context,
            dispatch: Arc::new(RwLock::new(Arc::new(dispatch))),
        };
        logger.update_enabled_levels();
        logger
    }

    fn update_enabled_levels(&mut self) {
        for level in LogLevel::ALL {
            self.enabled[level.index()] = level >= self.level;
        }
    }

    /// Edit the dispatch of a logger nobody else has seen yet
    fn update_dispatch(&mut self, edit: impl FnOnce(&mut Dispatch)) {
        let mut guard = self.dispatch.write();
        edit(Arc::make_mut(&mut *guard));
    }

    /// Handle with this logger's level and context that follows its
    /// `set_output` redirects
    pub(crate) fn share_output(&self) -> Self {
        Self {
            level: self.level,
            enabled: self.enabled,
            context: self.context.clone(),
            dispatch: Arc::clone(&self.dispatch),
        }
    }

    pub(crate) fn context_mut(&mut self) -> &mut Vec<u8> {
        &mut self.context
    }

    fn dispatch(&self) -> Arc<Dispatch> {
        Arc::clone(&self.dispatch.read())
    }

    /// Copy of this logger with a different minimum level
    #[must_use]
    pub fn with_level(&self, level: LogLevel) -> Self {
        let mut logger = self.clone();
        logger.level = level;
        logger.update_enabled_levels();
        logger
    }

    /// Copy of this logger writing to `sink` only
    #[must_use]
    pub fn with_output<S: Sink + 'static>(&self, sink: S) -> Self {
        self.with_outputs([Arc::new(sink) as Arc<dyn Sink>])
    }

    /// Copy of this logger writing to `sinks`, in order
    #[must_use]
    pub fn with_outputs<I>(&self, sinks: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Sink>>,
    {
        let mut logger = self.clone();
        logger.update_dispatch(|dispatch| dispatch.sinks = sinks.into_iter().collect());
        logger
    }

    /// Copy of this logger that also delivers to `remote`
    #[must_use]
    pub fn with_remote<R: RemoteSink + 'static>(&self, remote: R) -> Self {
        let mut logger = self.clone();
        logger.update_dispatch(|dispatch| dispatch.remote = Some(Arc::new(remote)));
        logger
    }

    /// Copy of this logger delivering to an HTTP endpoint
    ///
    /// ```
    /// use rust_event_logger::{HttpOption, Logger};
    ///
    /// let logger = Logger::new().with_remote_http(
    ///     "https://logs.example.com/ingest",
    ///     [HttpOption::auth("secret-token")],
    /// );
    /// ```
    #[must_use]
    pub fn with_remote_http<I>(&self, endpoint: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = HttpOption>,
    {
        self.with_remote(HttpRemoteSink::new(endpoint, options))
    }

    /// Copy of this logger with remote delivery switched between
    /// `write` (false) and `write_async` (true)
    #[must_use]
    pub fn with_async_remote(&self, async_remote: bool) -> Self {
        let mut logger = self.clone();
        logger.update_dispatch(|dispatch| dispatch.async_remote = async_remote);
        logger
    }

    /// Copy of this logger drawing event buffers from `pool`
    #[must_use]
    pub fn with_pool(&self, pool: Arc<EventPool>) -> Self {
        let mut logger = self.clone();
        logger.update_dispatch(|dispatch| dispatch.pool = pool);
        logger
    }

    /// Copy of this logger that reports sink and remote failures to `callback`
    #[must_use]
    pub fn on_sink_error(&self, callback: SinkErrorCallback) -> Self {
        let mut logger = self.clone();
        logger.update_dispatch(|dispatch| dispatch.on_error = Some(callback));
        logger
    }

    /// Start deriving a logger with additional context fields
    ///
    /// ```
    /// use rust_event_logger::prelude::*;
    ///
    /// let sink = MemorySink::new();
    /// let root = Logger::new().with_output(sink.clone());
    /// let service = root.with_context().str("service", "api").logger();
    ///
    /// service.info().msg("ready");
    /// root.info().msg("plain");
    ///
    /// let lines = sink.lines();
    /// assert!(lines[0].contains(r#""service":"api""#));
    /// assert!(!lines[1].contains("service"));
    /// ```
    pub fn with_context(&self) -> ContextBuilder {
        ContextBuilder::new(self)
    }

    /// Replace the sinks of this logger in place
    ///
    /// Prefer [`Logger::with_output`]. This exists for code that holds a shared
    /// logger and must redirect it; events already created keep writing to the
    /// sinks they started with.
    pub fn set_output<S: Sink + 'static>(&self, sink: S) {
        let mut guard = self.dispatch.write();
        let mut dispatch = (**guard).clone();
        dispatch.sinks = Arc::from(vec![Arc::new(sink) as Arc<dyn Sink>]);
        *guard = Arc::new(dispatch);
    }

    /// Minimum level this logger writes
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether an event at `level` would be written
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.enabled[level.index()]
    }

    /// Pre-serialized context fragments
    pub fn context_bytes(&self) -> &[u8] {
        &self.context
    }

    /// Whether records are handed to the remote sink with `write_async`
    pub fn is_async_remote(&self) -> bool {
        self.dispatch.read().async_remote
    }

    /// Whether a remote sink is attached
    pub fn has_remote(&self) -> bool {
        self.dispatch.read().remote.is_some()
    }

    /// Names of the local sinks, in write order
    pub fn sink_names(&self) -> Vec<String> {
        self.dispatch
            .read()
            .sinks
            .iter()
            .map(|sink| sink.name().to_string())
            .collect()
    }

    /// Write and failure counters shared with every logger derived from this one
    pub fn metrics(&self) -> Arc<LoggerMetrics> {
        Arc::clone(&self.dispatch.read().metrics)
    }

    /// Begin an event at `level`
    ///
    /// A disabled level returns an empty handle without touching the pool.
    #[inline]
    pub fn new_event(&self, level: LogLevel) -> Event {
        if !self.enabled[level.index()] {
            return Event::disabled();
        }

        let dispatch = self.dispatch();
        let mut buf = dispatch.pool.acquire();
        buf.extend_from_slice(&self.context);
        Event::new(level, buf, dispatch)
    }

    /// Begin a `trace` event
    #[inline]
    pub fn trace(&self) -> Event {
        self.new_event(LogLevel::Trace)
    }

    /// Begin a `debug` event
    #[inline]
    pub fn debug(&self) -> Event {
        self.new_event(LogLevel::Debug)
    }

    /// Begin an `info` event
    #[inline]
    pub fn info(&self) -> Event {
        self.new_event(LogLevel::Info)
    }

    /// Begin a `warn` event
    #[inline]
    pub fn warn(&self) -> Event {
        self.new_event(LogLevel::Warn)
    }

    /// Begin an `error` event
    #[inline]
    pub fn error(&self) -> Event {
        self.new_event(LogLevel::Error)
    }

    /// Begin a `fatal` event. Writing it does not terminate the process.
    #[inline]
    pub fn fatal(&self) -> Event {
        self.new_event(LogLevel::Fatal)
    }

    /// Write a message with no extra fields
    pub fn log(&self, level: LogLevel, message: &str) {
        self.new_event(level).msg(message);
    }

    /// Flush the remote sink, if any
    pub fn flush(&self) -> Result<()> {
        match self.dispatch().remote.as_ref() {
            Some(remote) => remote.flush(),
            None => Ok(()),
        }
    }

    /// Flush every local sink, stopping at the first failure
    pub fn flush_sinks(&self) -> Result<()> {
        let dispatch = self.dispatch();
        for sink in dispatch.sinks.iter() {
            sink.flush()?;
        }
        Ok(())
    }

    /// Close the remote sink, if any
    pub fn close(&self) -> Result<()> {
        match self.dispatch().remote.as_ref() {
            Some(remote) => remote.close(),
            None => Ok(()),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_event_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .sink(MemorySink::new())
    ///     .build();
    /// assert!(logger.enabled(LogLevel::Debug));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Clone for Logger {
    /// Independent copy: the sink list and context bytes are reallocated,
    /// sinks, remote, pool and metrics are shared
    fn clone(&self) -> Self {
        let dispatch = self.dispatch.read().deep_clone();
        Self {
            level: self.level,
            enabled: self.enabled,
            context: self.context.clone(),
            dispatch: Arc::new(RwLock::new(Arc::new(dispatch))),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("context", &String::from_utf8_lossy(&self.context))
            .field("sinks", &self.sink_names())
            .field("remote", &self.has_remote())
            .field("async_remote", &self.is_async_remote())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_event_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Warn)
///     .sink(StderrSink::new())
///     .on_sink_error(Arc::new(|sink, err| {
///         eprintln!("ALERT: sink {} failed: {}", sink, err);
///     }))
///     .build();
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    sinks: Option<Vec<Arc<dyn Sink>>>,
    remote: Option<Arc<dyn RemoteSink>>,
    async_remote: bool,
    pool: Option<Arc<EventPool>>,
    on_error: Option<SinkErrorCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            sinks: None,
            remote: None,
            async_remote: false,
            pool: None,
            on_error: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Add a sink
    ///
    /// If no sink is added, the logger writes to standard output.
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks
            .get_or_insert_with(Vec::new)
            .push(Arc::new(sink));
        self
    }

    /// Build a logger with no local sinks at all
    #[must_use = "builder methods return a new value"]
    pub fn without_sinks(mut self) -> Self {
        self.sinks = Some(Vec::new());
        self
    }

    /// Attach a remote sink
    #[must_use = "builder methods return a new value"]
    pub fn remote<R: RemoteSink + 'static>(mut self, remote: R) -> Self {
        self.remote = Some(Arc::new(remote));
        self
    }

    /// Deliver remote records with `write_async`
    #[must_use = "builder methods return a new value"]
    pub fn async_remote(mut self, async_remote: bool) -> Self {
        self.async_remote = async_remote;
        self
    }

    /// Use a dedicated event pool instead of the global one
    #[must_use = "builder methods return a new value"]
    pub fn pool(mut self, pool: Arc<EventPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Set a callback for sink and remote failures
    #[must_use = "builder methods return a new value"]
    pub fn on_sink_error(mut self, callback: SinkErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let sinks: Arc<[Arc<dyn Sink>]> = match self.sinks {
            Some(sinks) => sinks.into(),
            None => Arc::from(vec![Arc::new(StdoutSink::new()) as Arc<dyn Sink>]),
        };

        let dispatch = Dispatch {
            sinks,
            remote: self.remote,
            async_remote: self.async_remote,
            pool: self.pool.unwrap_or_else(EventPool::global),
            metrics: Arc::new(LoggerMetrics::new()),
            on_error: self.on_error,
        };

        Logger::from_parts(self.min_level, Vec::new(), dispatch)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
