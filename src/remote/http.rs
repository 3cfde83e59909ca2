//! HTTP remote sink
//!
//! Carries the endpoint and header configuration of an HTTP collector. The
//! transport itself is not wired up: records are accepted and counted, which
//! is enough for configuration plumbing and tests.

use crate::core::{LoggerError, RemoteSink, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Construction option for [`HttpRemoteSink`]
///
/// Options are applied in order; a later option overwrites headers set by an
/// earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpOption {
    /// Bearer token sent as `Authorization: Bearer <token>`
    Auth(String),
    /// Extra headers merged into the header set
    Headers(HashMap<String, String>),
}

impl HttpOption {
    pub fn auth(token: impl Into<String>) -> Self {
        HttpOption::Auth(token.into())
    }

    pub fn headers<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        HttpOption::Headers(
            headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Remote sink addressed by an HTTP endpoint
///
/// # Example
///
/// ```
/// use rust_event_logger::{HttpOption, HttpRemoteSink};
///
/// let sink = HttpRemoteSink::new(
///     "https://logs.example.com/ingest",
///     [
///         HttpOption::auth("secret"),
///         HttpOption::headers([("X-Tenant", "acme")]),
///     ],
/// );
///
/// assert_eq!(sink.header("Authorization"), Some("Bearer secret"));
/// assert_eq!(sink.header("X-Tenant"), Some("acme"));
/// ```
#[derive(Debug)]
pub struct HttpRemoteSink {
    endpoint: String,
    headers: HashMap<String, String>,
    sent: AtomicU64,
    closed: AtomicBool,
}

impl HttpRemoteSink {
    pub fn new<I>(endpoint: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = HttpOption>,
    {
        let mut headers = HashMap::new();
        for option in options {
            match option {
                HttpOption::Auth(token) => {
                    headers.insert("Authorization".to_string(), format!("Bearer {}", token));
                }
                HttpOption::Headers(extra) => headers.extend(extra),
            }
        }

        Self {
            endpoint: endpoint.into(),
            headers,
            sent: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Records accepted so far, sync and async combined
    pub fn records_sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn accept(&self) -> Result<()> {
        if self.is_closed() {
            return Err(LoggerError::remote_closed(&self.endpoint));
        }
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl RemoteSink for HttpRemoteSink {
    fn write(&self, _record: &[u8]) -> Result<()> {
        self.accept()
    }

    fn write_async(&self, _record: &[u8]) -> Result<()> {
        self.accept()
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}
