//! Declarative logger configuration
//!
//! A [`LoggerConfig`] describes a root logger as data, so it can live in a
//! JSON file next to the rest of an application's settings.
//!
//! ```json
//! {
//!   "level": "debug",
//!   "output": "file:/var/log/app.jsonl",
//!   "async_remote": true,
//!   "http_remote": {
//!     "endpoint": "https://logs.example.com/ingest",
//!     "token": "secret",
//!     "headers": { "X-Tenant": "acme" }
//!   },
//!   "context": { "service": "billing", "shard": 3 }
//! }
//! ```

use crate::core::{LogLevel, Logger, LoggerError, Result, Sink};
use crate::remote::{HttpOption, HttpRemoteSink};
use crate::sinks::{StderrSink, StdoutSink};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Where local records go
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
    /// Append to a file, written as `file:<path>`
    File(PathBuf),
    /// No local sink; records only reach the remote sink, if any
    None,
}

impl FromStr for OutputTarget {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stdout" => Ok(OutputTarget::Stdout),
            "stderr" => Ok(OutputTarget::Stderr),
            "none" => Ok(OutputTarget::None),
            _ => match s.strip_prefix("file:") {
                Some(path) if !path.is_empty() => Ok(OutputTarget::File(PathBuf::from(path))),
                _ => Err(LoggerError::config(
                    "output",
                    format!(
                        "expected stdout, stderr, none or file:<path>, got '{}'",
                        s
                    ),
                )),
            },
        }
    }
}

impl TryFrom<String> for OutputTarget {
    type Error = LoggerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Stdout => f.write_str("stdout"),
            OutputTarget::Stderr => f.write_str("stderr"),
            OutputTarget::File(path) => write!(f, "file:{}", path.display()),
            OutputTarget::None => f.write_str("none"),
        }
    }
}

/// HTTP collector settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HttpRemoteConfig {
    pub endpoint: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Value of a configured context field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Str(String),
}

/// Root logger description
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Minimum severity. Default: info
    pub level: LogLevel,

    /// Local output. Default: stdout
    pub output: OutputTarget,

    /// Deliver to the remote sink with `write_async`. Default: false
    pub async_remote: bool,

    /// Optional HTTP remote sink
    pub http_remote: Option<HttpRemoteConfig>,

    /// Context fields carried by every record, in key order
    pub context: BTreeMap<String, ContextValue>,
}

impl LoggerConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the described logger
    ///
    /// Fails if the output file cannot be opened or the remote endpoint is
    /// empty.
    pub fn build(&self) -> Result<Logger> {
        let mut builder = Logger::builder()
            .min_level(self.level)
            .async_remote(self.async_remote);

        builder = match self.local_sink()? {
            Some(sink) => builder.sink(sink),
            None => builder.without_sinks(),
        };

        if let Some(http) = &self.http_remote {
            if http.endpoint.trim().is_empty() {
                return Err(LoggerError::config("http_remote", "endpoint must not be empty"));
            }
            let mut options = Vec::with_capacity(2);
            if let Some(token) = &http.token {
                options.push(HttpOption::auth(token.as_str()));
            }
            if !http.headers.is_empty() {
                options.push(HttpOption::Headers(http.headers.clone()));
            }
            builder = builder.remote(HttpRemoteSink::new(http.endpoint.as_str(), options));
        }

        let logger = builder.build();
        if self.context.is_empty() {
            return Ok(logger);
        }

        let context = self
            .context
            .iter()
            .fold(logger.with_context(), |ctx, (key, value)| match value {
                ContextValue::Bool(v) => ctx.bool(key, *v),
                ContextValue::Int(v) => ctx.int(key, *v),
                ContextValue::Uint(v) => ctx.uint(key, *v),
                ContextValue::Str(v) => ctx.str(key, v),
            });
        Ok(context.logger())
    }

    fn local_sink(&self) -> Result<Option<Arc<dyn Sink>>> {
        let sink: Arc<dyn Sink> = match &self.output {
            OutputTarget::Stdout => Arc::new(StdoutSink),
            OutputTarget::Stderr => Arc::new(StderrSink),
            OutputTarget::None => return Ok(None),
            #[cfg(feature = "file")]
            OutputTarget::File(path) => Arc::new(crate::sinks::FileSink::new(path.clone())?),
            #[cfg(not(feature = "file"))]
            OutputTarget::File(_) => {
                return Err(LoggerError::config(
                    "output",
                    "file output requires the `file` feature",
                ))
            }
        };
        Ok(Some(sink))
    }
}
