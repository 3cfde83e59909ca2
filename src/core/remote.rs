//! Remote sink contract
//!
//! A remote sink delivers records off-process. The logger never looks at the
//! payload; it only chooses between [`RemoteSink::write`] and
//! [`RemoteSink::write_async`] based on the logger's async flag.

use super::error::Result;
use std::sync::Arc;

/// Off-process record destination
///
/// Records are passed without the trailing newline that local sinks receive.
///
/// # Example
///
/// ```
/// use rust_event_logger::core::{RemoteSink, Result};
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct Collector(Mutex<Vec<Vec<u8>>>);
///
/// impl RemoteSink for Collector {
///     fn write(&self, record: &[u8]) -> Result<()> {
///         self.0.lock().unwrap().push(record.to_vec());
///         Ok(())
///     }
///
///     fn write_async(&self, record: &[u8]) -> Result<()> {
///         self.write(record)
///     }
///
///     fn flush(&self) -> Result<()> {
///         Ok(())
///     }
///
///     fn close(&self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait RemoteSink: Send + Sync {
    /// Deliver a record, returning once delivery completed or failed
    fn write(&self, record: &[u8]) -> Result<()>;

    /// Hand a record off for delivery without waiting for it
    fn write_async(&self, record: &[u8]) -> Result<()>;

    /// Push out anything buffered
    fn flush(&self) -> Result<()>;

    /// Release the underlying transport
    fn close(&self) -> Result<()>;

    /// Name passed to the logger's failure callback
    fn name(&self) -> &str {
        "remote"
    }
}

impl<R: RemoteSink + ?Sized> RemoteSink for Arc<R> {
    fn write(&self, record: &[u8]) -> Result<()> {
        (**self).write(record)
    }

    fn write_async(&self, record: &[u8]) -> Result<()> {
        (**self).write_async(record)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
