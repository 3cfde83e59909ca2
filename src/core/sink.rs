//! Sink trait for local record destinations

use super::error::Result;
use std::sync::Arc;

/// A byte-stream destination for finished records
///
/// Each call to [`Sink::write`] receives one complete JSON record terminated
/// by `\n`. Methods take `&self`: a sink shared between threads provides its
/// own synchronization, the logger adds none around it.
pub trait Sink: Send + Sync {
    fn write(&self, record: &[u8]) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write(&self, record: &[u8]) -> Result<()> {
        (**self).write(record)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&self, record: &[u8]) -> Result<()> {
        (**self).write(record)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
