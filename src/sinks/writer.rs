//! Sink over any `std::io::Write` implementation

use crate::core::{Result, Sink};
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;

/// Adapts an arbitrary writer into a [`Sink`]
///
/// Writes are serialized by an internal mutex, so the wrapped writer does not
/// need to be thread-safe itself.
///
/// # Example
///
/// ```
/// use rust_event_logger::prelude::*;
/// use rust_event_logger::sinks::WriterSink;
///
/// let sink = WriterSink::with_name(Vec::new(), "buffer");
/// sink.write(b"{}\n").unwrap();
/// assert_eq!(sink.into_inner(), b"{}\n");
/// ```
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
    name: String,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_name(writer, "writer")
    }

    pub fn with_name(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(writer),
            name: name.into(),
        }
    }

    /// Consume the sink and return the wrapped writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&self, record: &[u8]) -> Result<()> {
        self.writer.lock().write_all(record)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<W: Write + Send> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_writer_sink_collects_records() {
        let sink = WriterSink::new(Vec::new());
        sink.write(b"one\n").unwrap();
        sink.write(b"two\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.name(), "writer");
        assert_eq!(sink.into_inner(), b"one\ntwo\n");
    }

    #[test]
    fn test_writer_errors_propagate() {
        let sink = WriterSink::with_name(BrokenPipe, "pipe");
        assert!(sink.write(b"x\n").is_err());
        assert!(sink.flush().is_err());
        assert_eq!(format!("{:?}", sink), "WriterSink { name: \"pipe\" }");
    }
}
