//! File sink

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends records to a file through a buffered writer
///
/// The file is created if missing and never truncated. Buffered records reach
/// the file on [`Sink::flush`] or when the sink is dropped.
///
/// # Example
///
/// ```no_run
/// use rust_event_logger::prelude::*;
/// use rust_event_logger::sinks::FileSink;
///
/// let sink = FileSink::new("/var/log/app.jsonl").unwrap();
/// let logger = Logger::new().with_output(sink);
/// logger.info().msg("written to file");
/// logger.flush_sinks().unwrap();
/// ```
#[derive(Debug)]
pub struct FileSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("open log file", path.display().to_string(), e)
            })?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write(&self, record: &[u8]) -> Result<()> {
        self.writer.lock().write_all(record)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.writer.get_mut().flush();
    }
}
