//! Standard output and standard error sinks

use crate::core::{Result, Sink};
use std::io::{self, Write};

/// Writes records to the process's standard output
///
/// Each record is written under the stdout lock, so lines from concurrent
/// events never interleave.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StdoutSink {
    fn write(&self, record: &[u8]) -> Result<()> {
        io::stdout().lock().write_all(record)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

/// Writes records to the process's standard error
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl StderrSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StderrSink {
    fn write(&self, record: &[u8]) -> Result<()> {
        io::stderr().lock().write_all(record)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stderr"
    }
}
