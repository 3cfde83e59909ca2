//! TCP remote sink
//!
//! Sends newline-delimited records to a collector over a single TCP
//! connection. Synchronous writes go out on the caller's thread; asynchronous
//! writes are queued on a bounded channel and drained by a worker thread.

use crate::core::{LoggerError, RemoteSink, Result};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::Mutex;
use std::io::Write;
use std::net::TcpStream;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default bound on records waiting for the worker
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// How long `flush` and `close` wait for the worker
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const IO_TIMEOUT: Duration = Duration::from_secs(5);

enum Command {
    Record(Vec<u8>),
    Flush(Sender<Result<()>>),
}

/// Connection shared by the caller-side and worker-side write paths
struct Connection {
    address: String,
    stream: Mutex<Option<TcpStream>>,
}

impl Connection {
    fn open(address: &str) -> Result<TcpStream> {
        let stream = TcpStream::connect(address)
            .map_err(|e| LoggerError::io_operation("connect to log collector", address, e))?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    /// Send one record, reconnecting once if the connection is gone or broken
    fn send(&self, record: &[u8]) -> Result<()> {
        let mut guard = self.stream.lock();

        if let Some(stream) = guard.as_mut() {
            match write_line(stream, record) {
                Ok(()) => return Ok(()),
                Err(_) => *guard = None,
            }
        }

        let mut stream = Self::open(&self.address)
            .map_err(|e| LoggerError::remote(&self.address, format!("reconnect failed: {}", e)))?;
        let result = write_line(&mut stream, record)
            .map_err(|e| LoggerError::remote(&self.address, e.to_string()));
        if result.is_ok() {
            *guard = Some(stream);
        }
        result
    }

    fn flush(&self) -> Result<()> {
        if let Some(stream) = self.stream.lock().as_mut() {
            stream.flush()?;
        }
        Ok(())
    }

    fn shutdown(&self) {
        if let Some(stream) = self.stream.lock().take() {
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
    }
}

fn write_line(stream: &mut TcpStream, record: &[u8]) -> std::io::Result<()> {
    stream.write_all(record)?;
    stream.write_all(b"\n")
}

/// Remote sink delivering records to a TCP collector
///
/// # Example
///
/// ```no_run
/// use rust_event_logger::prelude::*;
/// use rust_event_logger::remote::TcpRemoteSink;
///
/// let remote = TcpRemoteSink::connect("127.0.0.1:5170").unwrap();
/// let logger = Logger::new().with_remote(remote).with_async_remote(true);
///
/// logger.info().str("component", "billing").msg("shipped to collector");
/// logger.close().unwrap();
/// ```
pub struct TcpRemoteSink {
    connection: Arc<Connection>,
    sender: Mutex<Option<Sender<Command>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    capacity: usize,
    shutdown_timeout: Duration,
}

impl TcpRemoteSink {
    /// Connect with the default queue capacity and shutdown timeout
    pub fn connect(address: impl Into<String>) -> Result<Self> {
        Self::with_config(address, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT)
    }

    /// Connect with a custom async queue capacity and shutdown timeout
    pub fn with_config(
        address: impl Into<String>,
        capacity: usize,
        shutdown_timeout: Duration,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(LoggerError::config(
                "TcpRemoteSink",
                "queue capacity must be greater than zero",
            ));
        }

        let address = address.into();
        let stream = Connection::open(&address)?;
        let connection = Arc::new(Connection {
            address,
            stream: Mutex::new(Some(stream)),
        });

        let (sender, receiver) = bounded::<Command>(capacity);
        let worker_connection = Arc::clone(&connection);
        let handle = thread::Builder::new()
            .name("event-logger-tcp".to_string())
            .spawn(move || {
                // Exits once every sender is gone and the queue is drained
                for command in receiver {
                    match command {
                        Command::Record(record) => {
                            if let Err(e) = worker_connection.send(&record) {
                                eprintln!("[LOGGER ERROR] Async remote delivery failed: {}", e);
                            }
                        }
                        Command::Flush(ack) => {
                            let _ = ack.send(worker_connection.flush());
                        }
                    }
                }
            })
            .map_err(|e| LoggerError::io_operation("spawn remote worker", "tcp", e))?;

        Ok(Self {
            connection,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(handle)),
            capacity,
            shutdown_timeout,
        })
    }

    pub fn address(&self) -> &str {
        &self.connection.address
    }

    /// Records waiting for the worker
    pub fn queued(&self) -> usize {
        self.sender.lock().as_ref().map_or(0, Sender::len)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    fn closed_error(&self) -> LoggerError {
        LoggerError::remote_closed(self.address())
    }

    /// Join the worker, giving up after the shutdown timeout
    fn join_worker(&self) -> Result<()> {
        let Some(handle) = self.worker.lock().take() else {
            return Ok(());
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                return handle.join().map_err(|_| {
                    eprintln!("[LOGGER ERROR] Remote worker thread panicked during shutdown");
                    LoggerError::remote(self.address(), "worker thread panicked")
                });
            }

            if start.elapsed() >= self.shutdown_timeout {
                eprintln!(
                    "[LOGGER WARNING] Remote worker did not finish within {:?}. \
                     Some records may be lost.",
                    self.shutdown_timeout
                );
                return Err(LoggerError::remote(
                    self.address(),
                    "timed out waiting for queued records",
                ));
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl RemoteSink for TcpRemoteSink {
    fn write(&self, record: &[u8]) -> Result<()> {
        if self.is_closed() {
            return Err(self.closed_error());
        }
        self.connection.send(record)
    }

    fn write_async(&self, record: &[u8]) -> Result<()> {
        let sender = self.sender.lock();
        let Some(sender) = sender.as_ref() else {
            return Err(self.closed_error());
        };

        match sender.try_send(Command::Record(record.to_vec())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(LoggerError::queue_full(sender.len(), self.capacity)),
            Err(TrySendError::Disconnected(_)) => Err(self.closed_error()),
        }
    }

    /// Wait for queued records to be written, then flush the stream
    fn flush(&self) -> Result<()> {
        let sender = self.sender.lock().clone();
        let Some(sender) = sender else {
            return Err(self.closed_error());
        };

        let (ack_tx, ack_rx) = bounded(1);
        sender
            .send_timeout(Command::Flush(ack_tx), self.shutdown_timeout)
            .map_err(|_| LoggerError::remote(self.address(), "flush request not accepted"))?;

        ack_rx
            .recv_timeout(self.shutdown_timeout)
            .map_err(|_| LoggerError::remote(self.address(), "timed out waiting for flush"))?
    }

    fn close(&self) -> Result<()> {
        // Dropping the last sender lets the worker drain and exit
        drop(self.sender.lock().take());
        let joined = self.join_worker();
        let flushed = self.connection.flush();
        self.connection.shutdown();
        joined.and(flushed)
    }

    fn name(&self) -> &str {
        "tcp"
    }
}

impl Drop for TcpRemoteSink {
    fn drop(&mut self) {
        if !self.is_closed() {
            let _ = self.close();
        }
    }
}
