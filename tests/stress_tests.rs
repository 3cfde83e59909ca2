//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - Records from many threads never interleave within a line
//! - Derived loggers built concurrently stay isolated
//! - The buffer pool stays bounded under load
//! - Async remote delivery keeps up or reports backpressure

use rust_event_logger::core::{LoggerError, RemoteSink, Result};
use rust_event_logger::prelude::*;
#[cfg(feature = "file")]
use rust_event_logger::sinks::FileSink;
use rust_event_logger::EventPool;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
#[cfg(feature = "file")]
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

fn parse(line: &str) -> Value {
    serde_json::from_str(line).unwrap_or_else(|e| panic!("malformed line {:?}: {}", line, e))
}

/// Every line written by concurrent threads is a complete record
#[test]
fn test_concurrent_lines_are_well_formed() {
    let sink = MemorySink::new();
    let logger = Arc::new(Logger::new().with_output(sink.clone()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger
                        .info()
                        .uint("thread", t as u64)
                        .uint("seq", i as u64)
                        .str("payload", "quote \" backslash \\ newline \n")
                        .msg("stress");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    let lines = sink.lines();
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    let mut seen = HashSet::new();
    for line in &lines {
        let entry = parse(line);
        let key = (entry["thread"].as_u64().unwrap(), entry["seq"].as_u64().unwrap());
        assert!(seen.insert(key), "duplicate record {:?}", key);
    }
    assert_eq!(logger.metrics().records_written(), (THREADS * PER_THREAD) as u64);
}

/// Per-thread order is preserved in a shared file
#[cfg(feature = "file")]
#[test]
fn test_concurrent_file_logging() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("stress.jsonl");
    let logger = Arc::new(Logger::new().with_output(FileSink::new(&path).unwrap()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger
                .with_context()
                .uint("thread", t as u64)
                .logger();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.warn().uint("seq", i as u64).send();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.flush_sinks().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let mut next = vec![0u64; THREADS];
    for line in content.lines() {
        let entry = parse(line);
        let t = entry["thread"].as_u64().unwrap() as usize;
        assert_eq!(entry["seq"].as_u64().unwrap(), next[t]);
        next[t] += 1;
    }
    assert!(next.iter().all(|&n| n == PER_THREAD as u64));
}

/// Context builders started concurrently from one parent never share fields
#[test]
fn test_concurrent_context_builders() {
    let sink = MemorySink::new();
    let parent = Arc::new(
        Logger::new()
            .with_output(sink.clone())
            .with_context()
            .str("app", "stress")
            .logger(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let parent = Arc::clone(&parent);
            thread::spawn(move || {
                for i in 0..50 {
                    let child = parent
                        .with_context()
                        .uint("thread", t as u64)
                        .uint("iteration", i)
                        .logger();
                    child.debug().msg("suppressed");
                    child.info().msg("derived");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for line in sink.lines() {
        assert_eq!(line.matches("\"thread\"").count(), 1);
        assert_eq!(line.matches("\"app\"").count(), 1);
    }
    assert_eq!(parent.context_bytes(), br#""app":"stress","#);
}

/// A pool shared by busy threads keeps reusing and never grows unbounded
#[test]
fn test_pool_bounded_under_load() {
    let pool = Arc::new(EventPool::with_limits(64, 16));
    let logger = Arc::new(
        Logger::builder()
            .sink(MemorySink::new())
            .pool(Arc::clone(&pool))
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info().uint("i", i as u64).msg("pooled");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = pool.stats();
    assert_eq!(stats.acquired, (2 * THREADS * PER_THREAD) as u64);
    assert!(stats.reused > stats.allocated);
    assert!(pool.idle() <= 16);
}

/// Remote sink that rejects everything past a fixed budget
struct BudgetRemote {
    budget: usize,
    accepted: AtomicUsize,
}

impl RemoteSink for BudgetRemote {
    fn write(&self, record: &[u8]) -> Result<()> {
        self.write_async(record)
    }

    fn write_async(&self, _record: &[u8]) -> Result<()> {
        let previous = self.accepted.fetch_add(1, Ordering::SeqCst);
        if previous >= self.budget {
            self.accepted.fetch_sub(1, Ordering::SeqCst);
            return Err(LoggerError::queue_full(self.budget, self.budget));
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Backpressure on the remote sink is counted and never reaches callers
#[test]
fn test_remote_backpressure_is_counted() {
    let remote = Arc::new(BudgetRemote {
        budget: 1_000,
        accepted: AtomicUsize::new(0),
    });
    let local = MemorySink::new();
    let logger = Arc::new(
        Logger::new()
            .with_output(local.clone())
            .with_remote(Arc::clone(&remote))
            .with_async_remote(true),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    logger.error().msg("burst");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total = (THREADS * PER_THREAD) as u64;
    assert_eq!(local.lines().len() as u64, total);
    assert_eq!(remote.accepted.load(Ordering::SeqCst), 1_000);
    assert_eq!(logger.metrics().remote_failures(), total - 1_000);
}
