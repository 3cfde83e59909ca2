//! Event buffer pool
//!
//! Every enabled log call needs a byte buffer to serialize into. The pool keeps
//! released buffers around so that steady-state logging does not allocate.
//!
//! Two bounds keep the pool from holding on to memory it should not:
//! - buffers whose capacity grew past [`MAX_POOLED_CAPACITY`] are dropped on
//!   release, so one pathological record does not pin a large allocation;
//! - at most `max_idle` buffers are kept, so a burst of concurrent logging does
//!   not leave thousands of idle buffers behind.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Buffers with a larger capacity are never returned to the pool
pub const MAX_POOLED_CAPACITY: usize = 1 << 16;

/// Initial capacity of a freshly allocated event buffer
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Default bound on the number of idle buffers kept by a pool
pub const DEFAULT_MAX_IDLE: usize = 1024;

static GLOBAL_POOL: OnceLock<Arc<EventPool>> = OnceLock::new();

/// Point-in-time copy of a pool's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total `acquire` calls
    pub acquired: u64,
    /// Acquires served from the free-list
    pub reused: u64,
    /// Acquires that had to allocate
    pub allocated: u64,
    /// Buffers kept by `release`
    pub released: u64,
    /// Buffers dropped because they exceeded [`MAX_POOLED_CAPACITY`]
    pub discarded_oversized: u64,
    /// Buffers dropped because the pool already held `max_idle` buffers
    pub discarded_full: u64,
}

#[derive(Debug)]
struct PoolCounters {
    acquired: AtomicU64,
    reused: AtomicU64,
    allocated: AtomicU64,
    released: AtomicU64,
    discarded_oversized: AtomicU64,
    discarded_full: AtomicU64,
}

impl PoolCounters {
    const fn new() -> Self {
        Self {
            acquired: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            allocated: AtomicU64::new(0),
            released: AtomicU64::new(0),
            discarded_oversized: AtomicU64::new(0),
            discarded_full: AtomicU64::new(0),
        }
    }

    #[inline]
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Concurrency-safe free-list of event buffers
///
/// # Example
///
/// ```
/// use rust_event_logger::EventPool;
///
/// let pool = EventPool::new();
/// let mut buf = pool.acquire();
/// buf.extend_from_slice(br#""k":"v","#);
/// pool.release(buf);
///
/// let reused = pool.acquire();
/// assert!(reused.is_empty());
/// assert_eq!(pool.stats().reused, 1);
/// ```
#[derive(Debug)]
pub struct EventPool {
    free: Mutex<Vec<Vec<u8>>>,
    initial_capacity: usize,
    max_idle: usize,
    counters: PoolCounters,
}

impl EventPool {
    /// Create a pool with the default buffer capacity and idle bound
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_EVENT_CAPACITY, DEFAULT_MAX_IDLE)
    }

    /// Create a pool with a custom initial buffer capacity and idle bound
    ///
    /// `initial_capacity` is clamped to [`MAX_POOLED_CAPACITY`] so that fresh
    /// buffers are always poolable.
    pub fn with_limits(initial_capacity: usize, max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            initial_capacity: initial_capacity.min(MAX_POOLED_CAPACITY),
            max_idle,
            counters: PoolCounters::new(),
        }
    }

    /// The process-wide pool used by loggers that were not given their own
    pub fn global() -> Arc<EventPool> {
        Arc::clone(GLOBAL_POOL.get_or_init(|| Arc::new(EventPool::new())))
    }

    /// Take an empty buffer from the pool, allocating one if none is idle
    pub fn acquire(&self) -> Vec<u8> {
        PoolCounters::bump(&self.counters.acquired);

        let reused = self.free.lock().pop();
        match reused {
            Some(buf) => {
                PoolCounters::bump(&self.counters.reused);
                buf
            }
            None => {
                PoolCounters::bump(&self.counters.allocated);
                Vec::with_capacity(self.initial_capacity)
            }
        }
    }

    /// Return a buffer to the pool
    ///
    /// The buffer is cleared but keeps its capacity. Oversized buffers, and
    /// buffers arriving while the pool is full, are dropped instead.
    pub fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_POOLED_CAPACITY {
            PoolCounters::bump(&self.counters.discarded_oversized);
            return;
        }
        buf.clear();

        let mut free = self.free.lock();
        if free.len() >= self.max_idle {
            drop(free);
            PoolCounters::bump(&self.counters.discarded_full);
            return;
        }
        free.push(buf);
        drop(free);
        PoolCounters::bump(&self.counters.released);
    }

    /// Number of idle buffers currently held
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    /// Snapshot of the pool counters
    pub fn stats(&self) -> PoolStats {
        let c = &self.counters;
        PoolStats {
            acquired: c.acquired.load(Ordering::Relaxed),
            reused: c.reused.load(Ordering::Relaxed),
            allocated: c.allocated.load(Ordering::Relaxed),
            released: c.released.load(Ordering::Relaxed),
            discarded_oversized: c.discarded_oversized.load(Ordering::Relaxed),
            discarded_full: c.discarded_full.load(Ordering::Relaxed),
        }
    }
}

impl Default for EventPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_fresh_buffer_has_initial_capacity() {
        let pool = EventPool::new();
        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= DEFAULT_EVENT_CAPACITY);
        assert_eq!(pool.stats().allocated, 1);
    }

    #[test]
    fn test_release_clears_and_keeps_capacity() {
        let pool = EventPool::new();
        let mut buf = pool.acquire();
        buf.extend_from_slice(&[b'x'; 500]);
        let capacity = buf.capacity();
        pool.release(buf);

        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), capacity);
        assert_eq!(pool.stats().reused, 1);
    }

    #[test]
    fn test_oversized_buffer_is_dropped() {
        let pool = EventPool::new();
        let buf: Vec<u8> = Vec::with_capacity(1 << 17);
        pool.release(buf);

        assert_eq!(pool.idle(), 0);
        assert_eq!(pool.stats().discarded_oversized, 1);

        let buf = pool.acquire();
        assert!(buf.capacity() <= MAX_POOLED_CAPACITY);
    }

    #[test]
    fn test_buffer_at_ceiling_is_kept() {
        let pool = EventPool::new();
        pool.release(Vec::with_capacity(MAX_POOLED_CAPACITY));
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_max_idle_bound() {
        let pool = EventPool::with_limits(16, 2);
        for _ in 0..5 {
            pool.release(Vec::with_capacity(16));
        }
        assert_eq!(pool.idle(), 2);
        assert_eq!(pool.stats().discarded_full, 3);
    }

    #[test]
    fn test_initial_capacity_clamped() {
        let pool = EventPool::with_limits(MAX_POOLED_CAPACITY * 4, 8);
        let buf = pool.acquire();
        pool.release(buf);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_global_pool_is_shared() {
        let a = EventPool::global();
        let b = EventPool::global();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_concurrent_acquire_release_never_shares_buffers() {
        let pool = Arc::new(EventPool::with_limits(64, 64));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for i in 0..1_000 {
                        let mut buf = pool.acquire();
                        assert!(buf.is_empty(), "acquired a dirty buffer");
                        let marker = format!("{}-{}", t, i);
                        buf.extend_from_slice(marker.as_bytes());
                        thread::yield_now();
                        assert_eq!(buf, marker.as_bytes(), "buffer shared between acquirers");
                        pool.release(buf);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = pool.stats();
        assert_eq!(stats.acquired, 8_000);
        assert_eq!(stats.reused + stats.allocated, 8_000);
        assert!(pool.idle() <= 64);
    }

    #[test]
    fn test_idle_buffers_are_distinct_allocations() {
        let pool = EventPool::new();
        let bufs: Vec<Vec<u8>> = (0..4).map(|_| pool.acquire()).collect();
        let ptrs: HashSet<*const u8> = bufs.iter().map(|b| b.as_ptr()).collect();
        assert_eq!(ptrs.len(), 4);
        for buf in bufs {
            pool.release(buf);
        }
        assert_eq!(pool.idle(), 4);
    }
}
