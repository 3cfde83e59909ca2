//! Property-based tests for rust_event_logger using proptest

use proptest::prelude::*;
use rust_event_logger::core::encoder;
use rust_event_logger::core::event_pool::MAX_POOLED_CAPACITY;
use rust_event_logger::prelude::*;
use rust_event_logger::EventPool;
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

/// Strings biased toward the characters that need escaping
fn tricky_string() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[\\x00-\\x1f\"\\\\/a-z ]{0,32}",
        "[\u{80}-\u{10ffff}]{0,16}",
        Just(String::new()),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Canonical names parse back to the same level
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.as_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
        prop_assert_eq!(level.to_string(), level.as_str());
    }

    /// Parsing ignores case
    #[test]
    fn test_log_level_case_insensitive(level in any_level(), upper in any::<bool>()) {
        let name = if upper {
            level.as_str().to_uppercase()
        } else {
            level.as_str().to_string()
        };
        prop_assert_eq!(name.parse::<LogLevel>().unwrap(), level);
    }

    /// Ordering matches discriminants
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
        prop_assert_eq!(a > b, (a as u8) > (b as u8));
    }
}

// ============================================================================
// Encoder Tests
// ============================================================================

proptest! {
    /// Any string survives encoding and JSON decoding unchanged
    #[test]
    fn test_string_escaping_roundtrip(value in tricky_string()) {
        let mut buf = Vec::new();
        encoder::append_str(&mut buf, "v", &value);
        let record = encoder::close_record(&buf);

        let parsed: serde_json::Value = serde_json::from_slice(&record).unwrap();
        prop_assert_eq!(parsed["v"].as_str().unwrap(), value.as_str());
    }

    /// Arbitrary bytes always yield valid JSON; valid UTF-8 is preserved
    #[test]
    fn test_bytes_always_valid_json(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut buf = Vec::new();
        encoder::append_bytes_str(&mut buf, "raw", &bytes);
        let record = encoder::close_record(&buf);

        let parsed: serde_json::Value = serde_json::from_slice(&record).unwrap();
        if let Ok(text) = std::str::from_utf8(&bytes) {
            prop_assert_eq!(parsed["raw"].as_str().unwrap(), text);
        }
    }

    /// Numbers and booleans decode to the same values
    #[test]
    fn test_scalar_fields_roundtrip(i in any::<i64>(), u in any::<u64>(), b in any::<bool>()) {
        let mut buf = Vec::new();
        encoder::append_int(&mut buf, "i", i);
        encoder::append_uint(&mut buf, "u", u);
        encoder::append_bool(&mut buf, "b", b);
        let record = encoder::close_record(&buf);

        let parsed: serde_json::Value = serde_json::from_slice(&record).unwrap();
        prop_assert_eq!(parsed["i"].as_i64(), Some(i));
        prop_assert_eq!(parsed["u"].as_u64(), Some(u));
        prop_assert_eq!(parsed["b"].as_bool(), Some(b));
    }

    /// Closing strips exactly one trailing separator
    #[test]
    fn test_close_record_strips_one_separator(n in 0usize..8) {
        let mut buf = Vec::new();
        for i in 0..n {
            encoder::append_uint(&mut buf, "k", i as u64);
        }
        let record = encoder::close_record(&buf);

        prop_assert_eq!(record.first(), Some(&b'{'));
        prop_assert_eq!(record.last(), Some(&b'}'));
        if n > 0 {
            prop_assert_ne!(record[record.len() - 2], b',');
        } else {
            prop_assert_eq!(record.as_slice(), b"{}");
        }
    }
}

// ============================================================================
// Logger Tests
// ============================================================================

proptest! {
    /// An event produces output exactly when its level reaches the minimum
    #[test]
    fn test_level_gating(min in any_level(), level in any_level()) {
        let sink = MemorySink::new();
        let pool = Arc::new(EventPool::new());
        let logger = Logger::builder()
            .min_level(min)
            .sink(sink.clone())
            .pool(Arc::clone(&pool))
            .build();

        logger.new_event(level).str("k", "v").msg("gated");

        if level >= min {
            prop_assert_eq!(sink.lines().len(), 1);
        } else {
            prop_assert!(sink.is_empty());
            prop_assert_eq!(pool.stats().acquired, 0);
        }
    }

    /// Fields set on a derived logger never show up on its parent
    #[test]
    fn test_context_isolation(key in "[a-z]{1,12}", value in tricky_string()) {
        let sink = MemorySink::new();
        let parent = Logger::new().with_output(sink.clone());
        let child = parent.with_context().str(&key, &value).logger();

        parent.info().msg("parent");
        child.info().msg("child");
        parent.info().msg("parent again");

        let lines = sink.lines();
        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        let third: serde_json::Value = serde_json::from_str(&lines[2]).unwrap();

        // Keys that collide with the trailing fields are overwritten by them
        if !["message", "time", "level"].contains(&key.as_str()) {
            prop_assert_eq!(second[&key].as_str(), Some(value.as_str()));
            prop_assert!(first.get(&key).is_none());
            prop_assert!(third.get(&key).is_none());
        }
    }
}

// ============================================================================
// Pool Tests
// ============================================================================

proptest! {
    /// Acquired buffers never exceed the pooling ceiling, whatever was released
    #[test]
    fn test_pool_capacity_bound(capacities in proptest::collection::vec(0usize..(1 << 18), 1..16)) {
        let pool = EventPool::new();
        for capacity in capacities {
            pool.release(Vec::with_capacity(capacity));
            let buf = pool.acquire();
            prop_assert!(buf.is_empty());
            prop_assert!(buf.capacity() <= MAX_POOLED_CAPACITY);
        }
    }

    /// Oversized messages never leave an oversized buffer in the pool
    #[test]
    fn test_large_records_not_retained(len in (MAX_POOLED_CAPACITY / 2)..(MAX_POOLED_CAPACITY * 2)) {
        let pool = Arc::new(EventPool::new());
        let logger = Logger::builder()
            .sink(MemorySink::new())
            .pool(Arc::clone(&pool))
            .build();

        logger.info().msg(&"x".repeat(len));
        for _ in 0..pool.idle() {
            prop_assert!(pool.acquire().capacity() <= MAX_POOLED_CAPACITY);
        }
    }
}
