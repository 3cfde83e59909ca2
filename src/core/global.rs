//! Process-wide default logger
//!
//! The default is an immutable [`Logger`] behind an `Arc`. Replacing it with
//! [`set_default`] swaps the handle; anyone still holding the previous one
//! keeps a working logger. Deriving from the default goes through the usual
//! copy-on-write methods, so callers never share mutable state with it.

use super::logger::Logger;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

static DEFAULT_LOGGER: OnceLock<RwLock<Arc<Logger>>> = OnceLock::new();

fn holder() -> &'static RwLock<Arc<Logger>> {
    DEFAULT_LOGGER.get_or_init(|| RwLock::new(Arc::new(Logger::new())))
}

/// The current default logger
///
/// Initialized on first use with [`Logger::new`].
pub fn default_logger() -> Arc<Logger> {
    Arc::clone(&holder().read())
}

/// Install a new default logger, returning the previous one
pub fn set_default(logger: Logger) -> Arc<Logger> {
    std::mem::replace(&mut *holder().write(), Arc::new(logger))
}
