//! Remote sink implementations
//!
//! Remote sinks receive closed records without the trailing newline local
//! sinks get. See [`RemoteSink`](crate::core::RemoteSink) for the contract.

pub mod http;
#[cfg(feature = "network")]
pub mod tcp;

pub use http::{HttpOption, HttpRemoteSink};
#[cfg(feature = "network")]
pub use tcp::TcpRemoteSink;
