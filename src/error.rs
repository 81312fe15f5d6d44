//! Error types for batch-dl
//!
//! A single [`Error`] enum covers the three classes the orchestrator cares about:
//! - cancellation (fatal, stops the whole batch)
//! - transfer faults (network, protocol, I/O; reported per item, never fatal)
//! - enumeration failures of the item source (fatal)
//!
//! plus configuration errors raised before a batch starts.

use thiserror::Error;

/// Result type alias for batch-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for batch-dl
#[derive(Debug, Error)]
pub enum Error {
    /// The batch (or the caller's context) was cancelled
    #[error("download canceled")]
    Canceled,

    /// Network fault reported by the transfer engine
    #[error("network error: {0}")]
    Network(String),

    /// Remote endpoint answered with something the transfer engine could not use
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O error, usually from writing to an item's target
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The item source failed to produce further items
    #[error("item enumeration failed: {0}")]
    Enumeration(#[source] Box<Error>),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "part_size")
        key: Option<String>,
    },

    /// A per-item task panicked while transferring
    #[error("download task panicked: {0}")]
    TaskPanicked(String),
}

impl Error {
    /// Build a configuration error for a specific key
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Returns true if this error is, or wraps, a cancellation.
    ///
    /// The whole `source()` chain is inspected. `io::Error` payloads are unwrapped
    /// too, so a transfer engine that smuggles [`Error::Canceled`] through an
    /// `io::Error::other(..)` is still classified correctly.
    pub fn is_cancellation(&self) -> bool {
        match self {
            Error::Canceled => true,
            Error::Enumeration(inner) => inner.is_cancellation(),
            Error::Io(io) => io_is_cancellation(io),
            _ => false,
        }
    }
}

fn io_is_cancellation(io: &std::io::Error) -> bool {
    io.get_ref()
        .is_some_and(|inner| chain_is_cancellation(Some(inner)))
}

// `io::Error::source()` skips the custom payload itself, so payloads are
// inspected through `get_ref()` before following the chain.
fn chain_is_cancellation(mut current: Option<&(dyn std::error::Error + 'static)>) -> bool {
    while let Some(err) = current {
        if let Some(ours) = err.downcast_ref::<Error>() {
            return ours.is_cancellation();
        }
        if let Some(ours) = err.downcast_ref::<Box<Error>>() {
            return ours.is_cancellation();
        }
        if let Some(io) = err.downcast_ref::<std::io::Error>()
            && io_is_cancellation(io)
        {
            return true;
        }
        current = err.source();
    }
    false
}
