//! Error types for the shop-floor gateway.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Gateway error type.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A protocol database file could not be opened or read.
    ///
    /// This is the only fatal condition raised by the decoding subsystem;
    /// malformed lines inside a readable file are skipped, not escalated.
    #[error("failed to read DBC file {path}: {source}")]
    DbcRead {
        /// Path of the file that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Protocol-level error.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl GatewayError {
    /// Create a protocol error from a message.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}
