//! Error types for the communication crate.

use std::io;
use thiserror::Error;

/// Errors raised by transports feeding the GRBL emulator.
#[derive(Error, Debug)]
pub enum CommunicationError {
    /// The listening socket could not be bound.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// Address that was requested.
        address: String,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },

    /// Accepting a client connection failed.
    #[error("Failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    /// Reading from or writing to a connected client failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for communication calls.
pub type CommunicationResult<T> = Result<T, CommunicationError>;
