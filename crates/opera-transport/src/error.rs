use std::path::PathBuf;

use opera_records::DecodeError;

/// Errors that can occur delivering or receiving a tagged message.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind the receiving socket.
    #[error("failed to bind to {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The endpoint was unreachable. Not retried here; retry policy
    /// belongs to the caller.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to accept an incoming connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// An I/O error occurred on an established stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// The received bytes did not decode to a complete message.
    /// Connection-fatal: the connection has already been dropped.
    #[error("failed to decode received message: {0}")]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, TransportError>;
