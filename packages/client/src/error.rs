//! Error types for the race client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The server sent something this client does not understand
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Clock offset could not be measured
    #[error("Clock sync failed: {0}")]
    ClockSync(String),
}
