//! Error type for the client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// The single failure kind surfaced by the client.
///
/// Transport failures, non-2xx statuses and undecodable bodies all end up
/// here. `message` is safe to show to a user; `detail` is for logs.
#[derive(Debug, Clone, Error)]
#[error("{message}: {detail}")]
pub struct ClientError {
    pub message: String,
    pub detail: String,
}

impl ClientError {
    pub fn new(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: detail.into(),
        }
    }
}
