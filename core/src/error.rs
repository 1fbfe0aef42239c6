//! Error types for the remote API client.
//!
//! # Design
//! There is no dedicated "not found" variant: a missing repository arrives as
//! `RemoteRejected` with status 404, like every other non-success status.
//! `RemoteRejected` keeps the raw status and body so the transport can log
//! them; neither is meant to reach the caller of the proxy.

use thiserror::Error;

/// Errors produced while talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout, ...).
    #[error("remote API unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote API answered with an unexpected status.
    #[error("remote API returned status {status}")]
    RemoteRejected { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("failed to decode remote response: {0}")]
    DecodeFailed(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request: {0}")]
    EncodeFailed(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RemoteRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
