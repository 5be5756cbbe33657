//! Error type for the reader API client.
//!
//! # Design
//! Every operation fails the same way: either the transport broke before a
//! response arrived, or the server answered with a non-success status. The
//! raw status and body are preserved for the caller; no distinction is made
//! here between not-found, validation, or server errors.

use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::ApiClient) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, or protocol
    /// failure).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server responded with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded into the expected type.
    #[error("decoding response failed: {0}")]
    Decode(String),
}
