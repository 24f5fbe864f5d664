//! Content store errors.

use thiserror::Error;

/// Errors that can occur when communicating with the content store.
#[derive(Debug, Error)]
pub enum ContentStoreError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The content store returned a non-2xx response or unexpected body.
    #[error("unexpected response from content store: {0}")]
    UnexpectedResponse(String),

    /// The response body could not be decoded.
    #[error("failed to decode content store response")]
    Decode(#[source] serde_json::Error),
}
