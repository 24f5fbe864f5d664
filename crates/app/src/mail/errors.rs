//! Mail errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider refused the message.
    #[error("email provider rejected the message: {0}")]
    Rejected(String),
}
