//! Payment errors.

use beatstore::payments::PaymentTransitionError;
use thiserror::Error;

/// Errors that can occur when communicating with the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a body that is not a gateway response.
    #[error("unexpected response from payment gateway: {0}")]
    UnexpectedResponse(String),

    /// The configured gateway base URL cannot carry a request path.
    #[error("invalid gateway url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("payment gateway is not configured")]
    NotConfigured,

    #[error("{0}")]
    Validation(String),

    #[error("payment gateway rejected the request: {0}")]
    Rejected(String),

    #[error("payment gateway unavailable")]
    Upstream(#[from] GatewayError),

    #[error("invalid payment state change")]
    Transition(#[from] PaymentTransitionError),
}
