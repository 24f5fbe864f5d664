//! Checkout errors.

use beatstore::metadata::MetadataError;
use thiserror::Error;

use crate::{fulfillment::FulfillmentError, payments::PaymentsServiceError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("payment verification failed")]
    Payment(#[from] PaymentsServiceError),

    #[error("invalid payment metadata")]
    Metadata(#[from] MetadataError),

    #[error("payment has no customer email")]
    MissingCustomerEmail,

    #[error("fulfillment failed after payment")]
    Fulfillment(#[from] FulfillmentError),
}
