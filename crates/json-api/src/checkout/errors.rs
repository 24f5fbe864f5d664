//! Errors

use salvo::http::StatusError;
use tracing::error;

use beatstore_app::{checkout::CheckoutError, fulfillment::FulfillmentError};

use crate::payments::payment_status_error;

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::Payment(source) => payment_status_error(source),
        CheckoutError::Metadata(source) => {
            StatusError::bad_request().brief(format!("Invalid payment metadata: {source}"))
        }
        CheckoutError::MissingCustomerEmail => {
            StatusError::bad_request().brief("Payment has no customer email")
        }
        CheckoutError::Fulfillment(source) => fulfillment_status_error(source),
    }
}

fn fulfillment_status_error(error: FulfillmentError) -> StatusError {
    match error {
        FulfillmentError::Validation(message) => StatusError::bad_request().brief(message),
        FulfillmentError::TrackNotFound(_) => StatusError::not_found().brief("Beat not found"),
        FulfillmentError::MissingAudio(_) => {
            StatusError::not_found().brief("Audio file not available for this beat")
        }
        FulfillmentError::Catalog(source) => {
            error!("failed to fetch beat for fulfillment: {source}");

            StatusError::bad_gateway().brief("Catalog is unavailable")
        }
        FulfillmentError::Order(source) => {
            error!("failed to create order record: {source}");

            StatusError::internal_server_error().brief("Failed to create order record")
        }
    }
}
