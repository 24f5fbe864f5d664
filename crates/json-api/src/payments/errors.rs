//! Errors

use salvo::http::StatusError;
use tracing::error;

use beatstore_app::payments::PaymentsServiceError;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::NotConfigured => {
            error!("payment request received without a gateway secret");

            StatusError::internal_server_error().brief("Payment gateway is not configured")
        }
        PaymentsServiceError::Validation(message) | PaymentsServiceError::Rejected(message) => {
            StatusError::bad_request().brief(message)
        }
        PaymentsServiceError::Upstream(source) => {
            error!("payment gateway request failed: {source}");

            StatusError::bad_gateway().brief("Payment gateway is unavailable")
        }
        PaymentsServiceError::Transition(source) => {
            error!("illegal payment state change: {source}");

            StatusError::internal_server_error()
        }
    }
}
