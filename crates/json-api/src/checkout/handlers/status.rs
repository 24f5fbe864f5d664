//! Checkout Status Handler

use jiff::Timestamp;
use salvo::prelude::*;

use crate::checkout::models::CheckoutStatusResponse;

/// Checkout Status Handler
///
/// Reports that the checkout endpoint is reachable.
#[endpoint(tags("checkout"), summary = "Checkout status")]
pub(crate) async fn handler() -> Json<CheckoutStatusResponse> {
    Json(CheckoutStatusResponse {
        status: "OK".to_string(),
        message: "Checkout API is running".to_string(),
        timestamp: Timestamp::now().to_string(),
    })
}
