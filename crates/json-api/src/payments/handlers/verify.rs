//! Verify Payment Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    payments::{errors::into_status_error, models::VerifyResponse},
    state::State,
};

/// Verify Payment Handler
///
/// Confirms a payment with the gateway. A transaction the customer abandoned
/// is reported with its gateway status rather than as an error.
#[endpoint(
    tags("payments"),
    summary = "Verify Payment",
    responses(
        (status_code = StatusCode::OK, description = "Payment verified"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing reference or verification failed"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Payment gateway not configured"),
    ),
)]
pub(crate) async fn handler(
    reference: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<VerifyResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let reference = reference.into_inner().unwrap_or_default();

    let verified = state
        .app
        .payments
        .verify(&reference)
        .await
        .map_err(into_status_error)?;

    Ok(Json(verified.into()))
}
