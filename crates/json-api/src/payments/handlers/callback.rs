//! Payment Callback Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    checkout::checkout_status_error,
    extensions::*,
    observability::{CheckoutOutcome, record_checkout},
    payments::models::{CallbackResponse, CompletionResponse},
    state::State,
};

/// Payment Callback Handler
///
/// The gateway redirects the customer here after payment. The payment is
/// verified and, the first time it is seen to succeed, fulfilled. Repeated
/// callbacks for the same reference return the original fulfillment.
#[endpoint(
    tags("payments"),
    summary = "Payment Callback",
    responses(
        (status_code = StatusCode::OK, description = "Payment verified"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Purchased track not found"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "payments.callback", skip(reference, depot), err)]
pub(crate) async fn handler(
    reference: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CallbackResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let reference = reference.into_inner().unwrap_or_default();

    let completion = state
        .app
        .checkout
        .complete(&reference)
        .await
        .map_err(|error| {
            record_checkout("payment_callback", CheckoutOutcome::Failed);

            checkout_status_error(error)
        })?;

    record_checkout(
        "payment_callback",
        if completion.fulfillment.is_some() {
            CheckoutOutcome::Fulfilled
        } else {
            CheckoutOutcome::Unpaid
        },
    );

    Ok(Json(CallbackResponse {
        status: true,
        data: CompletionResponse {
            payment: completion.payment.into(),
            fulfillment: completion.fulfillment.map(Into::into),
        },
    }))
}
