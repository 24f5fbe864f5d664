//! Initialize Payment Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use beatstore_app::payments::models::InitializePayment;

use crate::{
    extensions::*,
    payments::{errors::into_status_error, models::InitializeResponse},
    state::State,
};

/// Initialize Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InitializePaymentRequest {
    /// Customer email
    pub email: String,

    /// Amount in major units, e.g. 39.95
    pub amount: f64,

    /// Ignored; the server always generates the reference
    pub reference: Option<String>,

    /// Order metadata returned by the gateway on verification
    pub metadata: Option<Value>,
}

/// Initialize Payment Handler
///
/// Starts a payment with the gateway and returns the hosted page to send the
/// customer to.
#[endpoint(
    tags("payments"),
    summary = "Initialize Payment",
    responses(
        (status_code = StatusCode::OK, description = "Payment initialized"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Payment gateway not configured"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<InitializePaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<InitializeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.reference.is_some() {
        tracing::debug!("ignoring client supplied payment reference");
    }

    let amount = Decimal::try_from(request.amount)
        .map_err(|_err| StatusError::bad_request().brief("amount must be a finite number"))?;

    let initialized = state
        .app
        .payments
        .initialize(InitializePayment {
            email: request.email,
            amount,
            metadata: request.metadata.unwrap_or(Value::Null),
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(initialized.into()))
}
