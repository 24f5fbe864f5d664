//! Create Checkout Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{oapi::extract::JsonBody, prelude::*};

use beatstore::tracks::TrackId;
use beatstore_app::fulfillment::FulfillmentRequest;

use crate::{
    checkout::{
        errors::into_status_error,
        models::{CheckoutRequest, CheckoutResponse},
    },
    extensions::*,
    observability::{CheckoutOutcome, record_checkout},
    state::State,
};

/// Create Checkout Handler
///
/// Delivers a purchase the caller has already confirmed with the gateway:
/// records the order and emails the download link. Repeating a transaction id
/// returns the original order.
#[endpoint(
    tags("checkout"),
    summary = "Fulfil Purchase",
    responses(
        (status_code = StatusCode::OK, description = "Order processed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing required fields"),
        (status_code = StatusCode::NOT_FOUND, description = "Beat or audio file not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Failed to create order record"),
    ),
)]
#[tracing::instrument(
    name = "checkout.create",
    skip(json, depot),
    fields(transaction_id = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let (Some(track_id), Some(customer_email), Some(transaction_id)) = (
        request.track_id(),
        request.customer_email(),
        request.transaction_id(),
    ) else {
        return Err(StatusError::bad_request()
            .brief("Missing required fields: beatId, customerEmail, or transactionId"));
    };

    tracing::Span::current().record("transaction_id", transaction_id.as_str());

    let amount = Decimal::try_from(request.amount())
        .map_err(|_err| StatusError::bad_request().brief("amount must be a finite number"))?;

    let currency = request
        .currency
        .clone()
        .filter(|currency| !currency.trim().is_empty())
        .unwrap_or_else(|| state.app.currency.iso_alpha_code.to_string());

    let receipt = state
        .app
        .checkout
        .fulfil(FulfillmentRequest {
            track_id: TrackId::new(track_id),
            customer_name: request
                .customer_name()
                .unwrap_or_else(|| customer_email.clone()),
            customer_email,
            transaction_id,
            amount,
            currency,
        })
        .await
        .map_err(|error| {
            record_checkout("checkout", CheckoutOutcome::Failed);

            into_status_error(error)
        })?;

    record_checkout("checkout", CheckoutOutcome::Fulfilled);

    Ok(Json(CheckoutResponse {
        success: true,
        message: "Order processed successfully".to_string(),
        data: receipt.into(),
    }))
}

#[cfg(test)]
mod tests {
    use beatstore_app::{
        checkout::CheckoutError,
        fulfillment::{FulfillmentError, FulfillmentReceipt},
        orders::OrdersServiceError,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service(mocks, Router::with_path("checkout").post(handler))
    }

    fn receipt() -> FulfillmentReceipt {
        FulfillmentReceipt {
            order_id: "order-1".to_string(),
            track_title: "Midnight Drill".to_string(),
            download_url: "https://cdn.example.com/midnight-drill.mp3".to_string(),
            email_sent: true,
        }
    }

    #[tokio::test]
    async fn test_checkout_fulfils_store_payload() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .checkout
            .expect_fulfil()
            .once()
            .withf(|request| {
                request.track_id.as_str() == "midnight-drill"
                    && request.customer_name == "Ama"
                    && request.amount == Decimal::new(3995, 2)
                    && request.currency == "GHS"
            })
            .return_once(|_| Ok(receipt()));

        let mut res = TestClient::post("http://example.com/checkout")
            .json(&json!({
                "beatId": "midnight-drill",
                "customerName": "Ama",
                "customerEmail": "ama@example.com",
                "transactionId": "T1",
                "amount": 39.95
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CheckoutResponse = res.take_json().await?;

        assert!(body.success);
        assert_eq!(body.message, "Order processed successfully");
        assert_eq!(body.data.beat_title, "Midnight Drill");
        assert!(body.data.email_sent, "email was sent");

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_accepts_gateway_payload() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .checkout
            .expect_fulfil()
            .once()
            .withf(|request| {
                request.track_id.as_str() == "accra-sunset"
                    && request.customer_name == "kofi@example.com"
                    && request.transaction_id == "bb_2_abcdefghi"
            })
            .return_once(|_| Ok(receipt()));

        let res = TestClient::post("http://example.com/checkout")
            .json(&json!({
                "reference": "bb_2_abcdefghi",
                "customer": { "email": "kofi@example.com" },
                "metadata": { "items": [{ "track_id": "accra-sunset" }] },
                "data": { "amount": 20.95 }
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fields_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.checkout.expect_fulfil().never();

        let res = TestClient::post("http://example.com/checkout")
            .json(&json!({ "beatId": "midnight-drill", "customerEmail": "ama@example.com" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_beat_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.checkout.expect_fulfil().once().return_once(|request| {
            Err(CheckoutError::Fulfillment(FulfillmentError::TrackNotFound(
                request.track_id,
            )))
        });

        let res = TestClient::post("http://example.com/checkout")
            .json(&json!({
                "beatId": "ghost",
                "customerEmail": "ama@example.com",
                "transactionId": "T1"
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_order_failure_returns_500() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.checkout.expect_fulfil().once().return_once(|_| {
            Err(CheckoutError::Fulfillment(FulfillmentError::Order(
                OrdersServiceError::Encode(serde_json::Error::io(std::io::Error::other("boom"))),
            )))
        });

        let res = TestClient::post("http://example.com/checkout")
            .json(&json!({
                "beatId": "midnight-drill",
                "customerEmail": "ama@example.com",
                "transactionId": "T1"
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
