//! Cart Checkout Handler

use std::sync::Arc;

use beatstore::money::major_units;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beatstore_app::payments::models::InitializePayment;

use crate::{
    carts::errors::into_status_error,
    extensions::*,
    payments::{InitializeResponse, payment_status_error},
    state::State,
};

/// Cart Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartCheckoutRequest {
    /// Customer email
    pub email: String,

    /// Customer display name
    pub customer_name: Option<String>,

    /// Customer phone number
    pub customer_phone: Option<String>,
}

/// Cart Checkout Handler
///
/// Starts a payment for the cart's total. The cart's lines travel to the
/// gateway as order metadata; the cart is cleared once the payment is
/// fulfilled.
#[endpoint(
    tags("carts"),
    summary = "Check Out Cart",
    responses(
        (status_code = StatusCode::OK, description = "Payment initialized"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or bad request"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Payment gateway not configured"),
    ),
)]
#[tracing::instrument(
    name = "carts.checkout",
    skip(cart, json, depot),
    fields(cart_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<CartCheckoutRequest>,
    depot: &mut Depot,
) -> Result<Json<InitializeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = cart.into_inner();
    let request = json.into_inner();

    tracing::Span::current().record("cart_uuid", tracing::field::display(cart));

    let session = state
        .app
        .carts
        .get_cart(cart.into())
        .await
        .map_err(into_status_error)?;

    if session.cart.is_empty() {
        return Err(StatusError::bad_request().brief("Cart is empty"));
    }

    let mut metadata = session
        .cart
        .order_metadata(request.customer_name, request.customer_phone);

    metadata.set_cart_uuid(cart.to_string());
    metadata.set_customer_email(request.email.trim());

    let metadata =
        serde_json::to_value(&metadata).or_500("failed to encode cart metadata")?;

    let initialized = state
        .app
        .payments
        .initialize(InitializePayment {
            email: request.email,
            amount: major_units(&session.cart.total()),
            metadata,
        })
        .await
        .map_err(payment_status_error)?;

    Ok(Json(initialized.into()))
}

#[cfg(test)]
mod tests {
    use beatstore::{cart::CartAction, catalog::Catalog, licenses::LicenseType, tracks::TrackId};
    use beatstore_app::payments::models::InitializedPayment;
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, cart_session, service, tracks};

    use super::*;

    fn metadata_track_ids(metadata: &Value) -> Vec<&str> {
        metadata
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("track_id").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn make_service(mocks: Mocks) -> Service {
        service(
            mocks,
            Router::with_path("carts/{cart}/checkout").post(handler),
        )
    }

    #[tokio::test]
    async fn test_checkout_initializes_payment_for_cart_total() -> TestResult {
        let mut mocks = Mocks::default();
        let uuid = Uuid::now_v7();
        let catalog = Catalog::new(tracks()?);

        let mut session = cart_session(uuid.into());

        for id in ["midnight-drill", "neon-trap"] {
            session.cart.apply(
                CartAction::Add {
                    track_id: TrackId::new(id),
                    license: LicenseType::new("Basic License")?,
                },
                &catalog,
            )?;
        }

        mocks.carts.expect_get_cart().once().return_once(move |_| Ok(session));

        mocks
            .payments
            .expect_initialize()
            .once()
            .withf(move |payment| {
                payment.amount == Decimal::new(6990, 2)
                    && payment.metadata.get("cart_uuid") == Some(&json!(uuid.to_string()))
                    && payment.metadata.get("customer_email") == Some(&json!("ama@example.com"))
                    && metadata_track_ids(&payment.metadata) == ["midnight-drill", "neon-trap"]
            })
            .return_once(|_| {
                Ok(InitializedPayment {
                    authorization_url: "https://checkout.example.com/abc".to_string(),
                    access_code: "abc".to_string(),
                    reference: "bb_1_abcdefghi".to_string(),
                })
            });

        let mut res = TestClient::post(format!("http://example.com/carts/{uuid}/checkout"))
            .json(&json!({ "email": "ama@example.com", "customer_name": "Ama" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: InitializeResponse = res.take_json().await?;

        assert_eq!(body.data.authorization_url, "https://checkout.example.com/abc");

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_cart_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_get_cart()
            .once()
            .return_once(|cart| Ok(cart_session(cart)));

        mocks.payments.expect_initialize().never();

        let res = TestClient::post(format!("http://example.com/carts/{}/checkout", Uuid::now_v7()))
            .json(&json!({ "email": "ama@example.com" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
