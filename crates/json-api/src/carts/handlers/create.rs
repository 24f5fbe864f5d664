//! Create Cart Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, prelude::*};

use crate::{carts::models::CartResponse, extensions::*, state::State};

/// Create Cart Handler
#[endpoint(
    tags("carts"),
    summary = "Create Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Cart created"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state.app.carts.create_cart().await;

    res.add_header(LOCATION, format!("/carts/{}", cart.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use beatstore::cart::Cart;
    use beatstore_app::carts::models::{CartSession, CartUuid};
    use jiff::Timestamp;
    use rusty_money::iso::GHS;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, service};

    use super::*;

    #[tokio::test]
    async fn test_create_returns_201_with_location() -> TestResult {
        let mut mocks = Mocks::default();
        let uuid = CartUuid::now_v7();

        mocks.carts.expect_create_cart().once().return_once(move || CartSession {
            uuid,
            cart: Cart::new(GHS),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        });

        let mut res = TestClient::post("http://example.com/carts")
            .send(&service(mocks, Router::with_path("carts").post(handler)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let location = res
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        assert_eq!(location, Some(format!("/carts/{uuid}")));

        let body: CartResponse = res.take_json().await?;

        assert!(body.items.is_empty());
        assert_eq!(body.formatted_total, "GHS 0.00");

        Ok(())
    }
}
