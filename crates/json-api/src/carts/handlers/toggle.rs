//! Toggle Cart Panel Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Toggle Cart Panel Handler
///
/// Opens a closed cart panel or closes an open one.
#[endpoint(
    tags("carts"),
    summary = "Toggle Cart Panel",
    responses(
        (status_code = StatusCode::OK, description = "Cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .toggle_panel(cart.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, cart_session, service};

    use super::*;

    #[tokio::test]
    async fn test_toggle_returns_cart() -> TestResult {
        let mut mocks = Mocks::default();
        let uuid = Uuid::now_v7();

        mocks.carts.expect_toggle_panel().once().return_once(move |cart| {
            let mut session = cart_session(cart);
            session.cart.apply(
                beatstore::cart::CartAction::TogglePanel,
                &beatstore::catalog::Catalog::default(),
            )?;

            Ok(session)
        });

        let mut res = TestClient::post(format!("http://example.com/carts/{uuid}/toggle"))
            .send(&service(
                mocks,
                Router::with_path("carts/{cart}/toggle").post(handler),
            ))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert!(body.is_open);

        Ok(())
    }
}
