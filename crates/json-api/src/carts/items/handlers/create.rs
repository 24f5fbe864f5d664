//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beatstore::{licenses::LicenseType, tracks::TrackId};

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    /// Track to add
    pub track_id: String,

    /// License the track is bought under, e.g. "Basic License"
    pub license_type: String,
}

/// Create Cart Item Handler
///
/// Adds one of the track under the license. Adding a track and license that
/// is already in the cart increments that line's quantity.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::NOT_FOUND, description = "Track not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Catalog unavailable"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.create",
    skip(cart, json, depot, res),
    fields(cart_uuid = tracing::field::Empty, track_id = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = cart.into_inner();
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("cart_uuid", tracing::field::display(cart));
    span.record("track_id", tracing::field::display(&request.track_id));

    if request.track_id.trim().is_empty() {
        return Err(StatusError::bad_request().brief("track_id is required"));
    }

    let license = LicenseType::new(request.license_type)
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

    let session = state
        .app
        .carts
        .add_item(cart.into(), TrackId::new(request.track_id), license)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(session.into()))
}
