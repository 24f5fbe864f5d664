//! Delete Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use beatstore::tracks::TrackId;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Delete Cart Item Handler
///
/// Removes every line for the track, whatever its license. Removing a track
/// that is not in the cart leaves the cart unchanged.
#[endpoint(
    tags("carts"),
    summary = "Remove Track from Cart",
    responses(
        (status_code = StatusCode::OK, description = "Track removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
    )
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    track: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let session = state
        .app
        .carts
        .remove_item(cart.into_inner().into(), TrackId::new(track.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(session.into()))
}
