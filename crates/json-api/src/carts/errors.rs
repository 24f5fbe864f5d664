//! Errors

use salvo::http::StatusError;
use tracing::error;

use beatstore_app::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::TrackNotFound(track) => {
            StatusError::not_found().brief(format!("Track {track} not found"))
        }
        CartsServiceError::Cart(source) => {
            error!("failed to change cart: {source}");

            StatusError::bad_request().brief("Invalid cart change")
        }
        CartsServiceError::Catalog(source) => {
            error!("failed to fetch catalog for cart: {source}");

            StatusError::bad_gateway().brief("Catalog is unavailable")
        }
    }
}
