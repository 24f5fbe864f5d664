//! Track Errors

use salvo::http::StatusError;
use tracing::error;

use beatstore_app::catalog::CatalogServiceError;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    error!("failed to fetch tracks: {error}");

    StatusError::bad_gateway().brief("Catalog is unavailable")
}
