//! Carts service errors.

use beatstore::{cart::CartError, tracks::TrackId};
use thiserror::Error;

use crate::catalog::CatalogServiceError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart not found")]
    NotFound,

    #[error("track {0} not found")]
    TrackNotFound(TrackId),

    #[error("catalog unavailable")]
    Catalog(#[from] CatalogServiceError),

    #[error("invalid cart change")]
    Cart(#[from] CartError),
}
