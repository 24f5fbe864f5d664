//! Fulfillment errors.

use beatstore::tracks::TrackId;
use thiserror::Error;

use crate::{catalog::CatalogServiceError, orders::OrdersServiceError};

#[derive(Debug, Error)]
pub enum FulfillmentError {
    #[error("{0}")]
    Validation(String),

    #[error("beat {0} not found")]
    TrackNotFound(TrackId),

    #[error("audio file not available for beat {0}")]
    MissingAudio(TrackId),

    #[error("catalog unavailable")]
    Catalog(#[from] CatalogServiceError),

    #[error("failed to create order record")]
    Order(#[from] OrdersServiceError),
}
