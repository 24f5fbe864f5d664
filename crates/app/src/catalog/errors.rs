//! Catalog service errors.

use beatstore::tracks::TrackError;
use thiserror::Error;

use crate::content::ContentStoreError;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("content store error")]
    ContentStore(#[from] ContentStoreError),

    #[error("invalid track document")]
    InvalidTrack(#[from] TrackError),
}
