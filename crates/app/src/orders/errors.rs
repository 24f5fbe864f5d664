//! Orders service errors.

use thiserror::Error;

use crate::content::ContentStoreError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("failed to create order record")]
    ContentStore(#[from] ContentStoreError),

    #[error("failed to encode order document")]
    Encode(#[source] serde_json::Error),
}
