//! Track Facets Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State, tracks::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FacetsResponse {
    /// Every tag, sorted and de-duplicated
    pub tags: Vec<String>,

    /// Every genre, sorted and de-duplicated
    pub genres: Vec<String>,

    /// Number of tracks in the catalog
    pub count: usize,
}

/// Track Facets Handler
///
/// Returns the tags and genres the catalog can be filtered by.
#[endpoint(
    tags("tracks"),
    summary = "Track Facets",
    responses(
        (status_code = StatusCode::OK, description = "Catalog facets"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Catalog is unavailable"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<FacetsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let catalog = state
        .app
        .catalog
        .catalog()
        .await
        .map_err(into_status_error)?;

    Ok(Json(FacetsResponse {
        tags: catalog.all_tags(),
        genres: catalog.all_genres(),
        count: catalog.count(),
    }))
}
