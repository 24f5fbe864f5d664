//! Featured Track Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    tracks::{errors::into_status_error, models::TrackResponse},
};

/// Featured Track Handler
///
/// Returns the first featured track.
#[endpoint(
    tags("tracks"),
    summary = "Featured Track",
    responses(
        (status_code = StatusCode::OK, description = "Featured track"),
        (status_code = StatusCode::NOT_FOUND, description = "No track is featured"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Catalog is unavailable"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<TrackResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let catalog = state
        .app
        .catalog
        .catalog()
        .await
        .map_err(into_status_error)?;

    let featured = catalog
        .featured()
        .ok_or_else(|| StatusError::not_found().brief("No featured track"))?;

    Ok(Json(featured.into()))
}
