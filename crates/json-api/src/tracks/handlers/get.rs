//! Get Track Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    state::State,
    tracks::{errors::into_status_error, models::TrackResponse},
};

/// Get Track Handler
///
/// Returns a single track.
#[endpoint(
    tags("tracks"),
    summary = "Get Track",
    responses(
        (status_code = StatusCode::OK, description = "Track"),
        (status_code = StatusCode::NOT_FOUND, description = "Track not found"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Catalog is unavailable"),
    ),
)]
pub(crate) async fn handler(
    track: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<TrackResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let track = state
        .app
        .catalog
        .get_track(&track.into_inner())
        .await
        .map_err(into_status_error)?
        .ok_or_else(|| StatusError::not_found().brief("Track not found"))?;

    Ok(Json(TrackResponse::from(&track)))
}
