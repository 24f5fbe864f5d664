//! Track Index Handler

use std::sync::Arc;

use beatstore::catalog::TrackFilter;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    state::State,
    tracks::{errors::into_status_error, models::TrackResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TracksResponse {
    /// Matching tracks in catalog order
    pub tracks: Vec<TrackResponse>,

    /// Number of matching tracks
    pub count: usize,

    /// Sequence number sent by the client, echoed so it can drop stale responses
    pub seq: Option<u64>,
}

/// Track Index Handler
///
/// Returns the tracks matching an optional search query, genre and tag.
#[endpoint(
    tags("tracks"),
    summary = "List Tracks",
    responses(
        (status_code = StatusCode::OK, description = "Matching tracks"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Catalog is unavailable"),
    ),
)]
pub(crate) async fn handler(
    q: QueryParam<String, false>,
    genre: QueryParam<String, false>,
    tag: QueryParam<String, false>,
    seq: QueryParam<u64, false>,
    depot: &mut Depot,
) -> Result<Json<TracksResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let catalog = state
        .app
        .catalog
        .catalog()
        .await
        .map_err(into_status_error)?;

    let filter = TrackFilter {
        query: q.into_inner(),
        genre: genre.into_inner(),
        tag: tag.into_inner(),
    };

    let tracks: Vec<TrackResponse> = catalog
        .filter(&filter)
        .into_iter()
        .map(TrackResponse::from)
        .collect();

    Ok(Json(TracksResponse {
        count: tracks.len(),
        tracks,
        seq: seq.into_inner(),
    }))
}

#[cfg(test)]
mod tests {
    use beatstore::catalog::Catalog;
    use beatstore_app::{catalog::CatalogServiceError, content::ContentStoreError};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, service, tracks};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service(mocks, Router::with_path("tracks").get(handler))
    }

    fn catalog_mocks() -> TestResult<Mocks> {
        let mut mocks = Mocks::default();
        let tracks = tracks()?;

        mocks
            .catalog
            .expect_catalog()
            .once()
            .return_once(move || Ok(Catalog::new(tracks)));

        Ok(mocks)
    }

    #[tokio::test]
    async fn test_index_returns_all_tracks() -> TestResult {
        let mut res = TestClient::get("http://example.com/tracks")
            .send(&make_service(catalog_mocks()?))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: TracksResponse = res.take_json().await?;

        assert_eq!(body.count, 4);
        assert_eq!(body.seq, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_filters_and_echoes_seq() -> TestResult {
        let mut res = TestClient::get("http://example.com/tracks?q=dark&genre=trap&seq=7")
            .send(&make_service(catalog_mocks()?))
            .await;

        let body: TracksResponse = res.take_json().await?;

        let ids: Vec<&str> = body.tracks.iter().map(|track| track.id.as_str()).collect();

        assert_eq!(ids, vec!["beat-neon-trap"]);
        assert_eq!(body.seq, Some(7));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_catalog_failure_returns_502() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.catalog.expect_catalog().once().return_once(|| {
            Err(CatalogServiceError::ContentStore(
                ContentStoreError::UnexpectedResponse("status 503".to_string()),
            ))
        });

        let res = TestClient::get("http://example.com/tracks")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }
}
