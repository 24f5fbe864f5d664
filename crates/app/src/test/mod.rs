//! Test Helpers

use std::sync::Arc;

use beatstore::{catalog::Catalog, fixtures::Fixture, tracks::Track};
use once_cell::sync::Lazy;

use crate::catalog::MockCatalogService;

static TRACKS: Lazy<Vec<Track>> = Lazy::new(|| {
    let mut fixture =
        Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/../core/fixtures"));

    fixture
        .load_tracks("storefront")
        .expect("storefront fixture should load");

    fixture.tracks().to_vec()
});

/// Tracks from the storefront fixture.
pub(crate) fn tracks() -> Vec<Track> {
    TRACKS.clone()
}

/// Track from the storefront fixture.
pub(crate) fn track(id: &str) -> Track {
    TRACKS
        .iter()
        .find(|track| track.id.as_str() == id)
        .cloned()
        .expect("fixture track should exist")
}

/// Catalog mock that serves the storefront fixture any number of times.
pub(crate) fn catalog_service() -> Arc<MockCatalogService> {
    let mut catalog = MockCatalogService::new();

    catalog
        .expect_catalog()
        .returning(|| Ok(Catalog::new(tracks())));

    catalog
        .expect_get_track()
        .returning(|id| Ok(TRACKS.iter().find(|track| track.id.as_str() == id).cloned()));

    Arc::new(catalog)
}
