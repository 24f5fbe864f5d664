//! Catalog service.

use async_trait::async_trait;
use beatstore::{
    catalog::Catalog,
    tracks::{Track, TrackDocument},
};
use mockall::automock;
use rusty_money::iso::Currency;
use tracing::{debug, warn};

use crate::{
    catalog::errors::CatalogServiceError,
    content::{ContentStoreClient, queries},
};

#[derive(Debug, Clone)]
pub struct ContentStoreCatalogService {
    client: ContentStoreClient,
    currency: &'static Currency,
}

impl ContentStoreCatalogService {
    #[must_use]
    pub fn new(client: ContentStoreClient, currency: &'static Currency) -> Self {
        Self { client, currency }
    }
}

#[async_trait]
impl CatalogService for ContentStoreCatalogService {
    #[tracing::instrument(name = "catalog.service.fetch_tracks", skip(self), err)]
    async fn fetch_tracks(&self) -> Result<Vec<Track>, CatalogServiceError> {
        let documents: Vec<TrackDocument> = self.client.query(&queries::all_tracks(), &[]).await?;

        let tracks = into_tracks(documents, self.currency);

        debug!(count = tracks.len(), "fetched tracks");

        Ok(tracks)
    }

    #[tracing::instrument(name = "catalog.service.get_track", skip(self), err)]
    async fn get_track(&self, id: &str) -> Result<Option<Track>, CatalogServiceError> {
        let document: Option<TrackDocument> = self
            .client
            .query(&queries::track_by_id(), &[("id", id)])
            .await?;

        document
            .map(|document| Track::from_document(document, self.currency))
            .transpose()
            .map_err(Into::into)
    }

    async fn catalog(&self) -> Result<Catalog, CatalogServiceError> {
        Ok(Catalog::new(self.fetch_tracks().await?))
    }
}

/// Convert documents in order, skipping any that cannot be priced.
fn into_tracks(documents: Vec<TrackDocument>, currency: &'static Currency) -> Vec<Track> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.id.clone();

            Track::from_document(document, currency)
                .inspect_err(|error| warn!(track = %id, %error, "skipping track document"))
                .ok()
        })
        .collect()
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch every track in content store order.
    async fn fetch_tracks(&self) -> Result<Vec<Track>, CatalogServiceError>;

    /// Fetch one track by id.
    async fn get_track(&self, id: &str) -> Result<Option<Track>, CatalogServiceError>;

    /// Fetch every track as a catalog snapshot.
    async fn catalog(&self) -> Result<Catalog, CatalogServiceError>;
}
