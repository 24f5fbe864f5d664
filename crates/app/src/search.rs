//! Search-as-you-type over the catalog.

use std::sync::{Arc, Mutex, PoisonError};

use beatstore::{
    catalog::TrackFilter,
    sequence::{Latest, QuerySequencer, QueryTicket},
    tracks::Track,
};
use tracing::debug;

use crate::catalog::{CatalogService, CatalogServiceError};

/// One search box: overlapping queries resolve in any order, but only the
/// newest query's results are kept.
///
/// A session belongs to a single client; `catalog list` runs its query
/// through one. HTTP clients get the same ordering by echoing `seq`.
pub struct SearchSession {
    catalog: Arc<dyn CatalogService>,
    sequencer: QuerySequencer,
    results: Mutex<Latest<Vec<Track>>>,
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("sequencer", &self.sequencer)
            .finish_non_exhaustive()
    }
}

impl SearchSession {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog,
            sequencer: QuerySequencer::new(),
            results: Mutex::new(Latest::new()),
        }
    }

    /// Take a ticket for a query about to be issued.
    pub fn begin(&self) -> QueryTicket {
        self.sequencer.issue()
    }

    /// Run the query for `ticket`. Returns the results when they were applied,
    /// or `None` when a newer query was issued in the meantime.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog could not be fetched.
    #[tracing::instrument(name = "search.run", skip(self, filter), fields(ticket = ticket.value()), err)]
    pub async fn run(
        &self,
        ticket: QueryTicket,
        filter: &TrackFilter,
    ) -> Result<Option<Vec<Track>>, CatalogServiceError> {
        let catalog = self.catalog.catalog().await?;

        let found: Vec<Track> = catalog.filter(filter).into_iter().cloned().collect();

        let applied = self
            .results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .offer(&self.sequencer, ticket, found.clone());

        if !applied {
            debug!("discarding stale search results");

            return Ok(None);
        }

        Ok(Some(found))
    }

    /// Issue and run a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog could not be fetched.
    pub async fn search(
        &self,
        filter: &TrackFilter,
    ) -> Result<Option<Vec<Track>>, CatalogServiceError> {
        let ticket = self.begin();

        self.run(ticket, filter).await
    }

    /// Results of the newest applied query.
    pub fn current(&self) -> Option<Vec<Track>> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current()
            .cloned()
    }
}
