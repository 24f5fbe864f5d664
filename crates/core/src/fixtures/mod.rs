//! Fixtures

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    catalog::Catalog,
    fixtures::tracks::TracksFixture,
    money::AmountError,
    tracks::{Track, TrackError},
};

pub mod tracks;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between tracks
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Track could not be built
    #[error(transparent)]
    Track(#[from] TrackError),
}

impl From<AmountError> for FixtureError {
    fn from(error: AmountError) -> Self {
        match error {
            AmountError::UnknownCurrency(code) => Self::UnknownCurrency(code),
            other => Self::InvalidPrice(other.to_string()),
        }
    }
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Tracks in file order
    tracks: Vec<Track>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            tracks: Vec::new(),
            currency: None,
        }
    }

    /// Load tracks from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_tracks(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("tracks").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: TracksFixture = serde_norway::from_str(&contents)?;

        for track_fixture in fixture.tracks {
            let (_minor_units, currency) = tracks::parse_price(&track_fixture.price)?;

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.tracks.push(track_fixture.try_into()?);
        }

        Ok(self)
    }

    /// Currency of the loaded tracks
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Loaded tracks
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Look up a loaded track by id
    ///
    /// # Errors
    ///
    /// Returns an error if no loaded track has the id.
    pub fn track(&self, id: &str) -> Result<&Track, FixtureError> {
        self.tracks
            .iter()
            .find(|track| track.id.as_str() == id)
            .ok_or_else(|| FixtureError::TrackNotFound(id.to_string()))
    }

    /// Catalog of the loaded tracks
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.tracks.clone())
    }
}
