//! Tracks

use std::fmt;

use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::money::{AmountError, to_minor_units};

/// Content store document identifier of a track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TrackId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TrackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors turning a content store document into a [`Track`].
#[derive(Debug, Error, PartialEq)]
pub enum TrackError {
    /// Document has an empty identifier
    #[error("track document is missing an id")]
    MissingId,

    /// Price is negative or not a finite number
    #[error("track {id} has an invalid price: {price}")]
    InvalidPrice {
        /// Track id
        id: String,
        /// Price as received
        price: f64,
    },

    /// Price does not fit in minor units
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// A purchasable beat.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Document identifier
    pub id: TrackId,

    /// Display title
    pub title: String,

    /// Duration label, e.g. `"3:12"`
    pub time: String,

    /// Tempo label, e.g. `"140"`
    pub bpm: String,

    /// Free-form tags
    pub tags: SmallVec<[String; 5]>,

    /// Genre label
    pub genre: Option<String>,

    /// Producer credit
    pub artist: Option<String>,

    /// Base price
    pub price: Money<'static, Currency>,

    /// Whether the track is promoted on the storefront
    pub featured: bool,

    /// Cover image URL
    pub image_url: Option<String>,

    /// Full audio URL, also used as the download link
    pub audio_url: Option<String>,

    /// Preview audio URL
    pub preview_url: Option<String>,

    /// Long description
    pub description: Option<String>,
}

impl Track {
    /// Build a track from a content store document, pricing it in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no id or an unusable price.
    pub fn from_document(
        document: TrackDocument,
        currency: &'static Currency,
    ) -> Result<Self, TrackError> {
        if document.id.trim().is_empty() {
            return Err(TrackError::MissingId);
        }

        let price = document
            .price
            .and_then(Decimal::from_f64)
            .unwrap_or_default();

        if price.is_sign_negative() {
            return Err(TrackError::InvalidPrice {
                id: document.id,
                price: document.price.unwrap_or_default(),
            });
        }

        let tags = document
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter(|tag| !tag.trim().is_empty())
            .collect();

        Ok(Self {
            id: TrackId(document.id),
            title: document.title.unwrap_or_default(),
            time: document.time.unwrap_or_default(),
            bpm: document.bpm.map(|bpm| bpm.to_string()).unwrap_or_default(),
            tags,
            genre: document.genre,
            artist: document.artist,
            price: Money::from_minor(to_minor_units(price)?, currency),
            featured: document.featured.unwrap_or(false),
            image_url: document.image_url,
            audio_url: document.audio_url,
            preview_url: document.preview_url,
            description: document.description,
        })
    }

    /// Whether any tag equals `tag`, ignoring case.
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();

        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// Whether the genre equals `genre`, ignoring case.
    pub fn is_genre(&self, genre: &str) -> bool {
        let genre = genre.to_lowercase();

        self.genre
            .as_deref()
            .is_some_and(|g| g.to_lowercase() == genre)
    }
}

/// Tempo as stored in the content store; editors have entered both numbers and text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bpm {
    /// Numeric tempo
    Number(u32),

    /// Free-form tempo label
    Text(String),
}

impl fmt::Display for Bpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bpm::Number(value) => write!(f, "{value}"),
            Bpm::Text(value) => f.write_str(value),
        }
    }
}

/// Track document as projected by the content store query.
///
/// Projections return `null` for absent fields, so everything except the id is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDocument {
    /// Document identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Title
    pub title: Option<String>,

    /// Duration label
    pub time: Option<String>,

    /// Tempo
    pub bpm: Option<Bpm>,

    /// Tags
    pub tags: Option<Vec<String>>,

    /// Cover image URL
    pub image_url: Option<String>,

    /// Price in major units
    pub price: Option<f64>,

    /// Featured flag
    pub featured: Option<bool>,

    /// Producer credit
    pub artist: Option<String>,

    /// Genre label
    pub genre: Option<String>,

    /// Long description
    pub description: Option<String>,

    /// Full audio URL
    pub audio_url: Option<String>,

    /// Preview audio URL
    pub preview_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GHS;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn decodes_projection_with_nulls() -> TestResult {
        let document: TrackDocument = serde_json::from_value(json!({
            "_id": "track-1",
            "title": "Midnight Drill",
            "time": "3:12",
            "bpm": 140,
            "tags": null,
            "imageUrl": null,
            "price": 39.95,
            "featured": true,
            "artist": "Bling",
            "genre": "UK Drill",
            "description": null,
            "audioUrl": "https://cdn.example.com/midnight.mp3",
            "previewUrl": null
        }))?;

        let track = Track::from_document(document, GHS)?;

        assert_eq!(track.id.as_str(), "track-1");
        assert_eq!(track.bpm, "140");
        assert!(track.tags.is_empty());
        assert!(track.featured);
        assert_eq!(track.price.to_minor_units(), 3995);

        Ok(())
    }

    #[test]
    fn text_bpm_is_kept_verbatim() -> TestResult {
        let document: TrackDocument = serde_json::from_value(json!({
            "_id": "track-2",
            "bpm": "90-95"
        }))?;

        let track = Track::from_document(document, GHS)?;

        assert_eq!(track.bpm, "90-95");
        assert_eq!(track.price.to_minor_units(), 0);
        assert!(!track.featured);

        Ok(())
    }

    #[test]
    fn rejects_negative_price() -> TestResult {
        let document: TrackDocument = serde_json::from_value(json!({
            "_id": "track-3",
            "price": -1.0
        }))?;

        let result = Track::from_document(document, GHS);

        assert!(matches!(result, Err(TrackError::InvalidPrice { .. })));

        Ok(())
    }

    #[test]
    fn rejects_blank_id() -> TestResult {
        let document: TrackDocument = serde_json::from_value(json!({ "_id": " " }))?;

        assert_eq!(
            Track::from_document(document, GHS),
            Err(TrackError::MissingId)
        );

        Ok(())
    }
}
