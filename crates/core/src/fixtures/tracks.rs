//! Track Fixtures

use std::str::FromStr;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    money::{currency_from_code, to_minor_units},
    tracks::{Track, TrackId},
};

/// Wrapper for tracks in YAML
#[derive(Debug, Deserialize)]
pub struct TracksFixture {
    /// Tracks in catalog order
    pub tracks: Vec<TrackFixture>,
}

/// Track Fixture
#[derive(Debug, Deserialize)]
pub struct TrackFixture {
    /// Track id
    pub id: String,

    /// Title
    pub title: String,

    /// Duration label
    #[serde(default)]
    pub time: String,

    /// Tempo label
    #[serde(default)]
    pub bpm: String,

    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Genre
    pub genre: Option<String>,

    /// Artist
    pub artist: Option<String>,

    /// Price (e.g., "39.95 GHS")
    pub price: String,

    /// Featured flag
    #[serde(default)]
    pub featured: bool,

    /// Cover image URL
    pub image_url: Option<String>,

    /// Full audio URL
    pub audio_url: Option<String>,

    /// Preview audio URL
    pub preview_url: Option<String>,

    /// Description
    pub description: Option<String>,
}

impl TryFrom<TrackFixture> for Track {
    type Error = FixtureError;

    fn try_from(fixture: TrackFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(Track {
            id: TrackId::new(fixture.id),
            title: fixture.title,
            time: fixture.time,
            bpm: fixture.bpm,
            tags: fixture.tags.into_iter().collect(),
            genre: fixture.genre,
            artist: fixture.artist,
            price: Money::from_minor(minor_units, currency),
            featured: fixture.featured,
            image_url: fixture.image_url,
            audio_url: fixture.audio_url,
            preview_url: fixture.preview_url,
            description: fixture.description,
        })
    }
}

/// Parse price string (e.g., "39.95 GHS") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount =
        Decimal::from_str(amount).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = to_minor_units(amount)?;
    let currency = currency_from_code(code)?;

    Ok((minor_units, currency))
}
