//! Track Models

use beatstore::{
    money::{format_amount, major_units},
    tracks::Track,
};
use rust_decimal::prelude::ToPrimitive;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Track Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct TrackResponse {
    /// Track id
    pub id: String,

    /// Track title
    pub title: String,

    /// Duration label, e.g. "3:12"
    pub time: String,

    /// Tempo label
    pub bpm: String,

    /// Tags
    pub tags: Vec<String>,

    /// Genre
    pub genre: Option<String>,

    /// Artist
    pub artist: Option<String>,

    /// Price in major units
    pub price: f64,

    /// ISO 4217 currency code
    pub currency: String,

    /// Price with its currency, e.g. "GHS 39.95"
    pub formatted_price: String,

    /// Whether the track is featured
    pub featured: bool,

    /// Cover image URL
    pub image_url: Option<String>,

    /// Preview audio URL
    pub preview_url: Option<String>,

    /// Description
    pub description: Option<String>,
}

impl From<&Track> for TrackResponse {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.to_string(),
            title: track.title.clone(),
            time: track.time.clone(),
            bpm: track.bpm.clone(),
            tags: track.tags.iter().cloned().collect(),
            genre: track.genre.clone(),
            artist: track.artist.clone(),
            price: major_units(&track.price).to_f64().unwrap_or_default(),
            currency: track.price.currency().iso_alpha_code.to_string(),
            formatted_price: format_amount(&track.price),
            featured: track.featured,
            image_url: track.image_url.clone(),
            preview_url: track.preview_url.clone(),
            description: track.description.clone(),
        }
    }
}
