//! Order metadata
//!
//! Metadata travels to the payment gateway at initialization and comes back on
//! verification. Two shapes are in use: a cart checkout sends an `items` list,
//! a single-track checkout sends a bare `track_id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::tracks::TrackId;

/// Metadata errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    /// Metadata was absent
    #[error("metadata is missing")]
    Missing,

    /// Metadata has neither an `items` list nor a `track_id`
    #[error("metadata has no items list or track id: {0}")]
    Unrecognized(String),

    /// Metadata has an empty `items` list
    #[error("metadata items list is empty")]
    NoItems,
}

/// A line in cart checkout metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataItem {
    /// Track id
    pub track_id: TrackId,

    /// Track title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_title: Option<String>,

    /// License label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,

    /// Quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    /// Unit price in major units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Metadata attached to a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderMetadata {
    /// Cart checkout
    Items {
        /// Lines bought
        items: Vec<MetadataItem>,

        /// Customer display name
        #[serde(skip_serializing_if = "Option::is_none")]
        customer_name: Option<String>,

        /// Customer phone number
        #[serde(skip_serializing_if = "Option::is_none")]
        customer_phone: Option<String>,

        /// Customer email
        #[serde(skip_serializing_if = "Option::is_none")]
        customer_email: Option<String>,

        /// Number of cart lines
        #[serde(skip_serializing_if = "Option::is_none")]
        total_items: Option<u64>,

        /// Server-side cart the lines came from, cleared once the order is fulfilled
        #[serde(skip_serializing_if = "Option::is_none")]
        cart_uuid: Option<String>,
    },

    /// Single track checkout
    Single {
        /// Track id
        track_id: TrackId,

        /// Customer display name
        #[serde(skip_serializing_if = "Option::is_none")]
        customer_name: Option<String>,

        /// Customer phone number
        #[serde(skip_serializing_if = "Option::is_none")]
        customer_phone: Option<String>,

        /// Customer email
        #[serde(skip_serializing_if = "Option::is_none")]
        customer_email: Option<String>,
    },
}

impl OrderMetadata {
    /// Metadata for a single track checkout.
    pub fn single(track_id: impl Into<TrackId>) -> Self {
        Self::Single {
            track_id: track_id.into(),
            customer_name: None,
            customer_phone: None,
            customer_email: None,
        }
    }

    /// Decode metadata as returned by the gateway.
    ///
    /// The gateway may return the object itself or a JSON-encoded string of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, matches neither shape, or
    /// carries an empty `items` list.
    pub fn decode(value: &Value) -> Result<Self, MetadataError> {
        let metadata = match value {
            Value::Null => return Err(MetadataError::Missing),
            Value::String(encoded) if encoded.trim().is_empty() => {
                return Err(MetadataError::Missing);
            }
            Value::String(encoded) => serde_json::from_str::<Self>(encoded),
            other => Self::deserialize(other),
        }
        .map_err(|_err| MetadataError::Unrecognized(value.to_string()))?;

        if matches!(&metadata, Self::Items { items, .. } if items.is_empty()) {
            return Err(MetadataError::NoItems);
        }

        Ok(metadata)
    }

    /// The track fulfilled for this payment: the first line of a cart
    /// checkout, or the single track.
    pub fn primary_track_id(&self) -> Option<&TrackId> {
        match self {
            Self::Items { items, .. } => items.first().map(|item| &item.track_id),
            Self::Single { track_id, .. } => Some(track_id),
        }
    }

    /// Server-side cart the payment was raised from.
    pub fn cart_uuid(&self) -> Option<&str> {
        match self {
            Self::Items { cart_uuid, .. } => cart_uuid.as_deref(),
            Self::Single { .. } => None,
        }
    }

    /// Record the server-side cart; a single track checkout has none.
    pub fn set_cart_uuid(&mut self, uuid: impl Into<String>) {
        if let Self::Items { cart_uuid, .. } = self {
            *cart_uuid = Some(uuid.into());
        }
    }

    /// Cart lines; empty for a single track checkout.
    pub fn items(&self) -> &[MetadataItem] {
        match self {
            Self::Items { items, .. } => items,
            Self::Single { .. } => &[],
        }
    }

    /// Customer display name, if recorded.
    pub fn customer_name(&self) -> Option<&str> {
        match self {
            Self::Items { customer_name, .. } | Self::Single { customer_name, .. } => {
                customer_name.as_deref()
            }
        }
    }

    /// Customer email, if recorded.
    pub fn customer_email(&self) -> Option<&str> {
        match self {
            Self::Items { customer_email, .. } | Self::Single { customer_email, .. } => {
                customer_email.as_deref()
            }
        }
    }

    /// Record the customer email.
    pub fn set_customer_email(&mut self, email: impl Into<String>) {
        match self {
            Self::Items { customer_email, .. } | Self::Single { customer_email, .. } => {
                *customer_email = Some(email.into());
            }
        }
    }
}
