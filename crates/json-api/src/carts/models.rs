//! Cart Models

use beatstore::{
    cart::LineItem,
    money::{format_amount, major_units},
};
use beatstore_app::carts::models::CartSession;
use rust_decimal::prelude::ToPrimitive;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The lines in the cart
    pub items: Vec<LineItemResponse>,

    /// Whether the cart panel is open
    pub is_open: bool,

    /// Sum of line quantities
    pub item_count: u64,

    /// Total in major units
    pub total: f64,

    /// Total with its currency, e.g. "GHS 100.85"
    pub formatted_total: String,

    /// ISO 4217 currency code
    pub currency: String,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<CartSession> for CartResponse {
    fn from(session: CartSession) -> Self {
        let cart = &session.cart;
        let total = cart.total();

        CartResponse {
            uuid: session.uuid.into(),
            items: cart.items().iter().map(LineItemResponse::from).collect(),
            is_open: cart.is_open(),
            item_count: cart.item_count(),
            total: major_units(&total).to_f64().unwrap_or_default(),
            formatted_total: format_amount(&total),
            currency: cart.currency().iso_alpha_code.to_string(),
            created_at: session.created_at.to_string(),
            updated_at: session.updated_at.to_string(),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LineItemResponse {
    /// Track id
    pub track_id: String,

    /// Track title
    pub track_title: String,

    /// License the track is bought under
    pub license_type: String,

    /// Quantity
    pub quantity: u32,

    /// Unit price in major units, captured when the line was added
    pub unit_price: f64,

    /// Unit price times quantity in major units
    pub subtotal: f64,
}

impl From<&LineItem> for LineItemResponse {
    fn from(line: &LineItem) -> Self {
        Self {
            track_id: line.track.id.to_string(),
            track_title: line.track.title.clone(),
            license_type: line.license.to_string(),
            quantity: line.quantity,
            unit_price: major_units(&line.track.price).to_f64().unwrap_or_default(),
            subtotal: major_units(&line.subtotal()).to_f64().unwrap_or_default(),
        }
    }
}
