//! Fulfillment Models

use beatstore::tracks::TrackId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::orders::OrderId;

/// A paid purchase to deliver.
#[derive(Debug, Clone, PartialEq)]
pub struct FulfillmentRequest {
    pub track_id: TrackId,
    pub customer_name: String,
    pub customer_email: String,
    pub transaction_id: String,

    /// Amount paid in major units
    pub amount: Decimal,

    pub currency: String,
}

/// Outcome of a delivered purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentReceipt {
    pub order_id: OrderId,
    pub track_title: String,
    pub download_url: String,

    /// Whether the confirmation email went out; the order stands either way
    pub email_sent: bool,
}
