//! Checkout Models

use beatstore::metadata::OrderMetadata;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use beatstore_app::fulfillment::FulfillmentReceipt;

/// Checkout Request
///
/// Accepts the store's own field names as well as the shape of a gateway
/// transaction payload; the store's names win when both are present.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutRequest {
    pub beat_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub transaction_id: Option<String>,

    /// Amount paid in major units
    pub amount: Option<f64>,

    pub currency: Option<String>,

    /// Gateway order metadata
    pub metadata: Option<Value>,

    /// Gateway customer record
    pub customer: Option<CheckoutCustomer>,

    /// Gateway transaction reference
    pub reference: Option<String>,

    /// Gateway transaction data
    pub data: Option<CheckoutData>,
}

/// Customer fields of a gateway payload
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutCustomer {
    pub customer_name: Option<String>,
    pub email: Option<String>,
}

/// Transaction fields of a gateway payload
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutData {
    pub amount: Option<f64>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl CheckoutRequest {
    /// Track bought: `beatId`, else the track the metadata names.
    pub(crate) fn track_id(&self) -> Option<String> {
        present(self.beat_id.clone()).or_else(|| {
            let metadata = OrderMetadata::decode(self.metadata.as_ref()?).ok()?;

            present(metadata.primary_track_id().map(ToString::to_string))
        })
    }

    pub(crate) fn customer_email(&self) -> Option<String> {
        present(self.customer_email.clone()).or_else(|| {
            present(
                self.customer
                    .as_ref()
                    .and_then(|customer| customer.email.clone()),
            )
        })
    }

    pub(crate) fn customer_name(&self) -> Option<String> {
        present(self.customer_name.clone()).or_else(|| {
            present(
                self.customer
                    .as_ref()
                    .and_then(|customer| customer.customer_name.clone()),
            )
        })
    }

    pub(crate) fn transaction_id(&self) -> Option<String> {
        present(self.transaction_id.clone()).or_else(|| present(self.reference.clone()))
    }

    /// Amount paid; zero when neither `amount` nor `data.amount` is set.
    pub(crate) fn amount(&self) -> f64 {
        self.amount
            .filter(|amount| amount.abs() > f64::EPSILON)
            .or_else(|| self.data.as_ref().and_then(|data| data.amount))
            .unwrap_or_default()
    }
}

/// Checkout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    pub success: bool,
    pub message: String,
    pub data: FulfillmentResponse,
}

/// A delivered order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FulfillmentResponse {
    /// Order id assigned by the content store
    pub order_id: String,

    pub beat_title: String,

    /// Full quality audio for the customer to keep
    pub download_url: String,

    /// Whether the confirmation email went out
    pub email_sent: bool,
}

impl From<FulfillmentReceipt> for FulfillmentResponse {
    fn from(receipt: FulfillmentReceipt) -> Self {
        Self {
            order_id: receipt.order_id,
            beat_title: receipt.track_title,
            download_url: receipt.download_url,
            email_sent: receipt.email_sent,
        }
    }
}

/// Checkout Status Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutStatusResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}
