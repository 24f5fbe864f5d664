//! Order Models

use beatstore::tracks::TrackId;
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

/// Provider label recorded on every order.
pub const PAYMENT_PROVIDER: &str = "Paystack";

/// Id the content store assigned to an order.
pub type OrderId = String;

/// Order document as stored in the content store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(rename = "_type")]
    pub kind: &'static str,

    pub customer_name: String,
    pub customer_email: String,
    pub beat: TrackReference,
    pub download_link: String,
    pub payment_status: PaymentStatus,
    pub transaction_id: String,
    pub currency: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    pub payment_provider: &'static str,
    pub purchase_date: Timestamp,
}

impl NewOrder {
    /// A completed order for `track`, purchased now.
    #[must_use]
    pub fn completed(
        track: TrackId,
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        download_link: impl Into<String>,
        transaction_id: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            kind: "order",
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            beat: TrackReference::new(track),
            download_link: download_link.into(),
            payment_status: PaymentStatus::Completed,
            transaction_id: transaction_id.into(),
            currency: currency.into(),
            amount,
            payment_provider: PAYMENT_PROVIDER,
            purchase_date: Timestamp::now(),
        }
    }
}

/// Weak reference from an order to the purchased track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackReference {
    #[serde(rename = "_type")]
    pub kind: &'static str,

    #[serde(rename = "_ref")]
    pub id: TrackId,
}

impl TrackReference {
    #[must_use]
    pub fn new(id: TrackId) -> Self {
        Self {
            kind: "reference",
            id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn serializes_as_order_document() -> TestResult {
        let mut order = NewOrder::completed(
            TrackId::new("beat-midnight-drill"),
            "Ama Mensah",
            "ama@example.com",
            "https://cdn.example.com/midnight.wav",
            "bb_1_abc",
            Decimal::from_str("39.95")?,
            "GHS",
        );

        order.purchase_date = Timestamp::from_str("2026-01-02T03:04:05Z")?;

        let value = serde_json::to_value(&order)?;

        assert_eq!(
            value,
            json!({
                "_type": "order",
                "customerName": "Ama Mensah",
                "customerEmail": "ama@example.com",
                "beat": { "_type": "reference", "_ref": "beat-midnight-drill" },
                "downloadLink": "https://cdn.example.com/midnight.wav",
                "paymentStatus": "completed",
                "transactionId": "bb_1_abc",
                "currency": "GHS",
                "amount": 39.95,
                "paymentProvider": "Paystack",
                "purchaseDate": "2026-01-02T03:04:05Z"
            })
        );

        Ok(())
    }
}
