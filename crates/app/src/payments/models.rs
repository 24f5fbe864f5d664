//! Payment Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to start a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct InitializePayment {
    /// Customer email the gateway sends its receipt to
    pub email: String,

    /// Amount in major units
    pub amount: Decimal,

    /// Caller metadata; must be an object or null
    pub metadata: Value,
}

/// A started payment awaiting the customer on the gateway's page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializedPayment {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// A verified payment, amounts back in major units.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedPayment {
    pub reference: String,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub status: String,
    pub paid_at: Option<String>,
    pub customer: Value,
    pub metadata: Value,

    /// Whether this call moved the payment to succeeded
    pub first_success: bool,
}

impl VerifiedPayment {
    /// Whether the gateway reports the transaction as paid.
    pub fn is_successful(&self) -> bool {
        self.status == "success"
    }
}
