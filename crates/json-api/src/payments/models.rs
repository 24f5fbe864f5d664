//! Payment Models

use rust_decimal::prelude::ToPrimitive;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use beatstore_app::payments::models::{InitializedPayment, VerifiedPayment};

use crate::checkout::FulfillmentResponse;

/// Initialize Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InitializeResponse {
    /// Always `true` on success
    pub status: bool,

    pub data: InitializedPaymentResponse,
}

impl From<InitializedPayment> for InitializeResponse {
    fn from(payment: InitializedPayment) -> Self {
        Self {
            status: true,
            data: InitializedPaymentResponse {
                authorization_url: payment.authorization_url,
                access_code: payment.access_code,
                reference: payment.reference,
            },
        }
    }
}

/// Where to send the customer to pay
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InitializedPaymentResponse {
    /// Gateway hosted payment page
    pub authorization_url: String,

    pub access_code: String,

    /// Server generated transaction reference
    pub reference: String,
}

/// Verify Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyResponse {
    /// Always `true` on success
    pub status: bool,

    pub data: VerifiedPaymentResponse,
}

impl From<VerifiedPayment> for VerifyResponse {
    fn from(payment: VerifiedPayment) -> Self {
        Self {
            status: true,
            data: payment.into(),
        }
    }
}

/// A verified payment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifiedPaymentResponse {
    pub reference: String,

    /// Amount paid in major units
    pub amount: f64,

    /// Gateway transaction status, `success` once paid
    pub status: String,

    pub paid_at: Option<String>,

    pub customer: Value,

    pub metadata: Value,
}

impl From<VerifiedPayment> for VerifiedPaymentResponse {
    fn from(payment: VerifiedPayment) -> Self {
        Self {
            reference: payment.reference,
            amount: payment.amount.to_f64().unwrap_or_default(),
            status: payment.status,
            paid_at: payment.paid_at,
            customer: payment.customer,
            metadata: payment.metadata,
        }
    }
}

/// Payment Callback Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CallbackResponse {
    /// Always `true` on success
    pub status: bool,

    pub data: CompletionResponse,
}

/// A verified payment and its fulfillment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CompletionResponse {
    pub payment: VerifiedPaymentResponse,

    /// Present once the payment succeeded and the order was delivered
    pub fulfillment: Option<FulfillmentResponse>,
}
