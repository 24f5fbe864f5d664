//! Checkout Models

use crate::{fulfillment::FulfillmentReceipt, payments::models::VerifiedPayment};

/// A verified payment and, once it succeeded, its fulfillment.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub payment: VerifiedPayment,
    pub fulfillment: Option<FulfillmentReceipt>,
}
