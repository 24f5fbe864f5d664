//! Checkout service.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use beatstore::metadata::{MetadataError, OrderMetadata};
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    carts::{CartsService, CartsServiceError, models::CartUuid},
    checkout::{errors::CheckoutError, models::Completion},
    fulfillment::{FulfillmentReceipt, FulfillmentRequest, FulfillmentService},
    payments::{PaymentsService, models::VerifiedPayment},
};

type FulfillmentSlot = Arc<tokio::sync::Mutex<Option<FulfillmentReceipt>>>;

/// How long a transaction's receipt is kept for repeated callbacks.
pub const RECEIPT_RETENTION: SignedDuration = SignedDuration::from_hours(24);

#[derive(Debug)]
struct SlotEntry {
    slot: FulfillmentSlot,
    touched_at: Timestamp,
}

/// Completes paid checkouts, fulfilling each transaction at most once.
///
/// Each transaction id has a slot that is locked for the whole fulfillment,
/// so concurrent callbacks for one payment wait for the first and reuse its
/// receipt. A failed fulfillment leaves the slot empty for a retry. Slots
/// nobody holds are dropped once untouched for longer than the retention.
pub struct StoreCheckoutService {
    payments: Arc<dyn PaymentsService>,
    fulfillment: Arc<dyn FulfillmentService>,
    carts: Arc<dyn CartsService>,
    currency: &'static Currency,
    retention: SignedDuration,
    slots: Mutex<FxHashMap<String, SlotEntry>>,
}

impl std::fmt::Debug for StoreCheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCheckoutService")
            .field("currency", &self.currency.iso_alpha_code)
            .finish_non_exhaustive()
    }
}

impl StoreCheckoutService {
    #[must_use]
    pub fn new(
        payments: Arc<dyn PaymentsService>,
        fulfillment: Arc<dyn FulfillmentService>,
        carts: Arc<dyn CartsService>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            payments,
            fulfillment,
            carts,
            currency,
            retention: RECEIPT_RETENTION,
            slots: Mutex::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn with_retention(mut self, retention: SignedDuration) -> Self {
        self.retention = retention;
        self
    }

    fn slot(&self, transaction_id: &str) -> FulfillmentSlot {
        let now = Timestamp::now();
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        evict_idle_slots(&mut slots, now, self.retention);

        let entry = slots
            .entry(transaction_id.to_string())
            .or_insert_with(|| SlotEntry {
                slot: FulfillmentSlot::default(),
                touched_at: now,
            });

        entry.touched_at = now;
        entry.slot.clone()
    }

    /// Drop slots untouched for longer than the retention before `now`.
    fn evict_expired(&self, now: Timestamp) -> usize {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        evict_idle_slots(&mut slots, now, self.retention)
    }

    /// Fulfil unless this transaction already was, returning whether it ran now.
    async fn fulfil_once(
        &self,
        request: FulfillmentRequest,
    ) -> Result<(FulfillmentReceipt, bool), CheckoutError> {
        let slot = self.slot(&request.transaction_id);
        let mut fulfilled = slot.lock().await;

        if let Some(receipt) = fulfilled.as_ref() {
            debug!(transaction_id = %request.transaction_id, "already fulfilled");

            return Ok((receipt.clone(), false));
        }

        let receipt = self.fulfillment.fulfil(request).await?;

        *fulfilled = Some(receipt.clone());

        Ok((receipt, true))
    }

    async fn clear_cart(&self, metadata: &OrderMetadata) {
        let Some(uuid) = metadata
            .cart_uuid()
            .and_then(|uuid| uuid.parse::<CartUuid>().ok())
        else {
            return;
        };

        match self.carts.clear_cart(uuid).await {
            Ok(_) => debug!(cart = %uuid, "cleared cart after checkout"),
            Err(CartsServiceError::NotFound) => {}
            Err(error) => warn!(cart = %uuid, %error, "failed to clear cart after checkout"),
        }
    }

    fn fulfillment_request(
        &self,
        payment: &VerifiedPayment,
        metadata: &OrderMetadata,
    ) -> Result<FulfillmentRequest, CheckoutError> {
        let track_id = metadata
            .primary_track_id()
            .cloned()
            .ok_or(MetadataError::NoItems)?;

        let customer_email = metadata
            .customer_email()
            .map(str::to_string)
            .or_else(|| customer_field(&payment.customer, "email"))
            .ok_or(CheckoutError::MissingCustomerEmail)?;

        let customer_name = metadata
            .customer_name()
            .map(str::to_string)
            .or_else(|| customer_field(&payment.customer, "customer_name"))
            .unwrap_or_else(|| customer_email.clone());

        Ok(FulfillmentRequest {
            track_id,
            customer_name,
            customer_email,
            transaction_id: payment.reference.clone(),
            amount: payment.amount,
            currency: payment
                .currency
                .clone()
                .unwrap_or_else(|| self.currency.iso_alpha_code.to_string()),
        })
    }
}

/// Slots still held by an in-flight fulfillment are kept whatever their age.
fn evict_idle_slots(
    slots: &mut FxHashMap<String, SlotEntry>,
    now: Timestamp,
    retention: SignedDuration,
) -> usize {
    let Ok(cutoff) = now.checked_sub(retention) else {
        return 0;
    };

    let before = slots.len();

    slots.retain(|_, entry| entry.touched_at >= cutoff || Arc::strong_count(&entry.slot) > 1);

    let evicted = before - slots.len();

    if evicted > 0 {
        debug!(evicted, "evicted expired fulfillment slots");
    }

    evicted
}

fn customer_field(customer: &Value, field: &str) -> Option<String> {
    customer
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

#[async_trait]
impl CheckoutService for StoreCheckoutService {
    #[tracing::instrument(name = "checkout.service.complete", skip(self), err)]
    async fn complete(&self, reference: &str) -> Result<Completion, CheckoutError> {
        let payment = self.payments.verify(reference).await?;

        if !payment.is_successful() {
            info!(status = %payment.status, "payment not successful, nothing to fulfil");

            return Ok(Completion {
                payment,
                fulfillment: None,
            });
        }

        let metadata = OrderMetadata::decode(&payment.metadata)?;
        let request = self.fulfillment_request(&payment, &metadata)?;

        let (receipt, fulfilled_now) = self.fulfil_once(request).await?;

        if fulfilled_now {
            self.clear_cart(&metadata).await;
        }

        Ok(Completion {
            payment,
            fulfillment: Some(receipt),
        })
    }

    #[tracing::instrument(
        name = "checkout.service.fulfil",
        skip(self, request),
        fields(transaction_id = %request.transaction_id),
        err
    )]
    async fn fulfil(
        &self,
        request: FulfillmentRequest,
    ) -> Result<FulfillmentReceipt, CheckoutError> {
        let (receipt, _) = self.fulfil_once(request).await?;

        Ok(receipt)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Verify a payment and fulfil it the first time it is seen to succeed.
    async fn complete(&self, reference: &str) -> Result<Completion, CheckoutError>;

    /// Fulfil a purchase the caller has already confirmed, once per transaction id.
    async fn fulfil(
        &self,
        request: FulfillmentRequest,
    ) -> Result<FulfillmentReceipt, CheckoutError>;
}
