//! Payments service.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use beatstore::{
    money::{from_minor_units, positive_minor_units},
    payments::PaymentState,
};
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::payments::{
    errors::{GatewayError, PaymentsServiceError},
    gateway::{InitializeTransaction, PaymentGateway},
    models::{InitializePayment, InitializedPayment, VerifiedPayment},
    references::generate_reference,
};

/// Settings shared by every payment.
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// Currency every payment is charged in
    pub currency: &'static Currency,

    /// Where the gateway sends the customer after paying
    pub callback_url: String,

    /// Store name recorded in the gateway's custom fields
    pub store_name: String,
}

/// How long an attempt is tracked after its last state change.
pub const ATTEMPT_RETENTION: SignedDuration = SignedDuration::from_hours(24);

#[derive(Debug, Clone)]
struct Attempt {
    state: PaymentState,
    updated_at: Timestamp,
}

/// Orchestrates payments against the gateway and tracks each attempt's state.
///
/// Without a gateway every operation fails with `NotConfigured`. Attempts
/// untouched for longer than the retention are forgotten and read as `Idle`.
pub struct GatewayPaymentsService {
    gateway: Option<Arc<dyn PaymentGateway>>,
    config: PaymentsConfig,
    retention: SignedDuration,
    attempts: Mutex<FxHashMap<String, Attempt>>,
}

impl std::fmt::Debug for GatewayPaymentsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayPaymentsService")
            .field("configured", &self.gateway.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GatewayPaymentsService {
    #[must_use]
    pub fn new(gateway: Option<Arc<dyn PaymentGateway>>, config: PaymentsConfig) -> Self {
        Self {
            gateway,
            config,
            retention: ATTEMPT_RETENTION,
            attempts: Mutex::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn with_retention(mut self, retention: SignedDuration) -> Self {
        self.retention = retention;
        self
    }

    fn gateway(&self) -> Result<&dyn PaymentGateway, PaymentsServiceError> {
        self.gateway
            .as_deref()
            .ok_or(PaymentsServiceError::NotConfigured)
    }

    fn attempts(&self) -> MutexGuard<'_, FxHashMap<String, Attempt>> {
        self.attempts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current(&self, reference: &str) -> Option<PaymentState> {
        self.attempts()
            .get(reference)
            .map(|attempt| attempt.state.clone())
    }

    /// Store a state, dropping attempts that outlived the retention.
    fn store(
        &self,
        attempts: &mut FxHashMap<String, Attempt>,
        reference: &str,
        state: PaymentState,
    ) {
        let now = Timestamp::now();

        evict_before(attempts, now, self.retention);

        attempts.insert(
            reference.to_string(),
            Attempt {
                state,
                updated_at: now,
            },
        );
    }

    fn record(&self, reference: &str, state: PaymentState) {
        debug!(reference, state = state.name(), "payment state changed");

        let mut attempts = self.attempts();

        self.store(&mut attempts, reference, state);
    }

    /// Forget attempts last changed more than the retention before `now`.
    fn evict_expired(&self, now: Timestamp) -> usize {
        evict_before(&mut self.attempts(), now, self.retention)
    }

    /// Move a tracked attempt to failed, leaving it alone if it cannot fail.
    fn record_failure(&self, reference: &str, reason: &str) {
        let mut attempts = self.attempts();

        let Some(current) = attempts.get(reference) else {
            return;
        };

        match current.state.fail(reason) {
            Ok(failed) => {
                debug!(reference, reason, "payment failed");
                self.store(&mut attempts, reference, failed);
            }
            Err(error) => warn!(reference, %error, "payment failure not recorded"),
        }
    }

    /// Enter `Verifying`, returning whether this call made the transition.
    fn begin_verify(&self, reference: &str) -> bool {
        let mut attempts = self.attempts();
        let current = attempts
            .get(reference)
            .map(|attempt| attempt.state.clone())
            .unwrap_or_default();

        match current.begin_verify() {
            Ok(next) => {
                self.store(&mut attempts, reference, next);
                true
            }
            Err(_) => false,
        }
    }

    fn finish_verify(&self, reference: &str) -> Result<bool, PaymentsServiceError> {
        let mut attempts = self.attempts();

        let Some(current) = attempts.get(reference) else {
            return Ok(false);
        };

        let succeeded = current.state.succeed()?;

        self.store(&mut attempts, reference, succeeded);

        Ok(true)
    }

    fn fail_initialize(&self, reference: &str, error: PaymentsServiceError) -> PaymentsServiceError {
        self.record_failure(reference, &error.to_string());

        error
    }

    fn fail_verify(
        &self,
        reference: &str,
        transitioned: bool,
        error: PaymentsServiceError,
    ) -> PaymentsServiceError {
        if transitioned {
            self.record_failure(reference, &error.to_string());
        }

        error
    }
}

fn evict_before(
    attempts: &mut FxHashMap<String, Attempt>,
    now: Timestamp,
    retention: SignedDuration,
) -> usize {
    let Ok(cutoff) = now.checked_sub(retention) else {
        return 0;
    };

    let before = attempts.len();

    attempts.retain(|_, attempt| attempt.updated_at >= cutoff);

    let evicted = before - attempts.len();

    if evicted > 0 {
        debug!(evicted, "evicted expired payment attempts");
    }

    evicted
}

/// Gateway references are ASCII alphanumerics plus `-`, `_` and `.`.
fn is_reference(reference: &str) -> bool {
    reference
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Metadata sent to the gateway: the caller's fields plus the customer email,
/// a `track_id` key and the store's custom fields.
fn augment_metadata(
    metadata: Value,
    email: &str,
    store_name: &str,
) -> Result<Value, PaymentsServiceError> {
    let mut map = match metadata {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => {
            return Err(PaymentsServiceError::Validation(
                "metadata must be an object".to_string(),
            ));
        }
    };

    let track_id = map
        .get("track_id")
        .filter(|value| value.as_str().is_some_and(|id| !id.is_empty()))
        .cloned()
        .unwrap_or(Value::Null);

    map.insert("track_id".to_string(), track_id);
    map.insert("customer_email".to_string(), Value::from(email));
    map.insert(
        "custom_fields".to_string(),
        json!([
            {
                "display_name": "Order Type",
                "variable_name": "order_type",
                "value": "Beat Purchase"
            },
            {
                "display_name": "Platform",
                "variable_name": "platform",
                "value": store_name
            }
        ]),
    );

    Ok(Value::Object(map))
}

#[async_trait]
impl PaymentsService for GatewayPaymentsService {
    #[tracing::instrument(
        name = "payments.service.initialize",
        skip(self, payment),
        fields(reference = tracing::field::Empty),
        err
    )]
    async fn initialize(
        &self,
        payment: InitializePayment,
    ) -> Result<InitializedPayment, PaymentsServiceError> {
        let gateway = self.gateway()?;

        let email = payment.email.trim();

        if email.is_empty() {
            return Err(PaymentsServiceError::Validation(
                "email is required".to_string(),
            ));
        }

        let amount = positive_minor_units(payment.amount)
            .map_err(|error| PaymentsServiceError::Validation(error.to_string()))?;

        let metadata = augment_metadata(payment.metadata, email, &self.config.store_name)?;
        let reference = generate_reference(Timestamp::now(), &mut rand::thread_rng());

        tracing::Span::current().record("reference", reference.as_str());

        self.record(&reference, PaymentState::Idle.begin_initialize()?);

        let request = InitializeTransaction {
            email: email.to_string(),
            amount,
            currency: self.config.currency.iso_alpha_code.to_string(),
            reference: reference.clone(),
            callback_url: self.config.callback_url.clone(),
            metadata,
        };

        let response = gateway
            .initialize(request)
            .await
            .map_err(|error| self.fail_initialize(&reference, error.into()))?;

        if !response.status {
            return Err(self.fail_initialize(
                &reference,
                PaymentsServiceError::Rejected(response.message),
            ));
        }

        let data = response.data.ok_or_else(|| {
            self.fail_initialize(
                &reference,
                GatewayError::UnexpectedResponse("initialization returned no data".to_string())
                    .into(),
            )
        })?;

        let awaiting = PaymentState::Initializing.await_redirect(&data.authorization_url)?;

        self.record(&reference, awaiting);

        info!(amount, "payment initialized");

        Ok(InitializedPayment {
            authorization_url: data.authorization_url,
            access_code: data.access_code,
            reference,
        })
    }

    #[tracing::instrument(name = "payments.service.verify", skip(self), err)]
    async fn verify(&self, reference: &str) -> Result<VerifiedPayment, PaymentsServiceError> {
        let gateway = self.gateway()?;
        let reference = reference.trim();

        if reference.is_empty() {
            return Err(PaymentsServiceError::Validation(
                "reference is required".to_string(),
            ));
        }

        if !is_reference(reference) {
            return Err(PaymentsServiceError::Validation(format!(
                "invalid payment reference: {reference}"
            )));
        }

        let transitioned = self.begin_verify(reference);

        let response = gateway
            .verify(reference)
            .await
            .map_err(|error| self.fail_verify(reference, transitioned, error.into()))?;

        if !response.status {
            return Err(self.fail_verify(
                reference,
                transitioned,
                PaymentsServiceError::Rejected(response.message),
            ));
        }

        let data = response.data.ok_or_else(|| {
            self.fail_verify(
                reference,
                transitioned,
                GatewayError::UnexpectedResponse("verification returned no data".to_string())
                    .into(),
            )
        })?;

        let mut verified = VerifiedPayment {
            reference: data.reference,
            amount: from_minor_units(data.amount),
            currency: data.currency,
            status: data.status,
            paid_at: data.paid_at,
            customer: data.customer,
            metadata: data.metadata,
            first_success: false,
        };

        if !transitioned {
            return Ok(verified);
        }

        if verified.is_successful() {
            verified.first_success = self.finish_verify(reference)?;

            info!(status = %verified.status, "payment verified");
        } else {
            self.record_failure(reference, &verified.status);

            warn!(status = %verified.status, "payment not successful");
        }

        Ok(verified)
    }

    async fn state(&self, reference: &str) -> PaymentState {
        self.current(reference).unwrap_or_default()
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Start a payment and return where to send the customer.
    async fn initialize(
        &self,
        payment: InitializePayment,
    ) -> Result<InitializedPayment, PaymentsServiceError>;

    /// Confirm a payment with the gateway.
    async fn verify(&self, reference: &str) -> Result<VerifiedPayment, PaymentsServiceError>;

    /// Current state of a payment; `Idle` when unknown.
    async fn state(&self, reference: &str) -> PaymentState;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use rusty_money::iso::GHS;
    use testresult::TestResult;

    use super::*;
    use crate::payments::gateway::{
        AuthorizationData, GatewayResponse, MockPaymentGateway, TransactionData,
    };

    fn config() -> PaymentsConfig {
        PaymentsConfig {
            currency: GHS,
            callback_url: "http://localhost:3000/payment/callback".to_string(),
            store_name: "BlingBeats".to_string(),
        }
    }

    fn service(gateway: MockPaymentGateway) -> GatewayPaymentsService {
        GatewayPaymentsService::new(Some(Arc::new(gateway)), config())
    }

    fn payment(amount: &str) -> TestResult<InitializePayment> {
        Ok(InitializePayment {
            email: "ama@example.com".to_string(),
            amount: Decimal::from_str(amount)?,
            metadata: json!({ "track_id": "beat-1", "customer_name": "Ama" }),
        })
    }

    fn authorized() -> GatewayResponse<AuthorizationData> {
        GatewayResponse {
            status: true,
            message: "Authorization URL created".to_string(),
            data: Some(AuthorizationData {
                authorization_url: "https://checkout.example.com/xyz".to_string(),
                access_code: "xyz".to_string(),
                reference: "ignored".to_string(),
            }),
        }
    }

    fn transaction(status: &str) -> GatewayResponse<TransactionData> {
        GatewayResponse {
            status: true,
            message: "Verification successful".to_string(),
            data: Some(TransactionData {
                reference: "bb_1_abc".to_string(),
                amount: 3995,
                currency: Some("GHS".to_string()),
                status: status.to_string(),
                paid_at: None,
                customer: json!({ "email": "ama@example.com" }),
                metadata: json!({ "track_id": "beat-1" }),
            }),
        }
    }

    #[tokio::test]
    async fn initialize_without_gateway_is_not_configured() -> TestResult {
        let payments = GatewayPaymentsService::new(None, config());

        let result = payments.initialize(payment("39.95")?).await;

        assert!(matches!(result, Err(PaymentsServiceError::NotConfigured)));

        Ok(())
    }

    #[tokio::test]
    async fn initialize_scales_amount_once_and_augments_metadata() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_initialize()
            .once()
            .withf(|request| {
                request.amount == 3995
                    && request.currency == "GHS"
                    && request.reference.starts_with("bb_")
                    && request.callback_url == "http://localhost:3000/payment/callback"
                    && request.metadata["customer_email"] == "ama@example.com"
                    && request.metadata["track_id"] == "beat-1"
                    && request.metadata["customer_name"] == "Ama"
                    && request.metadata["custom_fields"][1]["value"] == "BlingBeats"
            })
            .return_once(|_| Ok(authorized()));

        let payments = service(gateway);

        let initialized = payments.initialize(payment("39.95")?).await?;

        assert_eq!(initialized.authorization_url, "https://checkout.example.com/xyz");
        assert!(initialized.reference.starts_with("bb_"));
        assert_eq!(
            payments.state(&initialized.reference).await,
            PaymentState::AwaitingGatewayRedirect {
                authorization_url: "https://checkout.example.com/xyz".to_string(),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn initialize_rejects_non_positive_amount() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_initialize().never();

        let payments = service(gateway);

        let result = payments.initialize(payment("0")?).await;

        assert!(matches!(result, Err(PaymentsServiceError::Validation(_))));

        Ok(())
    }

    #[tokio::test]
    async fn initialize_rejects_amount_below_one_minor_unit() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_initialize().never();

        let payments = service(gateway);

        let result = payments.initialize(payment("0.004")?).await;

        assert!(matches!(result, Err(PaymentsServiceError::Validation(_))));

        Ok(())
    }

    #[tokio::test]
    async fn initialize_rounds_midpoint_up() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_initialize()
            .once()
            .withf(|request| request.amount == 1013)
            .return_once(|_| Ok(authorized()));

        let payments = service(gateway);

        payments.initialize(payment("10.125")?).await?;

        Ok(())
    }

    #[tokio::test]
    async fn initialize_rejects_blank_email() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_initialize().never();

        let payments = service(gateway);
        let mut request = payment("10")?;
        request.email = "  ".to_string();

        let result = payments.initialize(request).await;

        assert!(matches!(result, Err(PaymentsServiceError::Validation(_))));

        Ok(())
    }

    #[tokio::test]
    async fn gateway_rejection_surfaces_message() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_initialize().once().return_once(|_| {
            Ok(GatewayResponse {
                status: false,
                message: "Invalid key".to_string(),
                data: None,
            })
        });

        let payments = service(gateway);

        let result = payments.initialize(payment("39.95")?).await;

        assert!(matches!(result, Err(PaymentsServiceError::Rejected(message)) if message == "Invalid key"));

        Ok(())
    }

    #[tokio::test]
    async fn verify_converts_amount_back_and_reports_first_success() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_verify()
            .times(2)
            .withf(|reference| reference == "bb_1_abc")
            .returning(|_| Ok(transaction("success")));

        let payments = service(gateway);

        let first = payments.verify("bb_1_abc").await?;
        let second = payments.verify("bb_1_abc").await?;

        assert_eq!(first.amount, Decimal::from_str("39.95")?);
        assert!(first.first_success);
        assert!(!second.first_success);
        assert!(second.is_successful());
        assert_eq!(payments.state("bb_1_abc").await, PaymentState::Succeeded);

        Ok(())
    }

    #[tokio::test]
    async fn verify_status_false_marks_failed() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_verify().once().return_once(|_| {
            Ok(GatewayResponse {
                status: false,
                message: "Transaction reference not found".to_string(),
                data: None,
            })
        });

        let payments = service(gateway);

        let result = payments.verify("bb_1_missing").await;

        assert!(matches!(result, Err(PaymentsServiceError::Rejected(_))));
        assert!(matches!(
            payments.state("bb_1_missing").await,
            PaymentState::Failed { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn abandoned_transaction_is_not_a_success() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_verify()
            .once()
            .return_once(|_| Ok(transaction("abandoned")));

        let payments = service(gateway);

        let verified = payments.verify("bb_1_abc").await?;

        assert!(!verified.is_successful());
        assert!(!verified.first_success);
        assert_eq!(
            payments.state("bb_1_abc").await,
            PaymentState::Failed {
                reason: "abandoned".to_string(),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn verify_requires_reference() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_verify().never();

        let payments = service(gateway);

        assert!(matches!(
            payments.verify(" ").await,
            Err(PaymentsServiceError::Validation(_))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn verify_rejects_references_with_path_characters() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_verify().never();

        let payments = service(gateway);

        for reference in ["../../customer", "bb_1_abc/../x", "bb_1?perPage=100", "bb 1"] {
            let result = payments.verify(reference).await;

            assert!(
                matches!(result, Err(PaymentsServiceError::Validation(_))),
                "{reference} should be rejected"
            );
            assert_eq!(payments.state(reference).await, PaymentState::Idle);
        }

        Ok(())
    }

    #[tokio::test]
    async fn settled_attempts_are_evicted_after_retention() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_initialize()
            .times(2)
            .returning(|_| Ok(authorized()));
        gateway
            .expect_verify()
            .once()
            .return_once(|_| Ok(transaction("success")));

        let payments = service(gateway).with_retention(SignedDuration::from_hours(1));

        payments.initialize(payment("39.95")?).await?;
        payments.initialize(payment("20.95")?).await?;
        payments.verify("bb_1_abc").await?;

        assert_eq!(payments.attempts().len(), 3);
        assert_eq!(payments.evict_expired(Timestamp::now()), 0);

        let later = Timestamp::now().checked_add(SignedDuration::from_hours(2))?;

        assert_eq!(payments.evict_expired(later), 3);
        assert!(payments.attempts().is_empty());
        assert_eq!(payments.state("bb_1_abc").await, PaymentState::Idle);

        Ok(())
    }

    #[test]
    fn generated_references_are_accepted() {
        let reference = generate_reference(Timestamp::UNIX_EPOCH, &mut rand::thread_rng());

        assert!(is_reference(&reference), "{reference} should be accepted");
        assert!(is_reference("T123-abc.9"));
    }

    #[test]
    fn metadata_must_be_an_object() {
        let result = augment_metadata(json!([1, 2]), "a@example.com", "BlingBeats");

        assert!(matches!(result, Err(PaymentsServiceError::Validation(_))));
    }

    #[test]
    fn null_metadata_gets_null_track_id() -> TestResult {
        let metadata = augment_metadata(Value::Null, "a@example.com", "BlingBeats")?;

        assert_eq!(metadata["track_id"], Value::Null);
        assert_eq!(metadata["custom_fields"][0]["value"], "Beat Purchase");

        Ok(())
    }
}
