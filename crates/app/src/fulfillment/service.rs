//! Fulfillment service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    catalog::CatalogService,
    fulfillment::{
        errors::FulfillmentError,
        models::{FulfillmentReceipt, FulfillmentRequest},
    },
    mail::{Mailer, PurchaseConfirmation, purchase_confirmation},
    orders::{NewOrder, OrdersService},
};

/// Records the order in the content store and emails the download link.
pub struct StoreFulfillmentService {
    catalog: Arc<dyn CatalogService>,
    orders: Arc<dyn OrdersService>,
    mailer: Arc<dyn Mailer>,
    from: String,
}

impl std::fmt::Debug for StoreFulfillmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreFulfillmentService")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl StoreFulfillmentService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        orders: Arc<dyn OrdersService>,
        mailer: Arc<dyn Mailer>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            orders,
            mailer,
            from: from.into(),
        }
    }
}

fn validate(request: &FulfillmentRequest) -> Result<(), FulfillmentError> {
    if request.track_id.as_str().trim().is_empty()
        || request.customer_email.trim().is_empty()
        || request.transaction_id.trim().is_empty()
    {
        return Err(FulfillmentError::Validation(
            "Missing required fields: beatId, customerEmail, or transactionId".to_string(),
        ));
    }

    Ok(())
}

#[async_trait]
impl FulfillmentService for StoreFulfillmentService {
    #[tracing::instrument(
        name = "fulfillment.service.fulfil",
        skip(self, request),
        fields(track_id = %request.track_id, transaction_id = %request.transaction_id),
        err
    )]
    async fn fulfil(
        &self,
        request: FulfillmentRequest,
    ) -> Result<FulfillmentReceipt, FulfillmentError> {
        validate(&request)?;

        let track = self
            .catalog
            .get_track(request.track_id.as_str())
            .await?
            .ok_or_else(|| FulfillmentError::TrackNotFound(request.track_id.clone()))?;

        let download_url = track
            .audio_url
            .clone()
            .ok_or_else(|| FulfillmentError::MissingAudio(track.id.clone()))?;

        let order = NewOrder::completed(
            track.id.clone(),
            request.customer_name.clone(),
            request.customer_email.clone(),
            download_url.clone(),
            request.transaction_id.clone(),
            request.amount,
            request.currency.clone(),
        );

        let order_id = self.orders.create_order(order).await?;

        let amount = request.amount.to_string();

        let email = purchase_confirmation(
            &self.from,
            &PurchaseConfirmation {
                customer_name: &request.customer_name,
                customer_email: &request.customer_email,
                track_title: &track.title,
                artist: track.artist.as_deref(),
                cover_image_url: track.image_url.as_deref(),
                amount: &amount,
                currency: &request.currency,
                transaction_id: &request.transaction_id,
                download_url: &download_url,
            },
        );

        let email_sent = match self.mailer.send(email).await {
            Ok(_) => true,
            Err(error) => {
                warn!(%order_id, %error, "order created but email failed to send");
                false
            }
        };

        info!(%order_id, email_sent, "order fulfilled");

        Ok(FulfillmentReceipt {
            order_id,
            track_title: track.title,
            download_url,
            email_sent,
        })
    }
}

#[automock]
#[async_trait]
pub trait FulfillmentService: Send + Sync {
    /// Deliver a paid purchase.
    async fn fulfil(&self, request: FulfillmentRequest)
    -> Result<FulfillmentReceipt, FulfillmentError>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use beatstore::tracks::TrackId;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::{
        content::ContentStoreError,
        mail::{MailError, MockMailer},
        orders::{MockOrdersService, OrdersServiceError},
        test,
    };

    fn request(track_id: &str) -> TestResult<FulfillmentRequest> {
        Ok(FulfillmentRequest {
            track_id: TrackId::new(track_id),
            customer_name: "Ama".to_string(),
            customer_email: "ama@example.com".to_string(),
            transaction_id: "bb_1_abc".to_string(),
            amount: Decimal::from_str("39.95")?,
            currency: "GHS".to_string(),
        })
    }

    fn service(orders: MockOrdersService, mailer: MockMailer) -> StoreFulfillmentService {
        StoreFulfillmentService::new(
            test::catalog_service(),
            Arc::new(orders),
            Arc::new(mailer),
            "no-reply@blingbeats.com",
        )
    }

    #[tokio::test]
    async fn records_order_and_emails_download_link() -> TestResult {
        let mut orders = MockOrdersService::new();
        let mut mailer = MockMailer::new();

        orders
            .expect_create_order()
            .once()
            .withf(|order| {
                order.beat.id.as_str() == "beat-midnight-drill"
                    && order.transaction_id == "bb_1_abc"
                    && order.customer_email == "ama@example.com"
                    && order.currency == "GHS"
                    && order.payment_provider == "Paystack"
            })
            .return_once(|_| Ok("order-1".to_string()));

        mailer
            .expect_send()
            .once()
            .withf(|email| email.to == vec!["ama@example.com".to_string()])
            .return_once(|_| Ok("msg-1".to_string()));

        let receipt = service(orders, mailer)
            .fulfil(request("beat-midnight-drill")?)
            .await?;

        assert_eq!(receipt.order_id, "order-1");
        assert_eq!(receipt.track_title, "Midnight Drill");
        assert!(receipt.email_sent);
        assert!(receipt.download_url.ends_with("midnight-drill.mp3"));

        Ok(())
    }

    #[tokio::test]
    async fn email_failure_keeps_the_order() -> TestResult {
        let mut orders = MockOrdersService::new();
        let mut mailer = MockMailer::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_| Ok("order-2".to_string()));

        mailer
            .expect_send()
            .once()
            .return_once(|_| Err(MailError::Rejected("domain not verified".to_string())));

        let receipt = service(orders, mailer)
            .fulfil(request("beat-midnight-drill")?)
            .await?;

        assert_eq!(receipt.order_id, "order-2");
        assert!(!receipt.email_sent);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_track_creates_no_order() -> TestResult {
        let mut orders = MockOrdersService::new();
        let mut mailer = MockMailer::new();

        orders.expect_create_order().never();
        mailer.expect_send().never();

        let result = service(orders, mailer).fulfil(request("beat-missing")?).await;

        assert!(matches!(result, Err(FulfillmentError::TrackNotFound(id)) if id.as_str() == "beat-missing"));

        Ok(())
    }

    #[tokio::test]
    async fn track_without_audio_creates_no_order() -> TestResult {
        let mut orders = MockOrdersService::new();
        let mut mailer = MockMailer::new();

        orders.expect_create_order().never();
        mailer.expect_send().never();

        let result = service(orders, mailer).fulfil(request("beat-lofi-study")?).await;

        assert!(matches!(result, Err(FulfillmentError::MissingAudio(_))));

        Ok(())
    }

    #[tokio::test]
    async fn order_failure_is_reported() -> TestResult {
        let mut orders = MockOrdersService::new();
        let mut mailer = MockMailer::new();

        orders.expect_create_order().once().return_once(|_| {
            Err(OrdersServiceError::ContentStore(
                ContentStoreError::UnexpectedResponse("status 500".to_string()),
            ))
        });
        mailer.expect_send().never();

        let result = service(orders, mailer)
            .fulfil(request("beat-midnight-drill")?)
            .await;

        assert!(matches!(result, Err(FulfillmentError::Order(_))));

        Ok(())
    }

    #[tokio::test]
    async fn missing_transaction_id_is_rejected() -> TestResult {
        let mut orders = MockOrdersService::new();
        let mut mailer = MockMailer::new();

        orders.expect_create_order().never();
        mailer.expect_send().never();

        let mut request = request("beat-midnight-drill")?;
        request.transaction_id = String::new();

        let result = service(orders, mailer).fulfil(request).await;

        assert!(matches!(result, Err(FulfillmentError::Validation(_))));

        Ok(())
    }
}
