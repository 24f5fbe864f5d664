//! App Context

use std::sync::Arc;

use beatstore::money::{AmountError, currency_from_code};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    carts::{CartsService, MemoryCartsService},
    catalog::{CatalogService, ContentStoreCatalogService},
    checkout::{CheckoutService, StoreCheckoutService},
    content::{ContentStoreClient, ContentStoreConfig},
    fulfillment::{FulfillmentService, StoreFulfillmentService},
    mail::HttpMailer,
    orders::ContentStoreOrdersService,
    payments::{
        GatewayPaymentsService, HttpPaymentGateway, PaymentGateway, PaymentsConfig,
        PaymentsService,
    },
    secrets::ApiSecret,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("invalid store currency")]
    Currency(#[source] AmountError),
}

/// Payment gateway connection.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub secret: ApiSecret,
}

/// Email provider connection.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub base_url: String,
    pub api_key: ApiSecret,
    pub from: String,
}

/// Everything needed to wire the services together.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub content_store: ContentStoreConfig,

    /// Without a gateway, payment operations report `NotConfigured`
    pub gateway: Option<GatewayConfig>,

    pub mail: MailConfig,

    pub store_name: String,

    /// ISO 4217 code every price is in
    pub store_currency: String,

    /// Base URL the gateway redirects customers back to
    pub public_base_url: String,
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
    pub payments: Arc<dyn PaymentsService>,
    pub fulfillment: Arc<dyn FulfillmentService>,
    pub checkout: Arc<dyn CheckoutService>,

    /// Currency every price is in
    pub currency: &'static Currency,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the store currency is not supported.
    pub fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let currency = currency_from_code(&config.store_currency).map_err(AppInitError::Currency)?;

        let client = ContentStoreClient::new(config.content_store);

        let catalog: Arc<dyn CatalogService> =
            Arc::new(ContentStoreCatalogService::new(client.clone(), currency));

        let carts: Arc<dyn CartsService> =
            Arc::new(MemoryCartsService::new(catalog.clone(), currency));

        let gateway = config.gateway.map(|gateway| {
            Arc::new(HttpPaymentGateway::new(gateway.base_url, gateway.secret))
                as Arc<dyn PaymentGateway>
        });

        let payments: Arc<dyn PaymentsService> = Arc::new(GatewayPaymentsService::new(
            gateway,
            PaymentsConfig {
                currency,
                callback_url: format!(
                    "{}/payment/callback",
                    config.public_base_url.trim_end_matches('/')
                ),
                store_name: config.store_name,
            },
        ));

        let fulfillment: Arc<dyn FulfillmentService> = Arc::new(StoreFulfillmentService::new(
            catalog.clone(),
            Arc::new(ContentStoreOrdersService::new(client)),
            Arc::new(HttpMailer::new(config.mail.base_url, config.mail.api_key)),
            config.mail.from,
        ));

        let checkout: Arc<dyn CheckoutService> = Arc::new(StoreCheckoutService::new(
            payments.clone(),
            fulfillment.clone(),
            carts.clone(),
            currency,
        ));

        Ok(Self {
            catalog,
            carts,
            payments,
            fulfillment,
            checkout,
            currency,
        })
    }
}
