//! Server configuration module

use beatstore_app::{
    content::ContentStoreConfig,
    context::{AppConfig, GatewayConfig, MailConfig},
    secrets::ApiSecret,
};
use clap::Parser;

use crate::config::{
    content::ContentStoreSettings,
    mail::MailSettings,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentGatewaySettings,
    server::ServerRuntimeConfig,
    store::StoreSettings,
};

pub(crate) mod content;
pub(crate) mod mail;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;
pub(crate) mod store;

pub(crate) use observability::LogFormat;

/// Beatstore JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "beatstore-json", about = "Beatstore JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Content store settings.
    #[command(flatten)]
    pub content_store: ContentStoreSettings,

    /// Payment gateway settings.
    #[command(flatten)]
    pub payments: PaymentGatewaySettings,

    /// Email provider settings.
    #[command(flatten)]
    pub mail: MailSettings,

    /// Storefront settings.
    #[command(flatten)]
    pub store: StoreSettings,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Service wiring for the application context.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            content_store: ContentStoreConfig {
                project_id: self.content_store.content_store_project_id.clone(),
                dataset: self.content_store.content_store_dataset.clone(),
                api_version: self.content_store.content_store_api_version.clone(),
                api_host: self.content_store.content_store_api_host.clone(),
                token: self
                    .content_store
                    .content_store_token
                    .clone()
                    .map(ApiSecret::new),
            },
            gateway: self
                .payments
                .payment_gateway_secret_key
                .as_deref()
                .map(str::trim)
                .filter(|secret| !secret.is_empty())
                .map(|secret| GatewayConfig {
                    base_url: self.payments.payment_gateway_base_url.clone(),
                    secret: ApiSecret::new(secret),
                }),
            mail: MailConfig {
                base_url: self.mail.email_api_base_url.clone(),
                api_key: ApiSecret::new(self.mail.email_api_key.clone()),
                from: self.mail.email_from.clone(),
            },
            store_name: self.store.store_name.clone(),
            store_currency: self.store.store_currency.clone(),
            public_base_url: self.store.public_base_url.clone(),
        }
    }
}
