//! Store Config

use clap::Args;

/// Storefront identity and URLs.
#[derive(Debug, Args)]
pub struct StoreSettings {
    /// Store name shown on gateway receipts
    #[arg(long, env = "STORE_NAME", default_value = "BlingBeats")]
    pub store_name: String,

    /// ISO 4217 currency every price is in
    #[arg(long, env = "STORE_CURRENCY", default_value = "GHS")]
    pub store_currency: String,

    /// Public base URL of the storefront
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = "http://localhost:3000")]
    pub public_base_url: String,
}
