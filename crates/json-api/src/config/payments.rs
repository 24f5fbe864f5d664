//! Payment Gateway Config

use clap::Args;

/// Payment gateway connection.
#[derive(Debug, Args)]
pub struct PaymentGatewaySettings {
    /// Gateway secret key; payment endpoints answer 500 without it
    #[arg(long, env = "PAYMENT_GATEWAY_SECRET_KEY", hide_env_values = true)]
    pub payment_gateway_secret_key: Option<String>,

    /// Gateway API base URL
    #[arg(
        long,
        env = "PAYMENT_GATEWAY_BASE_URL",
        default_value = "https://api.paystack.co"
    )]
    pub payment_gateway_base_url: String,
}
