//! Mail Config

use clap::Args;

/// Email provider connection.
#[derive(Debug, Args)]
pub struct MailSettings {
    /// Email provider API key
    #[arg(long, env = "EMAIL_API_KEY", hide_env_values = true, default_value = "")]
    pub email_api_key: String,

    /// Sender address
    #[arg(long, env = "EMAIL_FROM", default_value = "no-reply@blingbeats.com")]
    pub email_from: String,

    /// Email provider API base URL
    #[arg(long, env = "EMAIL_API_BASE_URL", default_value = "https://api.resend.com")]
    pub email_api_base_url: String,
}
