//! Email provider client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{mail::errors::MailError, secrets::ApiSecret};

/// An HTML email ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Provider client authenticated with an API key.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    base_url: String,
    api_key: ApiSecret,
    http: Client,
}

impl HttpMailer {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: ApiSecret) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    #[tracing::instrument(name = "mail.send", skip(self, email), fields(subject = %email.subject), err)]
    async fn send(&self, email: Email) -> Result<String, MailError> {
        let response = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(self.api_key.expose())
            .json(&email)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(MailError::Rejected(format!(
                "send failed with status {status}: {text}"
            )));
        }

        let sent: SendResponse = response.json().await?;

        debug!(message_id = %sent.id, "email sent");

        Ok(sent.id)
    }
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send an email, returning the provider's message id.
    async fn send(&self, email: Email) -> Result<String, MailError>;
}
