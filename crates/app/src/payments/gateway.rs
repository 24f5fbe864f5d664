//! Payment gateway HTTP client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{payments::errors::GatewayError, secrets::ApiSecret};

/// Transaction initialization request; `amount` is in minor units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitializeTransaction {
    pub email: String,
    pub amount: i64,
    pub currency: String,
    pub reference: String,
    pub callback_url: String,
    pub metadata: Value,
}

/// Envelope around every gateway response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GatewayResponse<T> {
    pub status: bool,

    #[serde(default)]
    pub message: String,

    pub data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorizationData {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// Transaction as reported by verification; `amount` is in minor units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionData {
    pub reference: String,
    pub amount: i64,
    pub currency: Option<String>,
    pub status: String,
    pub paid_at: Option<String>,

    #[serde(default)]
    pub customer: Value,

    #[serde(default)]
    pub metadata: Value,
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start a transaction.
    async fn initialize(
        &self,
        request: InitializeTransaction,
    ) -> Result<GatewayResponse<AuthorizationData>, GatewayError>;

    /// Look up a transaction by reference.
    async fn verify(&self, reference: &str)
    -> Result<GatewayResponse<TransactionData>, GatewayError>;
}

/// Gateway client authenticated with the merchant secret key.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    base_url: String,
    secret: ApiSecret,
    http: Client,
}

impl HttpPaymentGateway {
    #[must_use]
    pub fn new(base_url: impl Into<String>, secret: ApiSecret) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret,
            http: Client::new(),
        }
    }

    /// Joins path segments onto the base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|error| GatewayError::InvalidUrl(format!("{}: {error}", self.base_url)))?;

        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initialize(
        &self,
        request: InitializeTransaction,
    ) -> Result<GatewayResponse<AuthorizationData>, GatewayError> {
        let response = self
            .http
            .post(self.endpoint(&["transaction", "initialize"])?)
            .bearer_auth(self.secret.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        parse_response(status.as_u16(), &text)
    }

    async fn verify(
        &self,
        reference: &str,
    ) -> Result<GatewayResponse<TransactionData>, GatewayError> {
        let response = self
            .http
            .get(self.endpoint(&["transaction", "verify", reference])?)
            .bearer_auth(self.secret.expose())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        parse_response(status.as_u16(), &text)
    }
}

/// Decode a gateway body. Rejections arrive with 4xx statuses but still carry
/// the envelope, so the status code only matters when the body is not one.
fn parse_response<T: DeserializeOwned>(
    status: u16,
    text: &str,
) -> Result<GatewayResponse<T>, GatewayError> {
    serde_json::from_str(text).map_err(|error| {
        GatewayError::UnexpectedResponse(format!("status {status}: {error}: {text}"))
    })
}
