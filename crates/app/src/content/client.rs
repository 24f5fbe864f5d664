//! Content store HTTP client.

use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{content::ContentStoreError, secrets::ApiSecret};

/// Configuration for connecting to the content store.
#[derive(Debug, Clone)]
pub struct ContentStoreConfig {
    /// Project identifier, the first label of the API host.
    pub project_id: String,

    /// Dataset name, e.g. `"production"`.
    pub dataset: String,

    /// Dated API version, e.g. `"2024-01-01"`.
    pub api_version: String,

    /// API host shared by every project, e.g. `"api.sanity.io"`.
    pub api_host: String,

    /// Read-write token. Reads of public datasets work without one.
    pub token: Option<ApiSecret>,
}

/// HTTP client for content store queries and mutations.
#[derive(Debug, Clone)]
pub struct ContentStoreClient {
    config: ContentStoreConfig,
    http: Client,
}

impl ContentStoreClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: ContentStoreConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "https://{}.{}/v{}/data/{action}/{}",
            self.config.project_id, self.config.api_host, self.config.api_version, self.config.dataset
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    /// Run a query, binding each `(name, value)` pair as a string `$name` parameter.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response body.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ContentStoreError> {
        let request = self
            .http
            .get(self.endpoint("query"))
            .query(&query_pairs(query, params));

        let response = self.authorize(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ContentStoreError::UnexpectedResponse(format!(
                "query failed with status {status}: {text}"
            )));
        }

        let body: Value = response.json().await?;

        decode_query_result(body)
    }

    /// Create a document, returning the id the content store assigned.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response body.
    pub async fn create(&self, document: Value) -> Result<String, ContentStoreError> {
        let body = json!({ "mutations": [{ "create": document }] });

        let request = self
            .http
            .post(self.endpoint("mutate"))
            .query(&[("returnIds", "true")])
            .json(&body);

        let response = self.authorize(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ContentStoreError::UnexpectedResponse(format!(
                "create failed with status {status}: {text}"
            )));
        }

        let parsed: MutationResponse = response.json().await?;

        created_id(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    id: String,
}

/// Query string pairs; parameter values are JSON-encoded as the store expects.
fn query_pairs(query: &str, params: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len() + 1);

    pairs.push(("query".to_string(), query.to_string()));

    for (name, value) in params {
        pairs.push((format!("${name}"), Value::from(*value).to_string()));
    }

    pairs
}

fn decode_query_result<T: DeserializeOwned>(mut body: Value) -> Result<T, ContentStoreError> {
    let result = body
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| ContentStoreError::UnexpectedResponse("missing result".to_string()))?;

    serde_json::from_value(result).map_err(ContentStoreError::Decode)
}

fn created_id(response: MutationResponse) -> Result<String, ContentStoreError> {
    response
        .results
        .into_iter()
        .next()
        .map(|result| result.id)
        .ok_or_else(|| ContentStoreError::UnexpectedResponse("mutation returned no ids".to_string()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn client() -> ContentStoreClient {
        ContentStoreClient::new(ContentStoreConfig {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            api_host: "api.sanity.io".to_string(),
            token: None,
        })
    }

    #[test]
    fn endpoint_includes_project_version_and_dataset() {
        assert_eq!(
            client().endpoint("query"),
            "https://abc123.api.sanity.io/v2024-01-01/data/query/production"
        );
    }

    #[test]
    fn params_are_json_encoded() {
        let pairs = query_pairs("*[_id == $id]", &[("id", "track-1")]);

        assert_eq!(
            pairs,
            vec![
                ("query".to_string(), "*[_id == $id]".to_string()),
                ("$id".to_string(), "\"track-1\"".to_string()),
            ]
        );
    }

    #[test]
    fn decodes_result_field() -> TestResult {
        let body = json!({ "ms": 3, "result": [1, 2, 3] });

        let decoded: Vec<u8> = decode_query_result(body)?;

        assert_eq!(decoded, vec![1, 2, 3]);

        Ok(())
    }

    #[test]
    fn null_result_decodes_to_none() -> TestResult {
        let decoded: Option<String> = decode_query_result(json!({ "result": null }))?;

        assert!(decoded.is_none());

        Ok(())
    }

    #[test]
    fn missing_result_is_unexpected() {
        let decoded = decode_query_result::<Vec<u8>>(json!({ "error": "bad query" }));

        assert!(matches!(decoded, Err(ContentStoreError::UnexpectedResponse(_))));
    }

    #[test]
    fn created_id_reads_first_result() -> TestResult {
        let response: MutationResponse = serde_json::from_value(json!({
            "transactionId": "tx1",
            "results": [{ "id": "order-1", "operation": "create" }]
        }))?;

        assert_eq!(created_id(response)?, "order-1");

        Ok(())
    }
}
