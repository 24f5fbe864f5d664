//! Content Store Config

use clap::Args;

/// Headless content store connection.
#[derive(Debug, Args)]
pub struct ContentStoreSettings {
    /// Content store project id
    #[arg(long, env = "CONTENT_STORE_PROJECT_ID")]
    pub content_store_project_id: String,

    /// Content store dataset
    #[arg(long, env = "CONTENT_STORE_DATASET", default_value = "production")]
    pub content_store_dataset: String,

    /// Content store dated API version
    #[arg(long, env = "CONTENT_STORE_API_VERSION", default_value = "2024-01-01")]
    pub content_store_api_version: String,

    /// Content store API host
    #[arg(long, env = "CONTENT_STORE_API_HOST", default_value = "api.sanity.io")]
    pub content_store_api_host: String,

    /// Read-write content store token
    #[arg(long, env = "CONTENT_STORE_TOKEN", hide_env_values = true)]
    pub content_store_token: Option<String>,
}
