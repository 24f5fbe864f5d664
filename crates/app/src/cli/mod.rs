use beatstore::money::currency_from_code;
use beatstore_app::{
    catalog::ContentStoreCatalogService,
    content::{ContentStoreClient, ContentStoreConfig},
    secrets::ApiSecret,
};
use clap::{Args, Parser, Subcommand};

mod catalog;
mod payments;

#[derive(Debug, Parser)]
#[command(name = "beatstore-app", about = "Beatstore CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Catalog(catalog::CatalogCommand),
    Payments(payments::PaymentsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Catalog(command) => catalog::run(command).await,
            Commands::Payments(command) => payments::run(command).await,
        }
    }
}

/// Content store connection shared by catalog commands.
#[derive(Debug, Clone, Args)]
pub(crate) struct ContentStoreArgs {
    /// Content store project id
    #[arg(long, env = "CONTENT_STORE_PROJECT_ID")]
    project_id: String,

    /// Content store dataset
    #[arg(long, env = "CONTENT_STORE_DATASET", default_value = "production")]
    dataset: String,

    /// Content store API version
    #[arg(long, env = "CONTENT_STORE_API_VERSION", default_value = "2024-01-01")]
    api_version: String,

    /// Content store API host
    #[arg(long, env = "CONTENT_STORE_API_HOST", default_value = "api.sanity.io")]
    api_host: String,

    /// Content store token
    #[arg(long, env = "CONTENT_STORE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Currency track prices are in
    #[arg(long, env = "STORE_CURRENCY", default_value = "GHS")]
    currency: String,
}

impl ContentStoreArgs {
    pub(crate) fn catalog_service(self) -> Result<ContentStoreCatalogService, String> {
        let currency = currency_from_code(&self.currency)
            .map_err(|error| format!("invalid store currency: {error}"))?;

        let client = ContentStoreClient::new(ContentStoreConfig {
            project_id: self.project_id,
            dataset: self.dataset,
            api_version: self.api_version,
            api_host: self.api_host,
            token: self.token.map(ApiSecret::new),
        });

        Ok(ContentStoreCatalogService::new(client, currency))
    }
}
