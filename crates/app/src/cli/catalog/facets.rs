use beatstore_app::catalog::CatalogService;
use clap::Args;

use crate::cli::ContentStoreArgs;

#[derive(Debug, Args)]
pub(crate) struct FacetsArgs {
    #[command(flatten)]
    content_store: ContentStoreArgs,
}

pub(crate) async fn run(args: FacetsArgs) -> Result<(), String> {
    let service = args.content_store.catalog_service()?;

    let catalog = service
        .catalog()
        .await
        .map_err(|error| format!("failed to fetch tracks: {error}"))?;

    println!("tracks: {}", catalog.count());
    println!("genres: {}", catalog.all_genres().join(", "));
    println!("tags: {}", catalog.all_tags().join(", "));

    Ok(())
}
