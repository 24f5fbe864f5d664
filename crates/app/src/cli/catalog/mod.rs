use clap::{Args, Subcommand};

mod facets;
mod list;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    List(list::ListTracksArgs),
    Facets(facets::FacetsArgs),
}

pub(crate) async fn run(command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::List(args) => list::run(args).await,
        CatalogSubcommand::Facets(args) => facets::run(args).await,
    }
}
