use std::sync::Arc;

use beatstore::{catalog::TrackFilter, money::format_amount};
use beatstore_app::search::SearchSession;
use clap::Args;

use crate::cli::ContentStoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ListTracksArgs {
    #[command(flatten)]
    content_store: ContentStoreArgs,

    /// Search title, tags, genre, description and artist
    #[arg(long)]
    query: Option<String>,

    /// Only tracks in this genre
    #[arg(long)]
    genre: Option<String>,

    /// Only tracks with this tag
    #[arg(long)]
    tag: Option<String>,
}

pub(crate) async fn run(args: ListTracksArgs) -> Result<(), String> {
    let session = SearchSession::new(Arc::new(args.content_store.catalog_service()?));

    let filter = TrackFilter {
        query: args.query,
        genre: args.genre,
        tag: args.tag,
    };

    let tracks = session
        .search(&filter)
        .await
        .map_err(|error| format!("failed to fetch tracks: {error}"))?
        .unwrap_or_default();

    if tracks.is_empty() {
        println!("no tracks found");
        return Ok(());
    }

    for track in &tracks {
        println!("id: {}", track.id);
        println!("title: {}", track.title);
        println!("artist: {}", track.artist.as_deref().unwrap_or("unknown"));
        println!("genre: {}", track.genre.as_deref().unwrap_or("none"));
        println!("price: {}", format_amount(&track.price));
        println!("featured: {}", track.featured);
        println!(
            "audio: {}",
            track.audio_url.as_deref().unwrap_or("not available")
        );
        println!();
    }

    Ok(())
}
