//! Like command - toggle the like state of a photo.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::app::App;

/// Arguments for the like command.
#[derive(Args)]
pub struct LikeArgs {
    /// Id of the photo to toggle.
    pub photo_id: String,

    /// Pages to search for the photo.
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

/// Runs the like command.
pub async fn run(app: &App, args: &LikeArgs) -> Result<()> {
    if app.coordinator.restore_session().await?.is_none() {
        bail!("not logged in; run `lightbox login` first");
    }

    // The engine can only toggle photos it holds; page until found.
    let mut found = app.feed.photos().iter().any(|p| p.id == args.photo_id);
    while !found && app.feed.last_loaded_page().unwrap_or(0) < args.pages {
        if app.feed.is_pending() {
            tokio::time::sleep(Duration::from_millis(25)).await;
        } else {
            app.feed
                .fetch_next_page()
                .await
                .context("fetching feed page")?;
        }
        found = app.feed.photos().iter().any(|p| p.id == args.photo_id);
    }
    if !found {
        bail!(
            "photo {} not found in the first {} page(s)",
            args.photo_id,
            args.pages
        );
    }

    app.feed
        .toggle_like(&args.photo_id)
        .await
        .context("toggling like")?;

    let liked = app
        .feed
        .photos()
        .iter()
        .find(|p| p.id == args.photo_id)
        .is_some_and(|p| p.liked);
    println!(
        "{} is now {}",
        args.photo_id,
        if liked { "liked ♥" } else { "unliked" }
    );
    Ok(())
}
