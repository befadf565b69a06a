//! Feed command - page through the photo feed.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::app::App;

/// Arguments for the feed command.
#[derive(Args)]
pub struct FeedArgs {
    /// Number of pages to load.
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

/// Runs the feed command.
pub async fn run(app: &App, args: &FeedArgs) -> Result<()> {
    if app.coordinator.restore_session().await?.is_none() {
        bail!("not logged in; run `lightbox login` first");
    }

    // The session promote already kicked off page 1; wait out whatever
    // fetch is pending, then load the rest. A failed initial fetch is
    // simply retried here.
    loop {
        if app.feed.last_loaded_page().unwrap_or(0) >= args.pages {
            break;
        }
        if app.feed.is_pending() {
            tokio::time::sleep(Duration::from_millis(25)).await;
            continue;
        }
        app.feed
            .fetch_next_page()
            .await
            .context("fetching feed page")?;
    }

    let photos = app.feed.photos();
    println!(
        "{} photos across {} page(s):",
        photos.len(),
        app.feed.last_loaded_page().unwrap_or(0)
    );
    for photo in photos {
        let like_marker = if photo.liked { "♥" } else { " " };
        let when = photo
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        let caption = photo.description.unwrap_or_default();
        println!(
            "{like_marker} {:<14} {:>5}x{:<5} {when}  {caption}",
            photo.id, photo.width, photo.height
        );
    }
    Ok(())
}
