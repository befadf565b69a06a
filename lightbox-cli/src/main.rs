// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Lightbox CLI - drive the photo-feed sync core from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Print the authorization URL, then log in with the code from the redirect
//! lightbox login
//!
//! # Log in with a code you already have
//! lightbox login --code AUTH_CODE
//!
//! # Show session state and profile
//! lightbox status
//!
//! # Load the first two feed pages
//! lightbox feed --pages 2
//!
//! # Toggle a like
//! lightbox like PHOTO_ID
//!
//! # Tear the session down
//! lightbox logout
//! ```

mod app;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{feed, like, login, logout, status};

// ============================================================================
// CLI Definition
// ============================================================================

/// Lightbox CLI - photo-feed client.
#[derive(Parser)]
#[command(name = "lightbox")]
#[command(about = "Photo-feed client CLI")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Log in with an OAuth authorization code.
    Login(login::LoginArgs),

    /// Show session state and the current profile.
    Status,

    /// Load feed pages and list their photos.
    Feed(feed::FeedArgs),

    /// Toggle the like state of a photo.
    Like(like::LikeArgs),

    /// Clear the stored token and tear the session down.
    Logout,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("lightbox=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lightbox=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let app = app::App::bootstrap().await?;

    match &cli.command {
        Commands::Login(args) => login::run(&app, args).await,
        Commands::Status => status::run(&app).await,
        Commands::Feed(args) => feed::run(&app, args).await,
        Commands::Like(args) => like::run(&app, args).await,
        Commands::Logout => logout::run(&app),
    }
}
