//! Login command - run the code-grant flow.

use anyhow::{bail, Context, Result};
use clap::Args;
use lightbox_sync::{authorize_url, extract_code};
use url::Url;

use crate::app::App;

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Authorization code from the OAuth redirect. When omitted, the
    /// authorization URL is printed and the code is read interactively.
    #[arg(long)]
    pub code: Option<String>,
}

/// Runs the login command.
pub async fn run(app: &App, args: &LoginArgs) -> Result<()> {
    let code = match &args.code {
        Some(code) => code.clone(),
        None => prompt_for_code(app)?,
    };

    app.busy.begin();
    let result = app.coordinator.login(&code).await;
    app.busy.end();

    let profile = result.context("login failed")?;

    println!("Logged in as {} ({})", profile.name, profile.login_name);
    if let Some(bio) = &profile.bio {
        println!("  {bio}");
    }
    Ok(())
}

/// Prints the authorization URL and reads the redirect back from stdin.
///
/// Accepts either the bare code or the full redirect URL; the latter is
/// picked apart the same way the in-app webview interception would.
fn prompt_for_code(app: &App) -> Result<String> {
    let url = authorize_url(&app.config).context("building authorization URL")?;
    println!("Open this URL in a browser and authorize the application:");
    println!("  {url}");
    println!("Paste the redirect URL (or just the code):");

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("reading code from stdin")?;
    let input = line.trim();

    if input.is_empty() {
        bail!("no authorization code provided");
    }

    if let Ok(parsed) = Url::parse(input) {
        if let Some(code) = extract_code(&parsed) {
            return Ok(code);
        }
    }
    Ok(input.to_string())
}
