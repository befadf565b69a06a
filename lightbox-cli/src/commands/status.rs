//! Status command - restore the session and report its state.

use anyhow::Result;
use lightbox_sync::SessionState;
use tracing::debug;

use crate::app::App;

/// Runs the status command.
pub async fn run(app: &App) -> Result<()> {
    app.busy.begin();
    let restored = app.coordinator.restore_session().await;
    app.busy.end();

    match restored {
        Ok(Some(profile)) => {
            println!("Session: authenticated");
            println!("  {} ({})", profile.name, profile.login_name);
            if let Some(bio) = &profile.bio {
                println!("  {bio}");
            }
            if let Some(avatar) = app.avatar.avatar_url() {
                println!("  avatar: {avatar}");
            }
        }
        Ok(None) => {
            println!("Session: not logged in");
        }
        Err(e) if e.is_unauthorized() => {
            println!("Session: token was rejected and has been cleared");
        }
        Err(e) => {
            debug!(error = %e, "Session restore failed");
            println!("Session: could not be restored ({e})");
        }
    }

    debug!(state = ?app.coordinator.state(), "Restore finished");
    if app.coordinator.state() == SessionState::Unauthenticated {
        println!("Run `lightbox login` to authenticate.");
    }
    Ok(())
}
