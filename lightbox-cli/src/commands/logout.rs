//! Logout command - tear the session down.

use anyhow::Result;

use crate::app::App;

/// Runs the logout command.
pub fn run(app: &App) -> Result<()> {
    app.coordinator.logout();
    println!("Logged out; stored token cleared.");
    Ok(())
}
