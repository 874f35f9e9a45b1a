use super::platform_client;
use crate::config::types::Config;
use crate::platform::PlatformSession;
use anyhow::{Context, Result};
use colored::Colorize;

/// Fetch the platform to confirm it exists, then remember it
pub async fn handle_platform_use(config: &Config, id: &str) -> Result<()> {
    let client = platform_client(config)?;
    let platform = client
        .get_platform(id)
        .await
        .with_context(|| format!("Failed to load platform '{}'", id))?;

    let session = PlatformSession::with_platform(platform.id.clone(), platform.name.clone());
    session.save().context("Failed to save platform session")?;
    println!("{} Using platform {}", "✓".green(), platform.name.cyan());
    Ok(())
}

pub fn handle_platform_show() -> Result<()> {
    let session = PlatformSession::load().unwrap_or_default();
    println!("{}", session.display_context());
    Ok(())
}
