use crate::auth::credentials::{clear_credentials, get_auth_status, save_credentials, AuthStatus};
use anyhow::{bail, Result};
use chrono::{TimeZone, Utc};
use colored::Colorize;

pub fn handle_login(token: &str, email: Option<&str>, expires_in: Option<u64>) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        bail!("The token is empty");
    }
    save_credentials(token, email, expires_in)?;
    println!("{} Session token saved", "✓".green());
    Ok(())
}

pub fn handle_logout() -> Result<()> {
    clear_credentials()?;
    println!("{} Logged out", "✓".green());
    Ok(())
}

pub fn handle_status() -> Result<()> {
    match get_auth_status() {
        AuthStatus::NotAuthenticated => {
            println!("{} Not logged in. Run {}", "✗".red(), "prov-ctl auth login --token <TOKEN>".cyan());
        }
        AuthStatus::Expired => {
            println!("{} Session token expired. Log in again.", "✗".yellow());
        }
        AuthStatus::Authenticated { email, expires_at } => {
            println!(
                "{} Logged in{}",
                "✓".green(),
                email.map(|e| format!(" as {}", e.cyan())).unwrap_or_default()
            );
            if let Some(at) = expires_at.and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single()) {
                println!("  Expires: {}", at.format("%Y-%m-%d %H:%M UTC").to_string().dimmed());
            }
        }
    }
    Ok(())
}
