use super::platform_client;
use crate::config::types::Config;
use crate::github::GitHubClient;
use crate::platform::PlatformSession;
use crate::wizard::{run_wizard, WizardResult};
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::sync::Arc;

pub async fn handle_create_service(config: &Config, platform: Option<String>) -> Result<()> {
    let platform_id = match platform {
        Some(id) => id,
        None => PlatformSession::load()
            .unwrap_or_default()
            .platform_id
            .ok_or_else(|| anyhow!("No platform selected. Run `prov-ctl platform use <ID>` or pass --platform"))?,
    };

    let client = platform_client(config)?;
    let platform = client
        .get_platform(&platform_id)
        .await
        .with_context(|| format!("Failed to load platform '{}'", platform_id))?;
    let github = GitHubClient::with_url(config.api.github_url.clone())
        .context("Failed to create GitHub client")?;

    match run_wizard(
        Arc::new(client),
        Arc::new(github),
        platform,
        config.wizard.resolver_settings(),
    )
    .await
    {
        WizardResult::Created(_) => Ok(()),
        WizardResult::Cancelled => {
            println!("{}", "Wizard cancelled.".dimmed());
            Ok(())
        }
        WizardResult::Error(e) => Err(anyhow!(e)),
    }
}
