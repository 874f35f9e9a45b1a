use super::platform_client;
use crate::config::types::Config;
use crate::platform::api::{BuildPackCatalog, CloudProvider, PackFilter, ServiceKind};
use anyhow::Result;
use colored::Colorize;

pub async fn handle_packs(
    config: &Config,
    provider: Option<CloudProvider>,
    kind: Option<ServiceKind>,
) -> Result<()> {
    let client = platform_client(config)?;
    let filter = PackFilter {
        provider,
        kind,
        service: None,
    };
    let packs = client.search_packs(&filter).await?;

    if packs.is_empty() {
        println!("{}", "No build packs match.".dimmed());
        return Ok(());
    }

    println!("{}", "Build packs".bright_cyan().bold());
    for pack in &packs {
        let language = pack.language.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<28} {:<34} {:<12} {}",
            pack.name.cyan(),
            format!("{}:{}:{}", pack.kind, pack.provider, pack.service),
            language,
            format!("v{}", pack.latest).dimmed()
        );
    }
    Ok(())
}
