use clap::Parser;
use provision_wizard::{cli::Cli, config, run_command};
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    cli.init_logging();

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    log::debug!("Platform API: {}", config.api.platform_url());

    run_command(cli.command, &config).await
}
