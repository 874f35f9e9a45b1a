use crate::platform::api::{CloudProvider, ServiceKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prov-ctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Provision services on your platform")]
#[command(long_about = "Walks through creating a service on a platform: naming, build target and pack, domain, source repository and pack configuration.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new service with the interactive wizard
    CreateService {
        /// Platform to create the service on (defaults to the selected platform)
        #[arg(long, value_name = "PLATFORM_ID")]
        platform: Option<String>,
    },

    /// List build packs in the catalog
    Packs {
        /// Only packs for this cloud provider
        #[arg(long)]
        provider: Option<CloudProvider>,

        /// Only packs of this service kind
        #[arg(long)]
        kind: Option<ServiceKind>,
    },

    /// Manage the stored session token
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Select the platform services are created on
    Platform {
        #[command(subcommand)]
        command: PlatformCommand,
    },
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Store a session token
    Login {
        /// Token copied from the dashboard
        #[arg(long, env = "PROVISION_TOKEN")]
        token: String,

        /// Email shown by `auth status`
        #[arg(long)]
        email: Option<String>,

        /// Seconds until the token expires
        #[arg(long)]
        expires_in: Option<u64>,
    },

    /// Remove the stored token
    Logout,

    /// Show whether a valid token is stored
    Status,
}

#[derive(Subcommand)]
pub enum PlatformCommand {
    /// Select a platform by ID
    Use {
        #[arg(value_name = "PLATFORM_ID")]
        id: String,
    },

    /// Show the selected platform
    Show,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_packs_filters() {
        let cli = Cli::try_parse_from(["prov-ctl", "packs", "--provider", "aws", "--kind", "task-runner"]).unwrap();
        match cli.command {
            Commands::Packs { provider, kind } => {
                assert_eq!(provider, Some(CloudProvider::Aws));
                assert_eq!(kind, Some(ServiceKind::TaskRunner));
            }
            _ => panic!("expected packs"),
        }
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(Cli::try_parse_from(["prov-ctl", "packs", "--provider", "azure"]).is_err());
    }
}
