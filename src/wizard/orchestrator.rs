//! Wizard orchestration - drives the provisioning wizard from terminal prompts
//!
//! Esc goes back one step, Ctrl-C cancels the wizard.

use crate::github::{CodeHost, GitHubClient};
use crate::platform::api::{
    CloudProvider, ConnectedAccountApi, HostingService, InputKind, Platform, PlatformApiClient,
    ProvisioningApi, Service, ServiceKind, Tag,
};
use crate::source::{
    Notice, RepositoryLinkResolver, ResolverSettings, ResolverStage, ResolverUpdate,
    SourceDescriptor,
};
use crate::wizard::pack_config::ConfigField;
use crate::wizard::render::{
    count_badge, display_review, display_step_header, status_indicator, wizard_render_config,
};
use crate::wizard::{ServiceProvisioningWizard, ServiceStep, WizardError};
use colored::Colorize;
use inquire::{Confirm, InquireError, Select, Text};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How long to wait for the GitHub App installation before giving up
const INSTALLATION_WAIT: Duration = Duration::from_secs(600);

/// Result of running the wizard
#[derive(Debug)]
pub enum WizardResult {
    /// The service was created
    Created(Service),
    /// User cancelled the wizard
    Cancelled,
    /// An error occurred
    Error(String),
}

/// Outcome of a single prompt
enum Answer<T> {
    Value(T),
    Back,
    Cancel,
}

fn answer<T>(result: Result<T, InquireError>) -> Answer<T> {
    match result {
        Ok(v) => Answer::Value(v),
        Err(InquireError::OperationCanceled) => Answer::Back,
        Err(InquireError::OperationInterrupted) => Answer::Cancel,
        Err(e) => {
            log::warn!("Prompt failed: {}", e);
            Answer::Cancel
        }
    }
}

/// Parse `key=value` tags separated by commas
pub fn parse_tags(input: &str) -> Result<Vec<Tag>, String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let name = name.trim();
            if name.is_empty() {
                return Err(format!("'{}' has an empty key", pair));
            }
            Ok(Tag {
                name: name.to_string(),
                value: value.trim().to_string(),
            })
        })
        .collect()
}

/// Run the service wizard against a platform
pub async fn run_wizard(
    client: Arc<PlatformApiClient>,
    github: Arc<GitHubClient>,
    platform: Platform,
    settings: ResolverSettings,
) -> WizardResult {
    println!();
    println!(
        "{}",
        "═══════════════════════════════════════════════════════════════".bright_cyan()
    );
    println!(
        "{}",
        "                    Create New Service                         "
            .bright_cyan()
            .bold()
    );
    println!(
        "{}",
        "═══════════════════════════════════════════════════════════════".bright_cyan()
    );

    let api: Arc<dyn ProvisioningApi> = client.clone();
    let mut wizard = match ServiceProvisioningWizard::load(platform.clone(), client.as_ref(), api).await {
        Ok(w) => w,
        Err(e) => return WizardResult::Error(format!("Failed to load build packs: {}", e)),
    };

    let code_host: Arc<dyn CodeHost> = github;
    let accounts: Arc<dyn ConnectedAccountApi> = client;
    let mut resolver = RepositoryLinkResolver::new(
        code_host,
        accounts,
        platform.id.clone(),
        platform.has_connected_github_app,
        settings,
    );
    let mut resolver_started = false;

    loop {
        let step = wizard.step();
        let outcome = match step {
            ServiceStep::NameTags => name_tags_step(&mut wizard),
            ServiceStep::BuildTarget => build_target_step(&mut wizard),
            ServiceStep::Domain => domain_step(&mut wizard),
            ServiceStep::Source => {
                if !resolver_started {
                    resolver.start().await;
                    resolver_started = true;
                }
                source_step(&mut wizard, &mut resolver).await
            }
            ServiceStep::SourceReview => source_review_step(&mut wizard),
            ServiceStep::Config => config_step(&mut wizard),
            ServiceStep::Review => review_step(&mut wizard).await,
            ServiceStep::Created => {
                return match wizard.created() {
                    Some(service) => WizardResult::Created(service.clone()),
                    None => WizardResult::Error("Service was not returned".to_string()),
                };
            }
            ServiceStep::Cancelled => return WizardResult::Cancelled,
        };

        match outcome {
            Answer::Value(()) => {}
            Answer::Back => {
                wizard.back();
            }
            Answer::Cancel => {
                if let Err(e) = wizard.cancel() {
                    return WizardResult::Error(e.to_string());
                }
            }
        }
    }
}

fn report(error: &WizardError) {
    eprintln!("{} {}", "✗".red(), error);
}

// =============================================================================
// Steps
// =============================================================================

fn name_tags_step(wizard: &mut ServiceProvisioningWizard) -> Answer<()> {
    display_step_header(
        ServiceStep::NameTags,
        "Name your service and optionally tag it. Tags are key=value pairs separated by commas.",
    );

    let current = wizard.answers().name.clone().unwrap_or_default();
    let name = match answer(
        Text::new("Service name:")
            .with_render_config(wizard_render_config())
            .with_initial_value(&current)
            .prompt(),
    ) {
        Answer::Value(n) => n,
        other => return map_unit(other),
    };

    let current_tags: Vec<String> = wizard
        .answers()
        .tags
        .iter()
        .map(|t| format!("{}={}", t.name, t.value))
        .collect();
    let current_tags = current_tags.join(", ");
    let tags = match answer(
        Text::new("Tags:")
            .with_render_config(wizard_render_config())
            .with_initial_value(&current_tags)
            .with_help_message("e.g. team=payments, tier=backend")
            .prompt(),
    ) {
        Answer::Value(t) => t,
        Answer::Back => return Answer::Value(()),
        Answer::Cancel => return Answer::Cancel,
    };

    let tags = match parse_tags(&tags) {
        Ok(tags) => tags,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            return Answer::Value(());
        }
    };

    if let Err(e) = wizard.submit_name_tags(&name, tags) {
        report(&e);
    }
    Answer::Value(())
}

/// Wraps a choice with its label for `Select`
struct Labeled<T> {
    value: T,
    label: String,
}

impl<T> fmt::Display for Labeled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

fn select<T>(message: &str, options: Vec<Labeled<T>>) -> Answer<T> {
    match answer(
        Select::new(message, options)
            .with_render_config(wizard_render_config())
            .with_help_message("↑/↓ to move, Enter to select, Esc to go back")
            .prompt(),
    ) {
        Answer::Value(choice) => Answer::Value(choice.value),
        Answer::Back => Answer::Back,
        Answer::Cancel => Answer::Cancel,
    }
}

fn build_target_step(wizard: &mut ServiceProvisioningWizard) -> Answer<()> {
    display_step_header(
        ServiceStep::BuildTarget,
        "Choose what you are building, where it runs and the build pack that deploys it.",
    );

    let options = wizard.build_target_options();
    let kinds = options.kinds();
    if kinds.is_empty() {
        println!("{}", "The build pack catalog is empty.".yellow());
        return Answer::Back;
    }

    let kind: ServiceKind = match select(
        "What type of service are you building?",
        kinds
            .into_iter()
            .map(|k| Labeled { value: k, label: k.display_name().to_string() })
            .collect(),
    ) {
        Answer::Value(k) => k,
        other => return map_unit(other),
    };

    let provider: CloudProvider = match select(
        "Where do you want to host it?",
        options
            .providers(kind)
            .into_iter()
            .map(|p| Labeled { value: p, label: p.display_name().to_string() })
            .collect(),
    ) {
        Answer::Value(p) => p,
        other => return map_unit(other),
    };

    let service: HostingService = match select(
        "What service do you want to run it on?",
        options
            .services(kind, provider)
            .into_iter()
            .map(|s| Labeled { value: s, label: s.to_string() })
            .collect(),
    ) {
        Answer::Value(s) => s,
        other => return map_unit(other),
    };

    let Some(target) = crate::wizard::DeploymentTarget::new(kind, provider, service) else {
        return Answer::Value(());
    };
    let packs: Vec<Labeled<String>> = options
        .packs(&target)
        .into_iter()
        .map(|p| Labeled {
            value: p.id.clone(),
            label: format!("{} {}", p.name, format!("v{}", p.latest).dimmed()),
        })
        .collect();

    let pack_id = match select("Select your build pack:", packs) {
        Answer::Value(id) => id,
        other => return map_unit(other),
    };

    if let Err(e) = wizard.submit_build_target(kind, provider, service, &pack_id) {
        report(&e);
    }
    Answer::Value(())
}

/// Esc inside a step re-enters the step selection from the top, Ctrl-C cancels
fn map_unit<T>(answer: Answer<T>) -> Answer<()> {
    match answer {
        Answer::Value(_) => Answer::Value(()),
        Answer::Back => Answer::Back,
        Answer::Cancel => Answer::Cancel,
    }
}

fn domain_step(wizard: &mut ServiceProvisioningWizard) -> Answer<()> {
    display_step_header(
        ServiceStep::Domain,
        "This step is optional. Without a custom domain the service is reachable on the provider's generated URL.",
    );

    let domains: Vec<Labeled<Option<String>>> = wizard
        .domains()
        .into_iter()
        .map(|d| Labeled {
            value: Some(d.id.clone()),
            label: d.domain.clone(),
        })
        .collect();

    if domains.is_empty() {
        let provider = wizard
            .answers()
            .target
            .map(|t| t.provider().display_name())
            .unwrap_or("selected");
        println!(
            "{}",
            format!(
                "There are no domains configured for the {} cloud provider. A custom domain can be added to a running service later.",
                provider
            )
            .dimmed()
        );
        return match answer(Confirm::new("Continue without a custom domain?").with_default(true).prompt()) {
            Answer::Value(true) => skip_domain(wizard),
            Answer::Value(false) | Answer::Back => Answer::Back,
            Answer::Cancel => Answer::Cancel,
        };
    }

    let mut options = domains;
    options.push(Labeled {
        value: None,
        label: "Skip".dimmed().to_string(),
    });

    let domain_id = match select("Domain:", options) {
        Answer::Value(Some(id)) => id,
        Answer::Value(None) => return skip_domain(wizard),
        other => return map_unit(other),
    };

    let initial = wizard
        .answers()
        .domain
        .as_ref()
        .map(|d| d.subdomain.clone())
        .unwrap_or_default();
    let subdomain = match answer(
        Text::new("Subdomain:")
            .with_render_config(wizard_render_config())
            .with_initial_value(&initial)
            .with_help_message("Leave empty to use the domain itself")
            .prompt(),
    ) {
        Answer::Value(s) => s,
        Answer::Back => return Answer::Value(()),
        Answer::Cancel => return Answer::Cancel,
    };

    if let Err(e) = wizard.submit_domain(&domain_id, &subdomain) {
        report(&e);
    }
    Answer::Value(())
}

fn skip_domain(wizard: &mut ServiceProvisioningWizard) -> Answer<()> {
    if let Err(e) = wizard.skip_domain() {
        report(&e);
    }
    Answer::Value(())
}

fn source_review_step(wizard: &mut ServiceProvisioningWizard) -> Answer<()> {
    display_step_header(ServiceStep::SourceReview, "The service builds from this repository.");

    if let Some(source) = &wizard.answers().source {
        println!("  {} {}", source.to_string().cyan(), source.url().dimmed());
        println!();
    }

    let keep = match answer(Confirm::new("Keep this source?").with_default(true).prompt()) {
        Answer::Value(keep) => keep,
        other => return map_unit(other),
    };
    let result = if keep {
        wizard.confirm_source()
    } else {
        wizard.change_source()
    };
    if let Err(e) = result {
        report(&e);
    }
    Answer::Value(())
}

fn config_step(wizard: &mut ServiceProvisioningWizard) -> Answer<()> {
    display_step_header(
        ServiceStep::Config,
        "Configure the build pack. Press Enter to keep the value shown.",
    );

    let candidates: Vec<Labeled<Option<String>>> = wizard
        .copy_candidates()
        .into_iter()
        .map(|s| Labeled {
            value: Some(s.id.clone()),
            label: format!("Copy from {}", s.name),
        })
        .collect();
    if !candidates.is_empty() {
        let mut options = vec![Labeled {
            value: None,
            label: "Enter values".to_string(),
        }];
        options.extend(candidates);
        match select("Start from an existing service?", options) {
            Answer::Value(Some(id)) => {
                if let Err(e) = wizard.copy_config_from(&id) {
                    report(&e);
                }
            }
            Answer::Value(None) => {}
            other => return map_unit(other),
        }
    }

    for field in wizard.config_fields() {
        match prompt_field(&field) {
            Answer::Value(Some(raw)) => {
                if let Err(e) = wizard.set_config_input(&field.name, &raw) {
                    report(&e);
                    return Answer::Value(());
                }
            }
            Answer::Value(None) => {}
            other => return map_unit(other),
        }
    }

    if let Err(e) = wizard.submit_config() {
        report(&e);
    }
    Answer::Value(())
}

/// Ask for one field. `None` keeps the current value.
fn prompt_field(field: &ConfigField) -> Answer<Option<String>> {
    let label = format!("{}:", field.label);

    if field.kind == InputKind::Bool {
        let current = matches!(field.value, Some(crate::platform::api::ConfigValue::Bool(true)));
        let mut prompt = Confirm::new(&label).with_default(current);
        if let Some(help) = &field.description {
            prompt = prompt.with_help_message(help);
        }
        return match answer(prompt.prompt()) {
            Answer::Value(b) => Answer::Value(Some(b.to_string())),
            Answer::Back => Answer::Back,
            Answer::Cancel => Answer::Cancel,
        };
    }

    let current = field.value.as_ref().map(|v| v.to_string()).unwrap_or_default();
    let help = match field.kind {
        InputKind::Envars => "KEY=VALUE pairs separated by commas, prefix a key with ! to mark it secret".to_string(),
        _ => field.description.clone().unwrap_or_default(),
    };
    let mut prompt = Text::new(&label).with_render_config(wizard_render_config());
    if !current.is_empty() && field.kind != InputKind::Envars {
        prompt = prompt.with_default(&current);
    }
    if !help.is_empty() {
        prompt = prompt.with_help_message(&help);
    }

    match answer(prompt.prompt()) {
        Answer::Value(raw) if raw.trim().is_empty() && field.kind == InputKind::Envars => Answer::Value(None),
        Answer::Value(raw) if raw == current => Answer::Value(None),
        Answer::Value(raw) => Answer::Value(Some(raw)),
        Answer::Back => Answer::Back,
        Answer::Cancel => Answer::Cancel,
    }
}

async fn review_step(wizard: &mut ServiceProvisioningWizard) -> Answer<()> {
    display_step_header(ServiceStep::Review, "Review the service before it is created.");

    if let Some(review) = wizard.review() {
        display_review(&review);
    }

    match answer(Confirm::new("Create this service?").with_default(true).prompt()) {
        Answer::Value(true) => {}
        Answer::Value(false) | Answer::Back => return Answer::Back,
        Answer::Cancel => return Answer::Cancel,
    }

    println!("{}", "Creating service...".dimmed());
    match wizard.submit().await {
        Ok(service) => {
            println!();
            println!("{}  Service {} created", "✓".bright_green().bold(), service.name.cyan());
            println!("  ID: {}", service.id.dimmed());
            println!();
        }
        Err(e) => report(&e),
    }
    Answer::Value(())
}

// =============================================================================
// Source resolution
// =============================================================================

enum RepoChoice {
    Installed(String),
    PasteLink,
    Connect,
    Refresh,
    Filter,
    Skip,
}

enum BranchChoice {
    Branch(String),
    Filter,
    Change,
}

async fn source_step(
    wizard: &mut ServiceProvisioningWizard,
    resolver: &mut RepositoryLinkResolver,
) -> Answer<()> {
    display_step_header(
        ServiceStep::Source,
        "Pick the repository and branch the service builds from, or skip and add one later.",
    );

    if resolver.resolved().is_some() {
        resolver.change_repository();
    }

    loop {
        if let Some(notice) = resolver.take_notice() {
            eprintln!("{} {}", "!".yellow(), notice);
        }

        match resolver.stage().clone() {
            ResolverStage::Resolved(source) => return submit_source(wizard, source),
            ResolverStage::BranchSelection => match pick_branch(resolver) {
                Answer::Value(Some(name)) => {
                    resolver.select_branch(&name);
                }
                Answer::Value(None) => {}
                Answer::Back => resolver.change_repository(),
                Answer::Cancel => return Answer::Cancel,
            },
            ResolverStage::RepoSelection => {
                let choice = match pick_repository(resolver) {
                    Answer::Value(c) => c,
                    Answer::Back => return Answer::Back,
                    Answer::Cancel => return Answer::Cancel,
                };
                match choice {
                    RepoChoice::Installed(id) => {
                        resolver.select_installed_repository(&id).await;
                    }
                    RepoChoice::PasteLink => {
                        if let Answer::Cancel = paste_link(resolver).await {
                            return Answer::Cancel;
                        }
                    }
                    RepoChoice::Connect => wait_for_installation(resolver).await,
                    RepoChoice::Refresh => {
                        resolver.refresh_repositories().await;
                    }
                    RepoChoice::Filter => {
                        if let Answer::Value(filter) = answer(Text::new("Filter repositories:").prompt()) {
                            resolver.set_repository_filter(&filter);
                        }
                    }
                    RepoChoice::Skip => {
                        if let Err(e) = wizard.skip_source() {
                            report(&e);
                        }
                        return Answer::Value(());
                    }
                }
            }
        }
    }
}

fn submit_source(wizard: &mut ServiceProvisioningWizard, source: SourceDescriptor) -> Answer<()> {
    println!("{} Source: {}", "✓".green(), source.to_string().cyan());
    if let Err(e) = wizard.submit_source(source) {
        report(&e);
    }
    Answer::Value(())
}

fn pick_repository(resolver: &RepositoryLinkResolver) -> Answer<RepoChoice> {
    let connected = resolver.connection() == crate::source::ConnectionStatus::Connected;
    println!(
        "  {} GitHub account {}",
        status_indicator(connected),
        if connected { "connected" } else { "not connected" }
    );

    let mut options = Vec::new();
    if connected {
        let visible = resolver.visible_repositories();
        println!("  {}", count_badge(visible.len(), "repositories"));
        for repo in visible {
            options.push(Labeled {
                value: RepoChoice::Installed(repo.id.clone()),
                label: repo.full_name(),
            });
        }
        options.push(Labeled { value: RepoChoice::Filter, label: "Filter…".dimmed().to_string() });
        options.push(Labeled { value: RepoChoice::Refresh, label: "Refresh".dimmed().to_string() });
        options.push(Labeled {
            value: RepoChoice::Connect,
            label: "Re-configure installation".dimmed().to_string(),
        });
    } else {
        options.push(Labeled { value: RepoChoice::Connect, label: "Connect GitHub account".to_string() });
    }
    options.push(Labeled { value: RepoChoice::PasteLink, label: "Paste a public repository link".to_string() });
    options.push(Labeled { value: RepoChoice::Skip, label: "Skip".dimmed().to_string() });

    select("Source repository:", options)
}

fn pick_branch(resolver: &mut RepositoryLinkResolver) -> Answer<Option<String>> {
    let draft = resolver.draft().full_name();
    let mut options: Vec<Labeled<BranchChoice>> = resolver
        .branches()
        .visible()
        .into_iter()
        .map(|b| Labeled {
            value: BranchChoice::Branch(b.name.clone()),
            label: b.name.clone(),
        })
        .collect();
    options.push(Labeled { value: BranchChoice::Filter, label: "Filter…".dimmed().to_string() });
    options.push(Labeled {
        value: BranchChoice::Change,
        label: format!("Change repository ({})", draft).dimmed().to_string(),
    });

    match select(&format!("Branch of {}:", draft), options) {
        Answer::Value(BranchChoice::Branch(name)) => Answer::Value(Some(name)),
        Answer::Value(BranchChoice::Filter) => {
            if let Answer::Value(filter) = answer(Text::new("Filter branches:").prompt()) {
                resolver.set_branch_filter(&filter);
            }
            Answer::Value(None)
        }
        Answer::Value(BranchChoice::Change) | Answer::Back => Answer::Back,
        Answer::Cancel => Answer::Cancel,
    }
}

async fn paste_link(resolver: &mut RepositoryLinkResolver) -> Answer<()> {
    let link = match answer(
        Text::new("Repository link:")
            .with_render_config(wizard_render_config())
            .with_help_message("e.g. https://github.com/owner/repo")
            .prompt(),
    ) {
        Answer::Value(link) => link,
        other => return map_unit(other),
    };

    resolver.input_link(&link);
    println!("{}", "Looking up repository...".dimmed());

    while let Some(update) = resolver.pump().await {
        match update {
            ResolverUpdate::Matched(identity) => {
                let question = format!("Use {}?", identity.full_name());
                if let Answer::Value(true) = answer(Confirm::new(&question).with_default(true).prompt()) {
                    resolver.select_public_match().await;
                }
                break;
            }
            ResolverUpdate::NotFound(_) | ResolverUpdate::Failed(_) => break,
            _ => {}
        }
    }
    Answer::Value(())
}

async fn wait_for_installation(resolver: &mut RepositoryLinkResolver) {
    let url = resolver.connect().to_string();
    println!();
    println!("{} Opening the GitHub App installation page...", "→".cyan());
    println!("  {}", url.cyan());
    if let Err(e) = open::that(&url) {
        log::warn!("Failed to open browser: {}", e);
        println!("{}", "Open the link above in your browser to continue.".yellow());
    }
    println!("{}", "Waiting for the installation to complete...".dimmed());

    let waited = tokio::time::timeout(INSTALLATION_WAIT, async {
        while let Some(update) = resolver.pump().await {
            match update {
                ResolverUpdate::Connected { repositories } => {
                    println!(
                        "{} GitHub account connected, {}",
                        "✓".green(),
                        count_badge(repositories, "repositories")
                    );
                    return;
                }
                ResolverUpdate::Failed(Notice::RequestFailed { .. }) => return,
                _ => {}
            }
        }
    })
    .await;

    if waited.is_err() {
        resolver.cancel_connect();
        println!("{}", "Stopped waiting for the installation.".yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        let tags = parse_tags("team=payments, tier = backend,,solo").unwrap();
        assert_eq!(
            tags,
            vec![
                Tag { name: "team".into(), value: "payments".into() },
                Tag { name: "tier".into(), value: "backend".into() },
                Tag { name: "solo".into(), value: "".into() },
            ]
        );
        assert!(parse_tags("").unwrap().is_empty());
        assert!(parse_tags("=value").is_err());
    }
}
