//! Service provisioning wizard
//!
//! Step graph:
//!
//! ```text
//! NameTags -> BuildTarget -> Domain -+-> Source ------> Config -> Review -> Created
//!                                    '-> SourceReview -'
//! ```
//!
//! Domain goes to `SourceReview` when a source was already picked (the user
//! came back), otherwise to `Source`. Backing out of `Config` returns to
//! whichever of the two led there. Any non-terminal step can cancel.

use super::answers::{DomainChoice, ServiceAnswers, ServicePatch, SourceRoute};
use super::build_target::{BuildTargetOptions, DeploymentTarget};
use super::engine::{WizardEngine, WizardStep};
use super::error::{Result, WizardError};
use super::pack_config::{self, ConfigField};
use crate::platform::api::{
    BuildPack, BuildPackCatalog, CloudProvider, ConfigValue, CreateServiceRequest, Domain,
    HostingService, PackConfig, PackFilter, Platform, PlatformApiError, ProvisioningApi, Service,
    ServiceKind, ServiceSummary, Tag,
};
use crate::source::SourceDescriptor;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceStep {
    NameTags,
    BuildTarget,
    Domain,
    Source,
    SourceReview,
    Config,
    Review,
    Created,
    Cancelled,
}

impl ServiceStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStep::NameTags => "name-tags",
            ServiceStep::BuildTarget => "build-target",
            ServiceStep::Domain => "domain",
            ServiceStep::Source => "source",
            ServiceStep::SourceReview => "source-review",
            ServiceStep::Config => "config",
            ServiceStep::Review => "review",
            ServiceStep::Created => "created",
            ServiceStep::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceStep::Created | ServiceStep::Cancelled)
    }
}

impl fmt::Display for ServiceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl WizardStep<ServiceAnswers> for ServiceStep {
    const ALL: &'static [ServiceStep] = &[
        ServiceStep::NameTags,
        ServiceStep::BuildTarget,
        ServiceStep::Domain,
        ServiceStep::Source,
        ServiceStep::SourceReview,
        ServiceStep::Config,
        ServiceStep::Review,
        ServiceStep::Created,
        ServiceStep::Cancelled,
    ];

    fn is_reachable(&self, a: &ServiceAnswers) -> bool {
        let has_pack = a.name.is_some() && a.target.is_some() && a.pack.is_some();
        match self {
            ServiceStep::NameTags | ServiceStep::Cancelled => true,
            ServiceStep::BuildTarget => a.name.is_some(),
            ServiceStep::Domain | ServiceStep::Source => has_pack,
            ServiceStep::SourceReview => has_pack && a.source.is_some(),
            ServiceStep::Config => has_pack && a.source_route.is_some(),
            ServiceStep::Review | ServiceStep::Created => {
                has_pack && a.source_route.is_some() && a.config_confirmed
            }
        }
    }
}

/// Forward edge out of the domain step
fn after_domain(answers: &ServiceAnswers) -> ServiceStep {
    if answers.source.is_some() {
        ServiceStep::SourceReview
    } else {
        ServiceStep::Source
    }
}

/// Backward edge out of the config step
fn before_config(answers: &ServiceAnswers) -> ServiceStep {
    match answers.source_route {
        Some(SourceRoute::SourceReview) if answers.source.is_some() => ServiceStep::SourceReview,
        _ => ServiceStep::Source,
    }
}

/// Read-only data for the review step
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSummary {
    pub name: String,
    pub tags: Vec<Tag>,
    pub summary: String,
    pub url: Option<String>,
    pub source: Option<SourceDescriptor>,
    pub config: PackConfig,
}

pub struct ServiceProvisioningWizard {
    engine: WizardEngine<ServiceStep, ServiceAnswers>,
    platform: Platform,
    packs: Vec<BuildPack>,
    api: Arc<dyn ProvisioningApi>,
    submitting: bool,
    created: Option<Service>,
}

impl ServiceProvisioningWizard {
    pub fn new(platform: Platform, packs: Vec<BuildPack>, api: Arc<dyn ProvisioningApi>) -> Self {
        log::debug!(
            "Starting service wizard for platform '{}' with {} packs",
            platform.name,
            packs.len()
        );
        Self {
            engine: WizardEngine::new(ServiceStep::NameTags),
            platform,
            packs,
            api,
            submitting: false,
            created: None,
        }
    }

    /// Fetch the catalog and start the wizard
    pub async fn load(
        platform: Platform,
        catalog: &dyn BuildPackCatalog,
        api: Arc<dyn ProvisioningApi>,
    ) -> Result<Self> {
        let packs = catalog.search_packs(&PackFilter::default()).await?;
        Ok(Self::new(platform, packs, api))
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn step(&self) -> ServiceStep {
        self.engine.current()
    }

    pub fn answers(&self) -> &ServiceAnswers {
        self.engine.answers()
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn transitions(&self) -> u64 {
        self.engine.transitions()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The service, once created
    pub fn created(&self) -> Option<&Service> {
        self.created.as_ref()
    }

    fn expect_step(&self, step: ServiceStep, action: &'static str) -> Result<()> {
        let current = self.step();
        if current != step {
            return Err(WizardError::WrongStep {
                step: current,
                action,
            });
        }
        Ok(())
    }

    // =========================================================================
    // NameTags
    // =========================================================================

    pub fn submit_name_tags(&mut self, name: &str, tags: Vec<Tag>) -> Result<ServiceStep> {
        self.expect_step(ServiceStep::NameTags, "set the name")?;

        let name = name.trim();
        if name.is_empty() {
            return Err(WizardError::Validation {
                field: "name".to_string(),
                message: "a service name is required".to_string(),
            });
        }
        if tags.iter().any(|t| t.name.trim().is_empty()) {
            return Err(WizardError::Validation {
                field: "tags".to_string(),
                message: "tag keys cannot be empty".to_string(),
            });
        }

        let patch = ServicePatch::name_tags(name.to_string(), tags);
        Ok(self.engine.advance(patch, |_| ServiceStep::BuildTarget))
    }

    // =========================================================================
    // BuildTarget
    // =========================================================================

    /// Choices narrowed to what the catalog can deploy
    pub fn build_target_options(&self) -> BuildTargetOptions<'_> {
        BuildTargetOptions::new(&self.packs)
    }

    pub fn submit_build_target(
        &mut self,
        kind: ServiceKind,
        provider: CloudProvider,
        service: HostingService,
        pack_id: &str,
    ) -> Result<ServiceStep> {
        self.expect_step(ServiceStep::BuildTarget, "choose a build target")?;

        let target = DeploymentTarget::new(kind, provider, service).ok_or_else(|| {
            WizardError::Validation {
                field: "target".to_string(),
                message: format!("{} cannot run on {} {}", kind, provider, service),
            }
        })?;
        let pack = self
            .build_target_options()
            .find_pack(&target, pack_id)
            .and_then(BuildPack::latest_ref)
            .ok_or_else(|| WizardError::UnknownPack(pack_id.to_string()))?;

        // Same pack again keeps whatever was configured
        let config = match &self.answers().pack {
            Some(current) if current.id == pack.id => None,
            _ => Some(pack_config::default_config(&pack.version.inputs)),
        };

        let patch = ServicePatch::build_target(target, pack, config);
        Ok(self.engine.advance(patch, |_| ServiceStep::Domain))
    }

    // =========================================================================
    // Domain
    // =========================================================================

    /// Domains configured for the chosen provider; may be empty
    pub fn domains(&self) -> Vec<&Domain> {
        match self.answers().target {
            Some(target) => self.platform.domains_for(target.provider()),
            None => Vec::new(),
        }
    }

    pub fn submit_domain(&mut self, domain_id: &str, subdomain: &str) -> Result<ServiceStep> {
        self.expect_step(ServiceStep::Domain, "choose a domain")?;

        let domain = self
            .domains()
            .into_iter()
            .find(|d| d.id == domain_id)
            .ok_or_else(|| WizardError::UnknownDomain(domain_id.to_string()))?;

        let subdomain = subdomain.trim().to_lowercase();
        let valid = subdomain
            .split('.')
            .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
        if !subdomain.is_empty() && !valid {
            return Err(WizardError::Validation {
                field: "subdomain".to_string(),
                message: format!("'{}' is not a valid subdomain", subdomain),
            });
        }

        let choice = DomainChoice {
            domain_id: domain.id.clone(),
            domain: domain.domain.clone(),
            subdomain,
        };
        Ok(self.engine.advance(ServicePatch::domain(Some(choice)), after_domain))
    }

    pub fn skip_domain(&mut self) -> Result<ServiceStep> {
        self.expect_step(ServiceStep::Domain, "skip the domain")?;
        Ok(self.engine.advance(ServicePatch::domain(None), after_domain))
    }

    // =========================================================================
    // Source / SourceReview
    // =========================================================================

    /// Take the descriptor produced by the repository link resolver
    pub fn submit_source(&mut self, source: SourceDescriptor) -> Result<ServiceStep> {
        self.expect_step(ServiceStep::Source, "choose a source")?;
        if !source.is_complete() {
            return Err(WizardError::Validation {
                field: "source".to_string(),
                message: "pick a repository and a branch".to_string(),
            });
        }
        let patch = ServicePatch::source(Some(source), SourceRoute::Source);
        Ok(self.engine.advance(patch, |_| ServiceStep::Config))
    }

    /// Continue without a repository
    pub fn skip_source(&mut self) -> Result<ServiceStep> {
        self.expect_step(ServiceStep::Source, "skip the source")?;
        let patch = ServicePatch::source(None, SourceRoute::Source);
        Ok(self.engine.advance(patch, |_| ServiceStep::Config))
    }

    /// Keep the source chosen earlier
    pub fn confirm_source(&mut self) -> Result<ServiceStep> {
        self.expect_step(ServiceStep::SourceReview, "confirm the source")?;
        let patch = ServicePatch::route(SourceRoute::SourceReview);
        Ok(self.engine.advance(patch, |_| ServiceStep::Config))
    }

    /// Pick a different source; the current one stays until replaced
    pub fn change_source(&mut self) -> Result<ServiceStep> {
        self.expect_step(ServiceStep::SourceReview, "change the source")?;
        Ok(self.engine.retreat(|_| ServiceStep::Source))
    }

    // =========================================================================
    // Config
    // =========================================================================

    pub fn config_fields(&self) -> Vec<ConfigField> {
        match &self.answers().pack {
            Some(pack) => pack_config::config_fields(&pack.version.inputs, &self.answers().config),
            None => Vec::new(),
        }
    }

    /// Set one field to an already typed value
    pub fn update_config(&mut self, field: &str, value: ConfigValue) -> Result<()> {
        self.expect_step(ServiceStep::Config, "edit the config")?;

        let kind = self
            .config_fields()
            .into_iter()
            .find(|f| f.name == field)
            .map(|f| f.kind)
            .ok_or_else(|| WizardError::Validation {
                field: field.to_string(),
                message: "not an input of this pack".to_string(),
            })?;
        if !value.matches_kind(kind) {
            return Err(WizardError::Validation {
                field: field.to_string(),
                message: format!("expected a {:?} value", kind).to_lowercase(),
            });
        }

        let mut config = self.answers().config.clone();
        config.insert(field.to_string(), value);
        self.engine.update(ServicePatch::config(config));
        Ok(())
    }

    /// Parse raw text for a field and set it
    pub fn set_config_input(&mut self, field: &str, raw: &str) -> Result<()> {
        let kind = self
            .config_fields()
            .into_iter()
            .find(|f| f.name == field)
            .map(|f| f.kind)
            .ok_or_else(|| WizardError::Validation {
                field: field.to_string(),
                message: "not an input of this pack".to_string(),
            })?;
        let value = pack_config::parse_config_input(field, kind, raw)?;
        self.update_config(field, value)
    }

    /// Existing services on this platform built from the same pack
    pub fn copy_candidates(&self) -> Vec<&ServiceSummary> {
        match &self.answers().pack {
            Some(pack) => self.platform.services_with_pack(&pack.id),
            None => Vec::new(),
        }
    }

    /// Overwrite the whole config with an existing service's config
    pub fn copy_config_from(&mut self, service_id: &str) -> Result<()> {
        self.expect_step(ServiceStep::Config, "copy a config")?;
        let config = self
            .copy_candidates()
            .into_iter()
            .find(|s| s.id == service_id)
            .map(|s| s.config.clone())
            .ok_or_else(|| WizardError::UnknownService(service_id.to_string()))?;

        log::debug!("Copying config of service '{}'", service_id);
        self.engine.update(ServicePatch::config(config));
        Ok(())
    }

    pub fn submit_config(&mut self) -> Result<ServiceStep> {
        self.expect_step(ServiceStep::Config, "submit the config")?;
        if let Some(pack) = &self.answers().pack {
            pack_config::validate_config(&pack.version.inputs, &self.answers().config)?;
        }
        Ok(self.engine.advance(ServicePatch::confirm_config(), |_| ServiceStep::Review))
    }

    // =========================================================================
    // Review / submit
    // =========================================================================

    pub fn review(&self) -> Option<ReviewSummary> {
        let answers = self.answers();
        Some(ReviewSummary {
            name: answers.name.clone()?,
            tags: answers.tags.clone(),
            summary: answers.summary()?,
            url: answers.domain_url(),
            source: answers.source.clone(),
            config: answers.config.clone(),
        })
    }

    /// Assemble the create request from the answers
    pub fn build_request(&self) -> Result<CreateServiceRequest> {
        let answers = self.answers();
        let name = answers.name.clone().ok_or(WizardError::Incomplete("name"))?;
        let pack = answers.pack.as_ref().ok_or(WizardError::Incomplete("build pack"))?;

        Ok(CreateServiceRequest {
            platform_id: self.platform.id.clone(),
            name,
            tags: answers.tags.clone(),
            source: answers.source.clone(),
            pack_id: pack.id.clone(),
            pack_config: answers.config.clone(),
            domain_id: answers.domain.as_ref().map(|d| d.domain_id.clone()),
            subdomain: answers.domain.as_ref().map(|d| d.subdomain.clone()),
        })
    }

    /// Mark a submit as outstanding and return the request to send
    pub fn begin_submit(&mut self) -> Result<CreateServiceRequest> {
        if self.submitting {
            return Err(WizardError::SubmitInFlight);
        }
        self.expect_step(ServiceStep::Review, "submit")?;
        let request = self.build_request()?;
        self.submitting = true;
        Ok(request)
    }

    /// Apply the API outcome. On failure the wizard stays on review, unchanged.
    /// On success the answers are dropped and only the service is kept.
    pub fn finish_submit(&mut self, result: std::result::Result<Service, PlatformApiError>) -> Result<&Service> {
        if !self.submitting {
            return Err(WizardError::WrongStep {
                step: self.step(),
                action: "finish a submit that was never started",
            });
        }
        self.submitting = false;
        match result {
            Ok(service) => {
                log::info!("Service '{}' created ({})", service.name, service.id);
                self.engine.advance(ServicePatch::default(), |_| ServiceStep::Created);
                let submitted = self.engine.take_answers();
                log::debug!("Discarded answers for '{}'", submitted.name.unwrap_or_default());
                let service: &Service = self.created.insert(service);
                Ok(service)
            }
            Err(e) => {
                log::warn!("Failed to create service: {}", e);
                Err(WizardError::Api(e))
            }
        }
    }

    /// Send the create request and wait for the outcome
    pub async fn submit(&mut self) -> Result<&Service> {
        let request = self.begin_submit()?;
        let api = self.api.clone();
        let result = api.create_service(&request).await;
        self.finish_submit(result)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Step back along the forward edge that led here
    pub fn back(&mut self) -> ServiceStep {
        let back = match self.step() {
            ServiceStep::BuildTarget => ServiceStep::NameTags,
            ServiceStep::Domain => ServiceStep::BuildTarget,
            ServiceStep::Source | ServiceStep::SourceReview => ServiceStep::Domain,
            ServiceStep::Config => before_config(self.answers()),
            ServiceStep::Review if !self.submitting => ServiceStep::Config,
            current => return current,
        };
        self.engine.retreat(|_| back)
    }

    /// Abandon the wizard and discard all answers
    pub fn cancel(&mut self) -> Result<()> {
        if self.submitting {
            return Err(WizardError::SubmitInFlight);
        }
        if self.step().is_terminal() {
            return Err(WizardError::WrongStep {
                step: self.step(),
                action: "cancel",
            });
        }
        log::debug!("Service wizard cancelled at {}", self.step());
        self.engine = WizardEngine::new(ServiceStep::Cancelled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::api::{InputKind, Language, PackInput, PackVersion, Result as ApiResult};
    use crate::source::RepoIdentity;
    use async_trait::async_trait;

    struct NoopApi;

    #[async_trait]
    impl ProvisioningApi for NoopApi {
        async fn create_service(&self, request: &CreateServiceRequest) -> ApiResult<Service> {
            Ok(Service {
                id: "svc-1".into(),
                name: request.name.clone(),
                platform_id: request.platform_id.clone(),
                pack_id: Some(request.pack_id.clone()),
                created_at: None,
            })
        }
    }

    fn pack(id: &str) -> BuildPack {
        BuildPack {
            id: id.into(),
            name: id.into(),
            kind: ServiceKind::Api,
            provider: CloudProvider::Aws,
            service: HostingService::Lambda,
            language: Some(Language::Typescript),
            latest: "2.0.0".into(),
            versions: vec![PackVersion {
                version: "2.0.0".into(),
                inputs: vec![PackInput {
                    name: "timeout".into(),
                    label: None,
                    ui: InputKind::Number,
                    default: Some("3".into()),
                    description: None,
                    required: true,
                }],
            }],
        }
    }

    fn platform() -> Platform {
        Platform {
            id: "plat-1".into(),
            name: "demo".into(),
            has_connected_github_app: false,
            domains: vec![
                Domain { id: "d1".into(), domain: "example.com".into(), provider: CloudProvider::Aws },
                Domain { id: "d2".into(), domain: "example.dev".into(), provider: CloudProvider::Gcp },
            ],
            services: vec![ServiceSummary {
                id: "old".into(),
                name: "old-api".into(),
                pack_id: "ts-lambda".into(),
                config: [("timeout".to_string(), ConfigValue::Number(30))].into_iter().collect(),
            }],
        }
    }

    fn wizard() -> ServiceProvisioningWizard {
        ServiceProvisioningWizard::new(platform(), vec![pack("ts-lambda"), pack("py-lambda")], Arc::new(NoopApi))
    }

    fn source() -> SourceDescriptor {
        SourceDescriptor::public(&RepoIdentity {
            id: "1".into(),
            owner: "acme".into(),
            repo: "api".into(),
        })
        .with_branch("main")
    }

    fn to_domain(wizard: &mut ServiceProvisioningWizard) {
        wizard.submit_name_tags("api", vec![]).unwrap();
        wizard
            .submit_build_target(ServiceKind::Api, CloudProvider::Aws, HostingService::Lambda, "ts-lambda")
            .unwrap();
    }

    #[test]
    fn test_name_required() {
        let mut wizard = wizard();
        assert!(matches!(
            wizard.submit_name_tags("  ", vec![]),
            Err(WizardError::Validation { field, .. }) if field == "name"
        ));
        let tags = vec![Tag { name: "".into(), value: "x".into() }];
        assert!(wizard.submit_name_tags("api", tags).is_err());
        assert_eq!(wizard.step(), ServiceStep::NameTags);
    }

    #[test]
    fn test_wrong_step_rejected() {
        let mut wizard = wizard();
        assert!(matches!(
            wizard.skip_domain(),
            Err(WizardError::WrongStep { step: ServiceStep::NameTags, .. })
        ));
    }

    #[test]
    fn test_incompatible_target_rejected() {
        let mut wizard = wizard();
        wizard.submit_name_tags("api", vec![]).unwrap();
        let result =
            wizard.submit_build_target(ServiceKind::StaticWebsite, CloudProvider::Gcp, HostingService::Lambda, "ts-lambda");
        assert!(matches!(result, Err(WizardError::Validation { .. })));
        let result =
            wizard.submit_build_target(ServiceKind::Api, CloudProvider::Aws, HostingService::Lambda, "missing");
        assert!(matches!(result, Err(WizardError::UnknownPack(_))));
    }

    #[test]
    fn test_domains_follow_provider() {
        let mut wizard = wizard();
        to_domain(&mut wizard);
        let ids: Vec<&str> = wizard.domains().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1"]);
        assert!(matches!(wizard.submit_domain("d2", ""), Err(WizardError::UnknownDomain(_))));
        assert!(wizard.submit_domain("d1", "bad_label").is_err());
        assert_eq!(wizard.submit_domain("d1", "API").unwrap(), ServiceStep::Source);
        assert_eq!(wizard.answers().domain_url().unwrap(), "https://api.example.com");
    }

    #[test]
    fn test_reselecting_same_pack_keeps_config() {
        let mut wizard = wizard();
        to_domain(&mut wizard);
        wizard.skip_domain().unwrap();
        wizard.submit_source(source()).unwrap();
        wizard.update_config("timeout", ConfigValue::Number(10)).unwrap();

        // back to build target
        wizard.back();
        wizard.back();
        assert_eq!(wizard.back(), ServiceStep::BuildTarget);

        wizard
            .submit_build_target(ServiceKind::Api, CloudProvider::Aws, HostingService::Lambda, "ts-lambda")
            .unwrap();
        assert_eq!(wizard.answers().config["timeout"], ConfigValue::Number(10));

        wizard.back();
        wizard
            .submit_build_target(ServiceKind::Api, CloudProvider::Aws, HostingService::Lambda, "py-lambda")
            .unwrap();
        assert_eq!(wizard.answers().config["timeout"], ConfigValue::Number(3));
    }

    #[test]
    fn test_skip_source_submits_null() {
        let mut wizard = wizard();
        to_domain(&mut wizard);
        wizard.skip_domain().unwrap();
        assert_eq!(wizard.skip_source().unwrap(), ServiceStep::Config);
        wizard.submit_config().unwrap();

        let request = wizard.build_request().unwrap();
        assert!(request.source.is_none());
        assert!(request.domain_id.is_none());
        assert!(request.subdomain.is_none());
        assert_eq!(wizard.back(), ServiceStep::Config);
        assert_eq!(wizard.back(), ServiceStep::Source);
    }

    #[test]
    fn test_copy_config_overwrites() {
        let mut wizard = wizard();
        to_domain(&mut wizard);
        wizard.skip_domain().unwrap();
        wizard.skip_source().unwrap();

        assert_eq!(wizard.copy_candidates().len(), 1);
        assert!(matches!(wizard.copy_config_from("nope"), Err(WizardError::UnknownService(_))));
        wizard.copy_config_from("old").unwrap();
        assert_eq!(wizard.answers().config["timeout"], ConfigValue::Number(30));
        assert_eq!(wizard.step(), ServiceStep::Config);
    }

    #[test]
    fn test_config_input_type_checked() {
        let mut wizard = wizard();
        to_domain(&mut wizard);
        wizard.skip_domain().unwrap();
        wizard.skip_source().unwrap();

        assert!(wizard.set_config_input("timeout", "soon").is_err());
        assert!(wizard.update_config("timeout", ConfigValue::Bool(true)).is_err());
        assert!(wizard.update_config("unknown", ConfigValue::Number(1)).is_err());
        wizard.set_config_input("timeout", "45").unwrap();
        assert_eq!(wizard.answers().config["timeout"], ConfigValue::Number(45));
    }

    #[test]
    fn test_review_summary() {
        let mut wizard = wizard();
        to_domain(&mut wizard);
        wizard.submit_domain("d1", "").unwrap();
        wizard.submit_source(source()).unwrap();
        wizard.submit_config().unwrap();

        let review = wizard.review().unwrap();
        assert_eq!(review.summary, "A typescript api running on aws lambda");
        assert_eq!(review.url.as_deref(), Some("https://example.com"));
        assert_eq!(review.source.unwrap().to_string(), "acme/api@main");
    }

    #[tokio::test]
    async fn test_submit_creates() {
        let mut wizard = wizard();
        to_domain(&mut wizard);
        wizard.skip_domain().unwrap();
        wizard.skip_source().unwrap();
        wizard.submit_config().unwrap();

        let service = wizard.submit().await.unwrap();
        assert_eq!(service.id, "svc-1");
        assert_eq!(wizard.step(), ServiceStep::Created);
        assert!(wizard.answers().name.is_none());
        assert!(wizard.answers().pack.is_none());
        assert_eq!(wizard.created().map(|s| s.id.as_str()), Some("svc-1"));
        assert!(wizard.cancel().is_err());
    }

    #[test]
    fn test_finish_without_begin_is_refused() {
        let mut wizard = wizard();
        to_domain(&mut wizard);
        wizard.skip_domain().unwrap();
        wizard.skip_source().unwrap();
        wizard.submit_config().unwrap();
        assert_eq!(wizard.back(), ServiceStep::Config);

        let service = Service {
            id: "svc-late".into(),
            name: "api".into(),
            platform_id: "plat-1".into(),
            pack_id: None,
            created_at: None,
        };
        assert!(matches!(
            wizard.finish_submit(Ok(service)),
            Err(WizardError::WrongStep { step: ServiceStep::Config, .. })
        ));
        assert_eq!(wizard.step(), ServiceStep::Config);
        assert!(wizard.created().is_none());
        assert_eq!(wizard.answers().name.as_deref(), Some("api"));
    }

    #[test]
    fn test_cancel_discards_answers() {
        let mut wizard = wizard();
        to_domain(&mut wizard);
        wizard.cancel().unwrap();
        assert_eq!(wizard.step(), ServiceStep::Cancelled);
        assert!(wizard.answers().name.is_none());
        assert_eq!(wizard.back(), ServiceStep::Cancelled);
    }
}
