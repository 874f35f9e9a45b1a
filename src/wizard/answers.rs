//! Answers collected by the service provisioning wizard

use super::build_target::DeploymentTarget;
use super::engine::WizardAnswers;
use crate::platform::api::{BuildPackRef, PackConfig, Tag};
use crate::source::SourceDescriptor;

/// Custom domain picked on the domain step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainChoice {
    pub domain_id: String,
    pub domain: String,
    /// Empty means the apex domain
    pub subdomain: String,
}

impl DomainChoice {
    /// Public URL the service will answer on
    pub fn url(&self) -> String {
        if self.subdomain.is_empty() {
            format!("https://{}", self.domain)
        } else {
            format!("https://{}.{}", self.subdomain, self.domain)
        }
    }
}

/// Which step led into the config step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRoute {
    Source,
    SourceReview,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceAnswers {
    pub name: Option<String>,
    pub tags: Vec<Tag>,
    pub target: Option<DeploymentTarget>,
    pub pack: Option<BuildPackRef>,
    pub config: PackConfig,
    /// `None` when the domain step was skipped
    pub domain: Option<DomainChoice>,
    /// `None` until a source is chosen, and after the source step is skipped
    pub source: Option<SourceDescriptor>,
    pub source_route: Option<SourceRoute>,
    /// The config step was submitted
    pub config_confirmed: bool,
}

impl ServiceAnswers {
    /// "A typescript api running on aws lambda"
    pub fn summary(&self) -> Option<String> {
        let pack = self.pack.as_ref()?;
        let what = match pack.language {
            Some(language) => format!("{} {}", language, pack.kind),
            None => pack.kind.to_string(),
        };
        Some(format!(
            "A {} running on {} {}",
            what, pack.provider, pack.service
        ))
    }

    pub fn domain_url(&self) -> Option<String> {
        self.domain.as_ref().map(DomainChoice::url)
    }
}

/// Partial answers produced by one step. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub tags: Option<Vec<Tag>>,
    pub target: Option<DeploymentTarget>,
    pub pack: Option<BuildPackRef>,
    pub config: Option<PackConfig>,
    pub domain: Option<Option<DomainChoice>>,
    pub source: Option<Option<SourceDescriptor>>,
    pub source_route: Option<SourceRoute>,
    pub config_confirmed: Option<bool>,
}

impl ServicePatch {
    pub fn name_tags(name: String, tags: Vec<Tag>) -> Self {
        Self {
            name: Some(name),
            tags: Some(tags),
            ..Default::default()
        }
    }

    /// `config` is `None` when the previous config should be kept
    pub fn build_target(target: DeploymentTarget, pack: BuildPackRef, config: Option<PackConfig>) -> Self {
        Self {
            target: Some(target),
            pack: Some(pack),
            config,
            ..Default::default()
        }
    }

    pub fn domain(choice: Option<DomainChoice>) -> Self {
        Self {
            domain: Some(choice),
            ..Default::default()
        }
    }

    pub fn source(source: Option<SourceDescriptor>, route: SourceRoute) -> Self {
        Self {
            source: Some(source),
            source_route: Some(route),
            ..Default::default()
        }
    }

    pub fn route(route: SourceRoute) -> Self {
        Self {
            source_route: Some(route),
            ..Default::default()
        }
    }

    pub fn config(config: PackConfig) -> Self {
        Self {
            config: Some(config),
            ..Default::default()
        }
    }

    pub fn confirm_config() -> Self {
        Self {
            config_confirmed: Some(true),
            ..Default::default()
        }
    }
}

impl WizardAnswers for ServiceAnswers {
    type Patch = ServicePatch;

    fn merge(&mut self, patch: ServicePatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(target) = patch.target {
            self.target = Some(target);
        }
        if let Some(pack) = patch.pack {
            self.pack = Some(pack);
        }
        if let Some(config) = patch.config {
            self.config = config;
        }
        if let Some(domain) = patch.domain {
            self.domain = domain;
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
        if let Some(route) = patch.source_route {
            self.source_route = Some(route);
        }
        if let Some(confirmed) = patch.config_confirmed {
            self.config_confirmed = confirmed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::api::{CloudProvider, HostingService, Language, PackVersion, ServiceKind};

    fn pack_ref(language: Option<Language>) -> BuildPackRef {
        BuildPackRef {
            id: "p1".into(),
            name: "ts-lambda".into(),
            kind: ServiceKind::Api,
            provider: CloudProvider::Aws,
            service: HostingService::Lambda,
            language,
            version: PackVersion {
                version: "1.0.0".into(),
                inputs: vec![],
            },
        }
    }

    #[test]
    fn test_domain_url() {
        let mut choice = DomainChoice {
            domain_id: "d1".into(),
            domain: "example.com".into(),
            subdomain: "api".into(),
        };
        assert_eq!(choice.url(), "https://api.example.com");
        choice.subdomain.clear();
        assert_eq!(choice.url(), "https://example.com");
    }

    #[test]
    fn test_summary() {
        let mut answers = ServiceAnswers::default();
        assert_eq!(answers.summary(), None);

        answers.pack = Some(pack_ref(Some(Language::Typescript)));
        assert_eq!(answers.summary().unwrap(), "A typescript api running on aws lambda");

        answers.pack = Some(pack_ref(None));
        assert_eq!(answers.summary().unwrap(), "A api running on aws lambda");
    }

    #[test]
    fn test_merge_leaves_absent_fields() {
        let mut answers = ServiceAnswers::default();
        answers.merge(ServicePatch::name_tags("api".into(), vec![]));
        answers.merge(ServicePatch::domain(None));
        answers.merge(ServicePatch::confirm_config());

        assert_eq!(answers.name.as_deref(), Some("api"));
        assert!(answers.config_confirmed);

        answers.merge(ServicePatch::route(SourceRoute::SourceReview));
        assert_eq!(answers.name.as_deref(), Some("api"));
        assert_eq!(answers.source_route, Some(SourceRoute::SourceReview));
    }
}
