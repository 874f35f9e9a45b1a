//! Deployment target selection
//!
//! A deployment target is a (service kind, cloud provider, hosting service)
//! triple. Only triples in the compatibility table exist, and the choices
//! offered to the user are further narrowed to those with at least one pack
//! in the catalog.

use crate::platform::api::{BuildPack, CloudProvider, HostingService, PackFilter, ServiceKind};
use std::collections::BTreeSet;
use std::fmt;

use CloudProvider::*;
use HostingService::*;
use ServiceKind::*;

/// Every supported (kind, provider, service) combination
const COMPATIBILITY: &[(ServiceKind, CloudProvider, HostingService)] = &[
    (Api, Aws, Lambda),
    (Api, Aws, Ec2),
    (Api, Aws, Ecs),
    (Api, Gcp, CloudRun),
    (Api, Gcp, CloudFunction),
    (Api, Vercel, ServerlessFunctions),
    (StaticWebsite, Aws, S3),
    (TaskRunner, Aws, CodeBuild),
    (WebsocketServer, Aws, Ec2),
    (WebsocketServer, Aws, Ecs),
    (WebsocketServer, Gcp, CloudRun),
    (App, Aws, Ecs),
    (App, Gcp, CloudRun),
    (App, Vercel, ServerlessFunctions),
];

pub fn is_compatible(kind: ServiceKind, provider: CloudProvider, service: HostingService) -> bool {
    COMPATIBILITY.contains(&(kind, provider, service))
}

/// A compatible kind × provider × service triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeploymentTarget {
    kind: ServiceKind,
    provider: CloudProvider,
    service: HostingService,
}

impl DeploymentTarget {
    /// Returns `None` for combinations that do not exist
    pub fn new(kind: ServiceKind, provider: CloudProvider, service: HostingService) -> Option<Self> {
        is_compatible(kind, provider, service).then_some(Self {
            kind,
            provider,
            service,
        })
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn provider(&self) -> CloudProvider {
        self.provider
    }

    pub fn service(&self) -> HostingService {
        self.service
    }

    /// Catalog filter selecting packs for exactly this target
    pub fn filter(&self) -> PackFilter {
        PackFilter {
            provider: Some(self.provider),
            kind: Some(self.kind),
            service: Some(self.service),
        }
    }

    /// Targets a pack can be deployed to (zero or one)
    pub fn of_pack(pack: &BuildPack) -> Option<Self> {
        Self::new(pack.kind, pack.provider, pack.service)
    }
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.provider, self.service)
    }
}

/// Selectable choices on the build-target step, narrowed by the catalog
#[derive(Debug, Clone, Copy)]
pub struct BuildTargetOptions<'a> {
    packs: &'a [BuildPack],
}

impl<'a> BuildTargetOptions<'a> {
    pub fn new(packs: &'a [BuildPack]) -> Self {
        Self { packs }
    }

    fn targets(&self) -> impl Iterator<Item = DeploymentTarget> + '_ {
        self.packs.iter().filter_map(DeploymentTarget::of_pack)
    }

    /// Kinds with at least one deployable pack
    pub fn kinds(&self) -> Vec<ServiceKind> {
        let set: BTreeSet<_> = self.targets().map(|t| t.kind).collect();
        set.into_iter().collect()
    }

    pub fn providers(&self, kind: ServiceKind) -> Vec<CloudProvider> {
        let set: BTreeSet<_> = self
            .targets()
            .filter(|t| t.kind == kind)
            .map(|t| t.provider)
            .collect();
        set.into_iter().collect()
    }

    pub fn services(&self, kind: ServiceKind, provider: CloudProvider) -> Vec<HostingService> {
        let set: BTreeSet<_> = self
            .targets()
            .filter(|t| t.kind == kind && t.provider == provider)
            .map(|t| t.service)
            .collect();
        set.into_iter().collect()
    }

    /// Packs deployable to `target`
    pub fn packs(&self, target: &DeploymentTarget) -> Vec<&'a BuildPack> {
        let filter = target.filter();
        self.packs.iter().filter(|p| filter.matches(p)).collect()
    }

    pub fn find_pack(&self, target: &DeploymentTarget, pack_id: &str) -> Option<&'a BuildPack> {
        self.packs(target).into_iter().find(|p| p.id == pack_id)
    }
}
