//! Service provisioning wizard
//!
//! A generic step engine, the service wizard built on it, and the terminal
//! driver used by `prov-ctl create-service`.

pub mod answers;
pub mod build_target;
pub mod engine;
mod error;
mod orchestrator;
pub mod pack_config;
pub mod provisioning;
mod render;

pub use answers::{DomainChoice, ServiceAnswers, ServicePatch, SourceRoute};
pub use build_target::{is_compatible, BuildTargetOptions, DeploymentTarget};
pub use engine::{WizardAnswers, WizardEngine, WizardStep};
pub use error::{Result, WizardError};
pub use orchestrator::{parse_tags, run_wizard, WizardResult};
pub use pack_config::{default_config, ConfigField};
pub use provisioning::{ReviewSummary, ServiceProvisioningWizard, ServiceStep};
pub use render::{count_badge, display_step_header, status_indicator, wizard_render_config};
