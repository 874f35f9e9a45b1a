//! Wizard errors

use super::provisioning::ServiceStep;
use crate::platform::api::PlatformApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    /// User input was rejected before anything was sent
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The operation belongs to a different step
    #[error("Cannot {action} while on the {step} step")]
    WrongStep {
        step: ServiceStep,
        action: &'static str,
    },

    #[error("Unknown build pack '{0}' for the selected target")]
    UnknownPack(String),

    #[error("Unknown domain '{0}'")]
    UnknownDomain(String),

    #[error("No service '{0}' uses the selected pack")]
    UnknownService(String),

    #[error("A create request is already in flight")]
    SubmitInFlight,

    #[error("Cannot submit: {0} is missing")]
    Incomplete(&'static str),

    #[error(transparent)]
    Api(#[from] PlatformApiError),
}

pub type Result<T> = std::result::Result<T, WizardError>;
