//! Build pack configuration
//!
//! Pack inputs declare a UI type and an optional default literal. This module
//! turns those declarations into typed defaults, parses user input for a field
//! and validates a finished config against the pack.

use super::error::{Result, WizardError};
use crate::platform::api::{ConfigValue, EnvVar, InputKind, PackConfig, PackInput};

/// Typed default for one input, if it has one.
///
/// Lists always start empty and flags always start set, `false` unless the
/// literal is exactly `"true"`. Text and numbers need a default literal.
pub fn default_value(input: &PackInput) -> Option<ConfigValue> {
    match input.ui {
        InputKind::Envars => Some(ConfigValue::EnvVars(Vec::new())),
        InputKind::String => input.default.clone().map(ConfigValue::Text),
        InputKind::Bool => Some(ConfigValue::Bool(input.default.as_deref() == Some("true"))),
        InputKind::Number => {
            let literal = input.default.as_deref()?;
            match literal.trim().parse::<i64>() {
                Ok(n) => Some(ConfigValue::Number(n)),
                Err(_) => {
                    log::warn!(
                        "Ignoring non-numeric default '{}' for input '{}'",
                        literal,
                        input.name
                    );
                    None
                }
            }
        }
    }
}

/// Config a freshly selected pack starts with
pub fn default_config(inputs: &[PackInput]) -> PackConfig {
    inputs
        .iter()
        .filter_map(|input| default_value(input).map(|v| (input.name.clone(), v)))
        .collect()
}

/// One editable field of the config step
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigField {
    pub name: String,
    pub label: String,
    pub kind: InputKind,
    pub description: Option<String>,
    pub required: bool,
    pub value: Option<ConfigValue>,
}

/// Fields for every pack input, filled from `config`
pub fn config_fields(inputs: &[PackInput], config: &PackConfig) -> Vec<ConfigField> {
    inputs
        .iter()
        .map(|input| ConfigField {
            name: input.name.clone(),
            label: input.label.clone().unwrap_or_else(|| input.name.clone()),
            kind: input.ui,
            description: input.description.clone(),
            required: input.required,
            value: config.get(&input.name).cloned(),
        })
        .collect()
}

/// Parse raw text typed for a field of the given kind.
///
/// Env vars are `KEY=VALUE` pairs separated by commas or newlines; a key
/// prefixed with `!` is stored as a secret.
pub fn parse_config_input(field: &str, kind: InputKind, raw: &str) -> Result<ConfigValue> {
    let raw = raw.trim();
    let invalid = |message: String| WizardError::Validation {
        field: field.to_string(),
        message,
    };

    match kind {
        InputKind::String => Ok(ConfigValue::Text(raw.to_string())),
        InputKind::Number => raw
            .parse::<i64>()
            .map(ConfigValue::Number)
            .map_err(|_| invalid(format!("'{}' is not a whole number", raw))),
        InputKind::Bool => match raw.to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Ok(ConfigValue::Bool(true)),
            "false" | "no" | "n" | "0" | "off" => Ok(ConfigValue::Bool(false)),
            _ => Err(invalid(format!("'{}' is not true or false", raw))),
        },
        InputKind::Envars => {
            let mut vars = Vec::new();
            for pair in raw.split([',', '\n']).map(str::trim).filter(|p| !p.is_empty()) {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| invalid(format!("'{}' is not KEY=VALUE", pair)))?;
                let (key, secret) = match key.trim().strip_prefix('!') {
                    Some(k) => (k, true),
                    None => (key.trim(), false),
                };
                if key.is_empty() {
                    return Err(invalid("environment variable name is empty".to_string()));
                }
                vars.push(EnvVar {
                    name: key.to_string(),
                    value: value.trim().to_string(),
                    secret,
                });
            }
            Ok(ConfigValue::EnvVars(vars))
        }
    }
}

/// Check a config against the pack's inputs: required inputs are present and
/// every value has its declared type. Keys the pack does not declare are kept.
pub fn validate_config(inputs: &[PackInput], config: &PackConfig) -> Result<()> {
    for input in inputs {
        match config.get(&input.name) {
            None if input.required => {
                return Err(WizardError::Validation {
                    field: input.name.clone(),
                    message: "a value is required".to_string(),
                });
            }
            Some(ConfigValue::Text(s)) if input.required && s.trim().is_empty() => {
                return Err(WizardError::Validation {
                    field: input.name.clone(),
                    message: "a value is required".to_string(),
                });
            }
            Some(value) if !value.matches_kind(input.ui) => {
                return Err(WizardError::Validation {
                    field: input.name.clone(),
                    message: format!("expected a {:?} value", input.ui).to_lowercase(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}
