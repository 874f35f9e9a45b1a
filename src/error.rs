use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parsing failed: {0}")]
    ParsingFailed(String),

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
