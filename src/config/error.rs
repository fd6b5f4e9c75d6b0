// ==========================================
// Metro Induction Planner - configuration errors
// ==========================================
// Tool: thiserror derive
// ==========================================

use thiserror::Error;

/// Configuration errors (raised before any data is loaded)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("weight {name} must be a non-negative number, got '{value}'")]
    MalformedWeight { name: String, value: String },

    #[error("invalid value for {key}: '{value}' ({message})")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("usage: {0}")]
    Usage(String),

    #[error("failed to read configuration overrides: {0}")]
    ReadError(String),
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::ReadError(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
