// ==========================================
// Metro Induction Planner - API error taxonomy
// ==========================================
// Converts layer errors into the four faults a caller can act on.
// Every fault is reported as a structured payload, never retried.
// ==========================================

use crate::config::ConfigError;
use crate::engine::strategy::AssignError;
use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API-level errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Snapshot unreadable, schema mismatch, bad field value
    #[error("input fault: {0}")]
    InputFault(String),

    /// Heuristic path only
    #[error("Insufficient eligible trains: {available} available, {required} required")]
    InsufficientEligibleTrains { available: usize, required: usize },

    /// Optimizer returned no usable assignment
    #[error("no solution found (solver status: {status})")]
    NoSolution { status: String },

    /// Rejected before any data is loaded
    #[error("malformed configuration: {0}")]
    MalformedConfiguration(String),
}

impl ApiError {
    /// Stable machine-readable code
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InputFault(_) => "INPUT_FAULT",
            ApiError::InsufficientEligibleTrains { .. } => "INSUFFICIENT_ELIGIBLE_TRAINS",
            ApiError::NoSolution { .. } => "NO_SOLUTION",
            ApiError::MalformedConfiguration(_) => "MALFORMED_CONFIGURATION",
        }
    }

    /// Process exit code (never 0)
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::MalformedConfiguration(_) => 2,
            ApiError::InputFault(_) => 3,
            ApiError::InsufficientEligibleTrains { .. } => 4,
            ApiError::NoSolution { .. } => 5,
        }
    }
}

// ==========================================
// Layer conversions
// ==========================================

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::InputFault(err.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::InputFault(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            // override table unreadable: the snapshot database is at fault
            ConfigError::ReadError(msg) => ApiError::InputFault(msg),
            other => ApiError::MalformedConfiguration(other.to_string()),
        }
    }
}

impl From<AssignError> for ApiError {
    fn from(err: AssignError) -> Self {
        match err {
            AssignError::InsufficientEligibleTrains {
                available,
                required,
            } => ApiError::InsufficientEligibleTrains {
                available,
                required,
            },
            AssignError::NoSolution { status } => ApiError::NoSolution { status },
            AssignError::InvalidModel(msg) => ApiError::NoSolution {
                status: format!("MODEL_INVALID: {}", msg),
            },
        }
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;
