// ==========================================
// Metro Induction Planner - assignment strategies
// ==========================================
// Two named strategies behind one contract:
// - heuristic: greedy ranking, capacity-agnostic, lenient eligibility
// - optimizer: integer program, capacity-aware, strict eligibility
// ==========================================

use crate::domain::assessment::Assessment;
use crate::domain::solution::Solution;
use crate::domain::types::EligibilityPolicy;
use crate::engine::capacity::CapacityModel;
use crate::engine::scoring::FleetStats;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Assignment strategy selected per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignStrategy {
    Heuristic,
    Optimizer,
}

impl AssignStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignStrategy::Heuristic => "heuristic",
            AssignStrategy::Optimizer => "optimizer",
        }
    }

    /// Eligibility policy used when the configuration does not name one
    pub fn default_policy(&self) -> EligibilityPolicy {
        match self {
            AssignStrategy::Heuristic => EligibilityPolicy::Lenient,
            AssignStrategy::Optimizer => EligibilityPolicy::Strict,
        }
    }

    /// Whether the strategy enforces bay and man-hour limits
    pub fn enforces_capacity(&self) -> bool {
        matches!(self, AssignStrategy::Optimizer)
    }
}

impl Default for AssignStrategy {
    fn default() -> Self {
        AssignStrategy::Heuristic
    }
}

impl std::fmt::Display for AssignStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssignStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" | "greedy" => Ok(AssignStrategy::Heuristic),
            "optimizer" | "milp" | "ilp" => Ok(AssignStrategy::Optimizer),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

// ==========================================
// Assigner contract
// ==========================================

/// Input shared by every assigner
#[derive(Debug, Clone, Copy)]
pub struct AssignmentInput<'a> {
    /// One per train, ordered by trainset id
    pub assessments: &'a [Assessment],
    pub capacity: &'a CapacityModel,
    pub stats: &'a FleetStats,
}

/// Terminal assignment failures (never retried)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssignError {
    #[error("Insufficient eligible trains: {available} available, {required} required")]
    InsufficientEligibleTrains { available: usize, required: usize },

    #[error("no solution found (solver status: {status})")]
    NoSolution { status: String },

    #[error("invalid assignment model: {0}")]
    InvalidModel(String),
}

/// Turns assessments into a total fleet assignment
pub trait Assigner {
    fn name(&self) -> &'static str;

    /// # Errors
    /// A failed run yields no partial assignment.
    fn assign(&mut self, input: &AssignmentInput<'_>) -> Result<Solution, AssignError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse_and_policy() {
        assert_eq!("Optimizer".parse::<AssignStrategy>().unwrap(), AssignStrategy::Optimizer);
        assert_eq!("heuristic".parse::<AssignStrategy>().unwrap(), AssignStrategy::Heuristic);
        assert!("annealing".parse::<AssignStrategy>().is_err());

        assert_eq!(AssignStrategy::Heuristic.default_policy(), EligibilityPolicy::Lenient);
        assert_eq!(AssignStrategy::Optimizer.default_policy(), EligibilityPolicy::Strict);
        assert!(AssignStrategy::Optimizer.enforces_capacity());
        assert!(!AssignStrategy::Heuristic.enforces_capacity());
    }

    #[test]
    fn test_insufficient_message() {
        let err = AssignError::InsufficientEligibleTrains {
            available: 12,
            required: 16,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient eligible trains: 12 available, 16 required"
        );
    }
}
