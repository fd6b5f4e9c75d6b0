// ==========================================
// Metro Induction Planner - constraint optimizer
// ==========================================
// Capacity-aware strategy: builds the assignment model, hands it to a
// MilpBackend under the configured time budget, and reads the chosen
// status back per train. No fallback to a partial or heuristic answer.
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::solution::Solution;
use crate::domain::types::TrainStatus;
use crate::engine::optimizer::backend::{GoodLpBackend, MilpBackend, SolveOutcome, SolvePolicy};
use crate::engine::optimizer::model::{AssignmentModel, TermCosts};
use crate::engine::strategy::{AssignError, Assigner, AssignmentInput};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Record of the last successful solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerRun {
    pub solve_status: String,
    pub objective_value: f64,
    pub breakdown: TermCosts,
    pub elapsed_ms: u64,
    pub time_limit_secs: u64,
    pub search_workers: u32,
}

// ==========================================
// ConstraintOptimizer
// ==========================================
pub struct ConstraintOptimizer<B: MilpBackend> {
    backend: B,
    config: OptimizerConfig,
    last_run: Option<OptimizerRun>,
}

impl ConstraintOptimizer<GoodLpBackend> {
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self::with_backend(config, GoodLpBackend::new())
    }
}

impl<B: MilpBackend> ConstraintOptimizer<B> {
    pub fn with_backend(config: &OptimizerConfig, backend: B) -> Self {
        Self {
            backend,
            config: config.clone(),
            last_run: None,
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Summary of the most recent successful `assign`
    pub fn last_run(&self) -> Option<&OptimizerRun> {
        self.last_run.as_ref()
    }

    pub fn policy(&self) -> SolvePolicy {
        SolvePolicy::new(self.config.time_limit_secs, self.config.search_workers)
    }

    /// Rejects backend answers that break a hard constraint
    fn checked_choices(
        model: &AssignmentModel,
        choices: Vec<TrainStatus>,
    ) -> Result<Vec<TrainStatus>, AssignError> {
        if choices.len() != model.trains.len() {
            return Err(AssignError::InvalidModel(format!(
                "backend returned {} choices for {} trains",
                choices.len(),
                model.trains.len()
            )));
        }
        if !model.is_feasible(&choices) {
            return Err(AssignError::InvalidModel(
                "backend returned an assignment that violates a hard constraint".to_string(),
            ));
        }
        Ok(choices)
    }
}

impl<B: MilpBackend> Assigner for ConstraintOptimizer<B> {
    fn name(&self) -> &'static str {
        "optimizer"
    }

    #[instrument(skip_all, fields(trains = input.assessments.len(), backend = self.backend.name()))]
    fn assign(&mut self, input: &AssignmentInput<'_>) -> Result<Solution, AssignError> {
        self.last_run = None;

        let model =
            AssignmentModel::build(input.assessments, input.capacity, input.stats, &self.config);
        model.validate()?;

        let policy = self.policy();
        info!(
            trains = model.trains.len(),
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            time_limit_secs = self.config.time_limit_secs,
            workers = self.config.search_workers,
            "solving assignment model"
        );

        let started = Instant::now();
        let outcome = self.backend.solve(&model, &policy);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let status = outcome.status_name();

        let choices = match outcome {
            SolveOutcome::Optimal(choices) | SolveOutcome::Feasible(choices) => {
                Self::checked_choices(&model, choices)?
            }
            SolveOutcome::Infeasible | SolveOutcome::Unknown | SolveOutcome::TimedOut => {
                warn!(status, elapsed_ms, "no solution found");
                return Err(AssignError::NoSolution {
                    status: status.to_string(),
                });
            }
        };

        let breakdown = model.breakdown(&choices);
        let mut solution = Solution::new();
        for (row, status) in model.trains.iter().zip(&choices) {
            solution.assign(row.trainset_id.as_str(), *status);
        }

        info!(
            status,
            objective = breakdown.total(),
            elapsed_ms,
            revenue = solution.count(TrainStatus::RevenueService),
            standby = solution.count(TrainStatus::Standby),
            maintenance = solution.count(TrainStatus::Maintenance),
            "optimizer assignment done"
        );

        self.last_run = Some(OptimizerRun {
            solve_status: status.to_string(),
            objective_value: breakdown.total(),
            breakdown,
            elapsed_ms,
            time_limit_secs: self.config.time_limit_secs,
            search_workers: self.config.search_workers,
        });
        Ok(solution)
    }
}
