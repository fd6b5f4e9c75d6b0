// ==========================================
// Metro Induction Planner - planning orchestrator
// ==========================================
// One planning run:
// snapshot → indexes → eligibility → scores → assigner → explanations
// Stateless across runs; the snapshot is never modified.
// ==========================================

use crate::config::PlannerConfig;
use crate::domain::assessment::Assessment;
use crate::domain::snapshot::FleetSnapshot;
use crate::domain::solution::Solution;
use crate::domain::types::{EligibilityPolicy, TrainStatus};
use crate::engine::capacity::{CapacityModel, CapacityUsage};
use crate::engine::eligibility::EligibilityAssessor;
use crate::engine::explainer::ResultExplainer;
use crate::engine::heuristic::HeuristicAssigner;
use crate::engine::optimizer::{ConstraintOptimizer, OptimizerRun};
use crate::engine::scoring::{FleetStats, ScoreCalculator};
use crate::engine::strategy::{AssignError, AssignStrategy, Assigner, AssignmentInput};
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

// ==========================================
// PlanResult - output of one run
// ==========================================

/// One train's final line
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub assessment: Assessment,
    pub status: TrainStatus,
    pub explanation: String,
}

#[derive(Debug, Clone)]
pub struct PlanResult {
    pub strategy: AssignStrategy,
    pub policy: EligibilityPolicy,
    pub reference_date: NaiveDate,
    /// Ordered by status (Revenue Service, Standby, Maintenance), then id
    pub trains: Vec<TrainOutcome>,
    pub solution: Solution,
    pub stats: FleetStats,
    pub capacity: CapacityModel,
    pub usage: CapacityUsage,
    /// Optimizer strategy only
    pub optimizer: Option<OptimizerRun>,
}

impl PlanResult {
    pub fn count(&self, status: TrainStatus) -> usize {
        self.solution.count(status)
    }
}

// ==========================================
// PlanningOrchestrator
// ==========================================
pub struct PlanningOrchestrator {
    config: PlannerConfig,
    scorer: ScoreCalculator,
}

impl PlanningOrchestrator {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            scorer: ScoreCalculator::new(),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Configured policy, else the strategy default
    pub fn resolve_policy(&self, strategy: AssignStrategy) -> EligibilityPolicy {
        self.config
            .eligibility
            .policy
            .unwrap_or_else(|| strategy.default_policy())
    }

    /// Eligibility + soft scores for every train, ordered by id
    pub fn assess(
        &self,
        snapshot: &FleetSnapshot,
        policy: EligibilityPolicy,
        reference_date: NaiveDate,
    ) -> (Vec<Assessment>, FleetStats) {
        let index = snapshot.index();
        let trainsets = snapshot.trainsets_sorted();
        let stats = FleetStats::from_trainsets(trainsets.iter().copied());

        let assessor = EligibilityAssessor::from_config(&self.config.eligibility, policy);
        let eligibility = assessor.assess_fleet(&trainsets, &index, reference_date);
        let assessments =
            self.scorer
                .assess_fleet(&trainsets, &index, &eligibility, &stats, reference_date);
        (assessments, stats)
    }

    /// Runs the configured assigner of `strategy`
    #[instrument(skip(self, snapshot), fields(trains = snapshot.trainsets.len()))]
    pub fn plan(
        &self,
        snapshot: &FleetSnapshot,
        strategy: AssignStrategy,
        reference_date: NaiveDate,
    ) -> Result<PlanResult, AssignError> {
        match strategy {
            AssignStrategy::Heuristic => {
                let mut assigner = HeuristicAssigner::from_config(&self.config);
                self.plan_with(snapshot, strategy, &mut assigner, reference_date)
            }
            AssignStrategy::Optimizer => {
                let mut optimizer = ConstraintOptimizer::from_config(&self.config.optimizer);
                let mut result =
                    self.plan_with(snapshot, strategy, &mut optimizer, reference_date)?;
                result.optimizer = optimizer.last_run().cloned();
                Ok(result)
            }
        }
    }

    /// Runs an explicit assigner (custom backends, seeded RNGs)
    pub fn plan_with<A: Assigner>(
        &self,
        snapshot: &FleetSnapshot,
        strategy: AssignStrategy,
        assigner: &mut A,
        reference_date: NaiveDate,
    ) -> Result<PlanResult, AssignError> {
        let policy = self.resolve_policy(strategy);
        info!(
            strategy = %strategy,
            assigner = assigner.name(),
            policy = %policy,
            reference_date = %reference_date,
            "planning run started"
        );

        let (assessments, stats) = self.assess(snapshot, policy, reference_date);
        let capacity = CapacityModel::from_snapshot(snapshot, &self.config.resources);

        let input = AssignmentInput {
            assessments: &assessments,
            capacity: &capacity,
            stats: &stats,
        };
        let solution = assigner.assign(&input)?;

        solution
            .verify_totality(assessments.iter().map(|a| a.trainset_id.as_str()))
            .map_err(AssignError::InvalidModel)?;
        if let Some(a) = assessments.iter().find(|a| {
            !a.is_eligible() && solution.status_of(&a.trainset_id) == Some(TrainStatus::RevenueService)
        }) {
            return Err(AssignError::InvalidModel(format!(
                "ineligible train {} assigned to Revenue Service",
                a.trainset_id
            )));
        }

        let usage = capacity.usage(&solution, &assessments);
        let explainer = self.explainer(strategy);

        let mut trains: Vec<TrainOutcome> = Vec::with_capacity(assessments.len());
        for assessment in assessments {
            let Some(status) = solution.status_of(&assessment.trainset_id) else {
                continue;
            };
            let explanation = explainer.explain(&assessment, status);
            debug!(trainset_id = %assessment.trainset_id, %status, %explanation, "assigned");
            trains.push(TrainOutcome {
                assessment,
                status,
                explanation,
            });
        }
        trains.sort_by(|a, b| {
            a.status
                .cmp(&b.status)
                .then_with(|| a.assessment.trainset_id.cmp(&b.assessment.trainset_id))
        });

        info!(
            revenue = solution.count(TrainStatus::RevenueService),
            standby = solution.count(TrainStatus::Standby),
            maintenance = solution.count(TrainStatus::Maintenance),
            capacity_exceeded = usage.exceeded(),
            "planning run finished"
        );

        Ok(PlanResult {
            strategy,
            policy,
            reference_date,
            trains,
            solution,
            stats,
            capacity,
            usage,
            optimizer: None,
        })
    }

    /// Explanation thresholds use the weights that drove the strategy
    fn explainer(&self, strategy: AssignStrategy) -> ResultExplainer {
        match strategy {
            AssignStrategy::Heuristic => {
                ResultExplainer::new(self.config.w_mileage, self.config.w_branding)
            }
            AssignStrategy::Optimizer => ResultExplainer::new(
                self.config.optimizer.weights.mileage,
                self.config.optimizer.weights.branding,
            ),
        }
    }
}
