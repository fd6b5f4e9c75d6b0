// ==========================================
// Metro Induction Planner - engine layer
// ==========================================
// Business rules only; no SQL here.
// Every non-service decision carries a reason.
// ==========================================

pub mod capacity;
pub mod eligibility;
pub mod eligibility_core;
pub mod explainer;
pub mod heuristic;
pub mod optimizer;
pub mod orchestrator;
pub mod scoring;
pub mod strategy;

pub use capacity::{CapacityModel, CapacityUsage};
pub use eligibility::EligibilityAssessor;
pub use eligibility_core::{CertificateCheck, EligibilityCore, JobCheck};
pub use explainer::ResultExplainer;
pub use heuristic::HeuristicAssigner;
pub use optimizer::{ConstraintOptimizer, GoodLpBackend, MilpBackend, OptimizerRun, SolveOutcome};
pub use orchestrator::{PlanResult, PlanningOrchestrator, TrainOutcome};
pub use scoring::{FleetStats, ScoreCalculator};
pub use strategy::{AssignError, AssignStrategy, Assigner, AssignmentInput};
