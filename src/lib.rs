// ==========================================
// Metro Induction Planner - core library
// ==========================================
// Nightly induction plan: which trainsets run Revenue Service,
// stay on Standby, or go to Maintenance.
// Stack: Rust + SQLite snapshot + good_lp
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain - entities and types
pub mod domain;

// Repository - snapshot access
pub mod repository;

// Engine - business rules and assigners
pub mod engine;

// Importer - CSV seeding
pub mod importer;

// Config - run configuration
pub mod config;

// Database infrastructure (connection setup, schema)
pub mod db;

// Logging
pub mod logging;

// Command line parsing
pub mod cli;

// API - planning entry point
pub mod api;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    Assessment, BrandingSla, Certificate, DepotResource, Eligibility, EligibilityPolicy,
    FleetSnapshot, JobCard, ShuntingCost, Solution, Trainset, TrainStatus,
};

pub use engine::{
    AssignStrategy, Assigner, CapacityModel, ConstraintOptimizer, EligibilityAssessor,
    HeuristicAssigner, PlanningOrchestrator, ResultExplainer, ScoreCalculator,
};

pub use api::{ApiError, PlanReport, PlanRequest, PlanningApi};

pub use config::PlannerConfig;

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Metro Induction Planner";
