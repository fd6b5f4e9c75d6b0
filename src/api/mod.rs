// ==========================================
// Metro Induction Planner - API layer
// ==========================================
// Entry point for the binaries: runs a plan and renders the JSON
// report or the structured error payload.
// ==========================================

pub mod dto;
pub mod error;
pub mod planning_api;

pub use dto::{AssignmentDetail, ErrorPayload, OptimizerSummary, PlanMetrics, PlanReport};
pub use error::{ApiError, ApiResult};
pub use planning_api::{PlanRequest, PlanningApi};
