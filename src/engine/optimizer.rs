// ==========================================
// Metro Induction Planner - constraint optimizer
// ==========================================
// Hard: exactly one status per train, no ineligible train in service,
//       maintenance bays, staff man-hours, optional min revenue
// Soft: mileage deviation, branding penalty, shunting cost, urgency
// ==========================================

mod assigner;
mod backend;
mod model;


pub use assigner::{ConstraintOptimizer, OptimizerRun};
pub use backend::{GoodLpBackend, MilpBackend, SolveOutcome, SolvePolicy};
pub use model::{AssignmentModel, TermCosts, TrainRow};
