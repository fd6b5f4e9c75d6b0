// ==========================================
// Metro Induction Planner - domain layer
// ==========================================
// Entity rows, status types, snapshot, assessment, solution.
// No data access and no engine logic here.
// ==========================================

pub mod assessment;
pub mod fleet;
pub mod snapshot;
pub mod solution;
pub mod types;

pub use assessment::{Assessment, Eligibility, IneligibilityReason, SoftScores};
pub use fleet::{BrandingSla, Certificate, DepotResource, JobCard, ShuntingCost, Trainset};
pub use snapshot::{FleetIndex, FleetSnapshot};
pub use solution::Solution;
pub use types::{
    BrandingStatus, CertStatus, EligibilityPolicy, JobCardStatus, JobStatus, TrainStatus,
};
