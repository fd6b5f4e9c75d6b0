// ==========================================
// Metro Induction Planner - repository layer
// ==========================================
// Repository code holds no business rules: it types rows and checks shape.
// All queries are parameterized or constant.
// ==========================================

pub mod error;
pub mod snapshot_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use snapshot_repo::{parse_snapshot_date, SnapshotRepository};
