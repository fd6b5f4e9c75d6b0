// ==========================================
// Metro Induction Planner - configuration layer
// ==========================================
// Run configuration with defaults, config_kv overrides and validation
// ==========================================

pub mod config_manager;
pub mod error;
pub mod planner_config;

pub use config_manager::ConfigManager;
pub use error::{ConfigError, ConfigResult};
pub use planner_config::{
    config_keys, parse_weight, EligibilityConfig, HeuristicConfig, ObjectiveWeights,
    OptimizerConfig, PlannerConfig, ResourceIds, MAINTENANCE_BAYS_RESOURCE,
    MAX_EXPIRY_WARNING_DAYS, REQUIRED_REVENUE, STAFF_HOURS_RESOURCE,
};
