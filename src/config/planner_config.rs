// ==========================================
// Metro Induction Planner - run configuration
// ==========================================
// Resolution order: defaults -> config_kv rows -> CLI flags.
// Every override goes through `apply_override` so the parsing and
// validation rules are the same for every source.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::EligibilityPolicy;
use serde::{Deserialize, Serialize};

/// Revenue-service slots filled by the heuristic assigner
pub const REQUIRED_REVENUE: usize = 16;

/// Depot resource id of the maintenance bay count
pub const MAINTENANCE_BAYS_RESOURCE: &str = "IBL_Bays";

/// Depot resource id of the staff man-hour budget
pub const STAFF_HOURS_RESOURCE: &str = "Cleaning_Staff_ManHours";

/// Upper bound of the EXPIRING_SOON window (ten years)
pub const MAX_EXPIRY_WARNING_DAYS: i64 = 3650;

/// Configuration keys accepted by `apply_override`
pub mod config_keys {
    pub const W_MILEAGE: &str = "w_mileage";
    pub const W_BRANDING: &str = "w_branding";
    pub const REQUIRED_REVENUE: &str = "required_revenue";

    pub const HEURISTIC_MAINTENANCE_HOURS: &str = "heuristic.maintenance_hours_threshold";
    pub const HEURISTIC_SEED: &str = "heuristic.seed";

    pub const OPT_W_MILEAGE: &str = "optimizer.w_mileage";
    pub const OPT_W_BRANDING: &str = "optimizer.w_branding";
    pub const OPT_W_SHUNTING: &str = "optimizer.w_shunting";
    pub const OPT_W_URGENCY: &str = "optimizer.w_urgency";
    pub const OPT_TIME_LIMIT: &str = "optimizer.time_limit_secs";
    pub const OPT_WORKERS: &str = "optimizer.search_workers";
    pub const OPT_MIN_REVENUE: &str = "optimizer.min_revenue";
    pub const OPT_HARD_MAINTENANCE: &str = "optimizer.hard_maintenance_for_ineligible";

    pub const ELIGIBILITY_POLICY: &str = "eligibility.policy";
    pub const ELIGIBILITY_MIN_CERT_TYPES: &str = "eligibility.min_certificate_types";
    pub const ELIGIBILITY_WARNING_DAYS: &str = "eligibility.expiry_warning_days";

    pub const RESOURCE_BAYS_ID: &str = "resources.maintenance_bays_id";
    pub const RESOURCE_STAFF_ID: &str = "resources.staff_hours_id";
}

// ==========================================
// Sub-configurations
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Below-cutoff trains with more pending hours go to Maintenance
    pub maintenance_hours_threshold: f64,
    /// Jitter seed; None draws one from OS entropy
    pub seed: Option<u64>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            maintenance_hours_threshold: 10.0,
            seed: None,
        }
    }
}

/// Relative weights of the optimizer objective terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    pub mileage: f64,
    pub branding: f64,
    pub shunting: f64,
    pub urgency: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            mileage: 1.0,
            branding: 10_000.0,
            shunting: 10.0,
            urgency: 1_000_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub weights: ObjectiveWeights,
    pub time_limit_secs: u64,
    pub search_workers: u32,
    /// Optional lower bound on the Revenue Service count
    pub min_revenue: Option<usize>,
    /// Ineligible trains must go to Maintenance; false leaves only the urgency penalty
    pub hard_maintenance_for_ineligible: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            weights: ObjectiveWeights::default(),
            time_limit_secs: 60,
            search_workers: 8,
            min_revenue: None,
            hard_maintenance_for_ineligible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// None: use the default policy of the chosen strategy
    pub policy: Option<EligibilityPolicy>,
    pub min_certificate_types: usize,
    /// EXPIRING_SOON window in days (inclusive)
    pub expiry_warning_days: i64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            policy: None,
            min_certificate_types: 3,
            expiry_warning_days: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceIds {
    pub maintenance_bays_id: String,
    pub staff_hours_id: String,
}

impl Default for ResourceIds {
    fn default() -> Self {
        Self {
            maintenance_bays_id: MAINTENANCE_BAYS_RESOURCE.to_string(),
            staff_hours_id: STAFF_HOURS_RESOURCE.to_string(),
        }
    }
}

// ==========================================
// PlannerConfig
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Heuristic mileage weight
    pub w_mileage: f64,
    /// Heuristic branding weight
    pub w_branding: f64,
    pub required_revenue: usize,
    pub heuristic: HeuristicConfig,
    pub optimizer: OptimizerConfig,
    pub eligibility: EligibilityConfig,
    pub resources: ResourceIds,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            w_mileage: 10.0,
            w_branding: 100.0,
            required_revenue: REQUIRED_REVENUE,
            heuristic: HeuristicConfig::default(),
            optimizer: OptimizerConfig::default(),
            eligibility: EligibilityConfig::default(),
            resources: ResourceIds::default(),
        }
    }
}

impl PlannerConfig {
    /// Applies one textual override
    ///
    /// # Errors
    /// - MalformedWeight: non-numeric or negative weight
    /// - InvalidValue: any other unparsable value
    /// - UnknownKey: key not in `config_keys`
    pub fn apply_override(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        use config_keys::*;

        match key.trim() {
            W_MILEAGE => self.w_mileage = parse_weight(key, value)?,
            W_BRANDING => self.w_branding = parse_weight(key, value)?,
            REQUIRED_REVENUE => self.required_revenue = parse_usize(key, value)?,

            HEURISTIC_MAINTENANCE_HOURS => {
                self.heuristic.maintenance_hours_threshold = parse_non_negative(key, value)?
            }
            HEURISTIC_SEED => self.heuristic.seed = parse_optional_u64(key, value)?,

            OPT_W_MILEAGE => self.optimizer.weights.mileage = parse_weight(key, value)?,
            OPT_W_BRANDING => self.optimizer.weights.branding = parse_weight(key, value)?,
            OPT_W_SHUNTING => self.optimizer.weights.shunting = parse_weight(key, value)?,
            OPT_W_URGENCY => self.optimizer.weights.urgency = parse_weight(key, value)?,
            OPT_TIME_LIMIT => self.optimizer.time_limit_secs = parse_u64(key, value)?,
            OPT_WORKERS => {
                self.optimizer.search_workers = parse_u64(key, value)?.try_into().map_err(|_| {
                    invalid(key, value, "out of range")
                })?
            }
            OPT_MIN_REVENUE => {
                self.optimizer.min_revenue = parse_optional_u64(key, value)?.map(|v| v as usize)
            }
            OPT_HARD_MAINTENANCE => {
                self.optimizer.hard_maintenance_for_ineligible = parse_bool(key, value)?
            }

            ELIGIBILITY_POLICY => {
                let trimmed = value.trim();
                self.eligibility.policy = if trimmed.is_empty() || trimmed == "default" {
                    None
                } else {
                    Some(
                        trimmed
                            .parse::<EligibilityPolicy>()
                            .map_err(|e| invalid(key, value, &e))?,
                    )
                };
            }
            ELIGIBILITY_MIN_CERT_TYPES => {
                self.eligibility.min_certificate_types = parse_usize(key, value)?
            }
            ELIGIBILITY_WARNING_DAYS => {
                self.eligibility.expiry_warning_days = i64::try_from(parse_u64(key, value)?)
                    .map_err(|_| invalid(key, value, "window too large"))?
            }

            RESOURCE_BAYS_ID => self.resources.maintenance_bays_id = parse_id(key, value)?,
            RESOURCE_STAFF_ID => self.resources.staff_hours_id = parse_id(key, value)?,

            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Checks cross-field rules after all overrides are applied
    pub fn validate(&self) -> ConfigResult<()> {
        let weights = [
            (config_keys::W_MILEAGE, self.w_mileage),
            (config_keys::W_BRANDING, self.w_branding),
            (config_keys::OPT_W_MILEAGE, self.optimizer.weights.mileage),
            (config_keys::OPT_W_BRANDING, self.optimizer.weights.branding),
            (config_keys::OPT_W_SHUNTING, self.optimizer.weights.shunting),
            (config_keys::OPT_W_URGENCY, self.optimizer.weights.urgency),
        ];
        for (name, w) in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::MalformedWeight {
                    name: name.to_string(),
                    value: w.to_string(),
                });
            }
        }

        if self.optimizer.time_limit_secs == 0 {
            return Err(invalid(
                config_keys::OPT_TIME_LIMIT,
                "0",
                "time limit must be at least one second",
            ));
        }
        if self.optimizer.search_workers == 0 {
            return Err(invalid(config_keys::OPT_WORKERS, "0", "need at least one worker"));
        }
        let warning_days = self.eligibility.expiry_warning_days;
        if !(0..=MAX_EXPIRY_WARNING_DAYS).contains(&warning_days) {
            return Err(invalid(
                config_keys::ELIGIBILITY_WARNING_DAYS,
                &warning_days.to_string(),
                "must be between 0 and 3650 days",
            ));
        }
        Ok(())
    }
}

// ==========================================
// Parsing helpers
// ==========================================

fn invalid(key: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

/// Parses a weight: finite and non-negative
pub fn parse_weight(name: &str, value: &str) -> ConfigResult<f64> {
    match value.trim().parse::<f64>() {
        Ok(w) if w.is_finite() && w >= 0.0 => Ok(w),
        _ => Err(ConfigError::MalformedWeight {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_non_negative(key: &str, value: &str) -> ConfigResult<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(invalid(key, value, "expected a non-negative number")),
    }
}

fn parse_u64(key: &str, value: &str) -> ConfigResult<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid(key, value, "expected a non-negative integer"))
}

fn parse_usize(key: &str, value: &str) -> ConfigResult<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid(key, value, "expected a non-negative integer"))
}

fn parse_optional_u64(key: &str, value: &str) -> ConfigResult<Option<u64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    parse_u64(key, trimmed).map(Some)
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn parse_id(key: &str, value: &str) -> ConfigResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(key, value, "resource id must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = PlannerConfig::default();
        assert_eq!(config.required_revenue, 16);
        assert_eq!(config.optimizer.weights.mileage, 1.0);
        assert_eq!(config.optimizer.weights.branding, 10_000.0);
        assert_eq!(config.optimizer.weights.shunting, 10.0);
        assert_eq!(config.optimizer.weights.urgency, 1_000_000.0);
        assert_eq!(config.optimizer.time_limit_secs, 60);
        assert_eq!(config.optimizer.search_workers, 8);
        assert_eq!(config.eligibility.expiry_warning_days, 7);
        assert_eq!(config.resources.maintenance_bays_id, "IBL_Bays");
        assert_eq!(config.resources.staff_hours_id, "Cleaning_Staff_ManHours");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_override_parses_each_kind() {
        let mut config = PlannerConfig::default();
        config.apply_override("w_mileage", "7.5").unwrap();
        config.apply_override("optimizer.w_urgency", "500").unwrap();
        config.apply_override("optimizer.min_revenue", "14").unwrap();
        config.apply_override("optimizer.hard_maintenance_for_ineligible", "false").unwrap();
        config.apply_override("eligibility.policy", "strict").unwrap();
        config.apply_override("heuristic.seed", "42").unwrap();

        assert_eq!(config.w_mileage, 7.5);
        assert_eq!(config.optimizer.weights.urgency, 500.0);
        assert_eq!(config.optimizer.min_revenue, Some(14));
        assert!(!config.optimizer.hard_maintenance_for_ineligible);
        assert_eq!(config.eligibility.policy, Some(EligibilityPolicy::Strict));
        assert_eq!(config.heuristic.seed, Some(42));
    }

    #[test]
    fn test_non_numeric_weight_is_malformed() {
        let mut config = PlannerConfig::default();
        let err = config.apply_override("w_branding", "lots").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedWeight { .. }));

        let err = config.apply_override("optimizer.w_shunting", "-1").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedWeight { .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut config = PlannerConfig::default();
        assert_eq!(
            config.apply_override("w_comfort", "1"),
            Err(ConfigError::UnknownKey("w_comfort".to_string()))
        );
    }

    #[test]
    fn test_validate_bounds_expiry_warning_window() {
        let mut config = PlannerConfig::default();
        config
            .apply_override("eligibility.expiry_warning_days", "100000000")
            .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "eligibility.expiry_warning_days"
        ));

        config
            .apply_override("eligibility.expiry_warning_days", "3650")
            .unwrap();
        assert!(config.validate().is_ok());

        assert!(matches!(
            config.apply_override("eligibility.expiry_warning_days", "18446744073709551615"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_time_limit() {
        let mut config = PlannerConfig::default();
        config.optimizer.time_limit_secs = 0;
        assert!(config.validate().is_err());
    }
}
