// ==========================================
// Metro Induction Planner - command line
// ==========================================
// metro-induction <db_path> <w_mileage> <w_branding> [flags]
// Every value is checked here, before the database is opened.
// ==========================================

use crate::api::PlanRequest;
use crate::config::{config_keys, parse_weight, ConfigError, ConfigResult, PlannerConfig};
use crate::engine::strategy::AssignStrategy;
use chrono::NaiveDate;

pub const USAGE: &str = "metro-induction <db_path> <w_mileage> <w_branding> \
[--strategy heuristic|optimizer] [--date YYYY-MM-DD] [--w-shunting N] [--w-urgency N] \
[--time-limit SECS] [--workers N] [--seed N] [--min-revenue N] [--policy lenient|strict] [--log-json]";

/// Parsed invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub db_path: String,
    pub strategy: AssignStrategy,
    /// None: local current date
    pub reference_date: Option<NaiveDate>,
    pub w_mileage: f64,
    pub w_branding: f64,
    /// Flag overrides as config keys, in command-line order
    pub overrides: Vec<(String, String)>,
    pub log_json: bool,
}

impl CliArgs {
    /// Positional weights target the weights of the chosen strategy
    pub fn weight_keys(&self) -> (&'static str, &'static str) {
        match self.strategy {
            AssignStrategy::Heuristic => (config_keys::W_MILEAGE, config_keys::W_BRANDING),
            AssignStrategy::Optimizer => (config_keys::OPT_W_MILEAGE, config_keys::OPT_W_BRANDING),
        }
    }

    pub fn into_request(self, today: NaiveDate) -> PlanRequest {
        let (mileage_key, branding_key) = self.weight_keys();
        let mut request = PlanRequest::new(self.strategy, self.reference_date.unwrap_or(today))
            .with_override(mileage_key, self.w_mileage.to_string())
            .with_override(branding_key, self.w_branding.to_string());
        request.overrides.extend(self.overrides);
        request
    }
}

/// Maps a value flag to its config key
fn flag_key(flag: &str) -> Option<&'static str> {
    match flag {
        "--w-shunting" => Some(config_keys::OPT_W_SHUNTING),
        "--w-urgency" => Some(config_keys::OPT_W_URGENCY),
        "--time-limit" => Some(config_keys::OPT_TIME_LIMIT),
        "--workers" => Some(config_keys::OPT_WORKERS),
        "--seed" => Some(config_keys::HEURISTIC_SEED),
        "--min-revenue" => Some(config_keys::OPT_MIN_REVENUE),
        "--policy" => Some(config_keys::ELIGIBILITY_POLICY),
        _ => None,
    }
}

/// Parses the arguments after the program name
///
/// # Errors
/// - Usage: missing positional, unknown flag, flag without value
/// - MalformedWeight: non-numeric or negative weight
/// - InvalidValue: bad strategy, date or flag value
pub fn parse_args<I, S>(args: I) -> ConfigResult<CliArgs>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut positional: Vec<String> = Vec::new();
    let mut strategy = AssignStrategy::default();
    let mut reference_date = None;
    let mut overrides: Vec<(String, String)> = Vec::new();
    let mut log_json = false;

    // values are checked against a scratch config as they are read
    let mut scratch = PlannerConfig::default();

    let mut iter = args.into_iter().map(Into::into);
    while let Some(arg) = iter.next() {
        if !arg.starts_with("--") {
            positional.push(arg);
            continue;
        }
        if arg == "--log-json" {
            log_json = true;
            continue;
        }
        if arg == "--help" {
            return Err(ConfigError::Usage(USAGE.to_string()));
        }

        let value = iter
            .next()
            .ok_or_else(|| ConfigError::Usage(format!("{} needs a value; {}", arg, USAGE)))?;

        match arg.as_str() {
            "--strategy" => {
                strategy = value.parse().map_err(|e: String| ConfigError::InvalidValue {
                    key: "strategy".to_string(),
                    value: value.clone(),
                    message: e,
                })?;
            }
            "--date" => {
                let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
                    ConfigError::InvalidValue {
                        key: "date".to_string(),
                        value: value.clone(),
                        message: e.to_string(),
                    }
                })?;
                reference_date = Some(date);
            }
            flag => {
                let key = flag_key(flag)
                    .ok_or_else(|| ConfigError::Usage(format!("unknown flag {}; {}", flag, USAGE)))?;
                scratch.apply_override(key, &value)?;
                overrides.push((key.to_string(), value));
            }
        }
    }

    if positional.len() != 3 {
        return Err(ConfigError::Usage(USAGE.to_string()));
    }
    let w_mileage = parse_weight(config_keys::W_MILEAGE, &positional[1])?;
    let w_branding = parse_weight(config_keys::W_BRANDING, &positional[2])?;

    Ok(CliArgs {
        db_path: positional[0].clone(),
        strategy,
        reference_date,
        w_mileage,
        w_branding,
        overrides,
        log_json,
    })
}
