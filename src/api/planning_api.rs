// ==========================================
// Metro Induction Planner - planning API
// ==========================================
// One call = one planning run:
// validate config → open snapshot → config_kv → request overrides
// → load → orchestrate → report
// ==========================================

use crate::api::dto::PlanReport;
use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, PlannerConfig};
use crate::db::open_sqlite_connection_read_only;
use crate::engine::orchestrator::PlanningOrchestrator;
use crate::engine::strategy::AssignStrategy;
use crate::repository::error::RepositoryError;
use crate::repository::SnapshotRepository;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

/// Parameters of one planning run
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub strategy: AssignStrategy,
    pub reference_date: NaiveDate,
    /// Applied after config_kv, in order (config key → raw value)
    pub overrides: Vec<(String, String)>,
}

impl PlanRequest {
    pub fn new(strategy: AssignStrategy, reference_date: NaiveDate) -> Self {
        Self {
            strategy,
            reference_date,
            overrides: Vec::new(),
        }
    }

    pub fn with_override(mut self, key: &str, value: impl Into<String>) -> Self {
        self.overrides.push((key.to_string(), value.into()));
        self
    }

    /// Defaults plus the request overrides (no database involved)
    fn request_config(&self) -> ApiResult<PlannerConfig> {
        let mut config = PlannerConfig::default();
        for (key, value) in &self.overrides {
            config.apply_override(key, value)?;
        }
        config.validate()?;
        Ok(config)
    }
}

// ==========================================
// PlanningApi
// ==========================================
pub struct PlanningApi {
    conn: Arc<Mutex<Connection>>,
}

impl PlanningApi {
    /// Wraps an already-open snapshot connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Opens the snapshot database read-only
    ///
    /// # Errors
    /// - InputFault: file missing or not a database
    pub fn open(db_path: &str) -> ApiResult<Self> {
        if !Path::new(db_path).exists() {
            return Err(ApiError::InputFault(format!(
                "snapshot database not found: {}",
                db_path
            )));
        }
        let conn = open_sqlite_connection_read_only(db_path).map_err(RepositoryError::from)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// Validates the request, opens `db_path` and runs the plan
    ///
    /// Malformed request overrides are rejected before the database is
    /// touched.
    pub fn run(db_path: &str, request: &PlanRequest) -> ApiResult<PlanReport> {
        request.request_config()?;
        Self::open(db_path)?.plan(request)
    }

    /// Effective configuration: defaults → config_kv → request overrides
    pub fn resolve_config(&self, request: &PlanRequest) -> ApiResult<PlannerConfig> {
        let mut config = PlannerConfig::default();
        let stored = ConfigManager::from_connection(self.conn.clone()).apply_to(&mut config)?;
        for (key, value) in &request.overrides {
            config.apply_override(key, value)?;
        }
        config.validate()?;
        info!(
            stored_overrides = stored,
            request_overrides = request.overrides.len(),
            "configuration resolved"
        );
        Ok(config)
    }

    /// Runs one planning pass over the current snapshot
    #[instrument(skip(self, request), fields(strategy = %request.strategy, date = %request.reference_date))]
    pub fn plan(&self, request: &PlanRequest) -> ApiResult<PlanReport> {
        request.request_config()?;
        let config = self.resolve_config(request)?;

        let snapshot = SnapshotRepository::from_connection(self.conn.clone()).load()?;

        let orchestrator = PlanningOrchestrator::new(config);
        let result = orchestrator.plan(&snapshot, request.strategy, request.reference_date)?;
        Ok(PlanReport::from_result(&result))
    }
}
