// ==========================================
// Metro Induction Planner - report DTOs
// ==========================================
// JSON contract of one planning run (success report or error payload)
// ==========================================

use crate::api::error::ApiError;
use crate::domain::types::TrainStatus;
use crate::engine::orchestrator::{PlanResult, TrainOutcome};
use crate::engine::strategy::AssignStrategy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STATUS_SUCCESS: &str = "Success";
pub const STATUS_ERROR: &str = "Error";

/// Shown when a train has no certificate at all
pub const NO_EXPIRY: &str = "N/A";

// ==========================================
// PlanReport - success payload
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    /// Always "Success"
    pub status: String,
    pub run_id: String,
    pub strategy: String,
    /// YYYY-MM-DD
    pub reference_date: String,
    pub eligibility_policy: String,
    /// Ordered by status, then train id
    pub assignments: Vec<AssignmentDetail>,
    pub metrics: PlanMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<OptimizerSummary>,
}

/// One train's line in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentDetail {
    pub train_id: String,
    /// "Revenue Service" | "Standby" | "Maintenance"
    pub assigned_status: String,
    pub is_eligible: bool,
    pub eligibility_reason: String,
    pub reason_codes: Vec<String>,
    pub cumulative_mileage: f64,
    pub mileage_vs_avg_pct: i64,
    pub pending_work_hours: f64,
    /// Earliest expiry (YYYY-MM-DD) or "N/A"
    pub next_cert_expiry: String,

    // ===== heuristic only =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding_priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetrics {
    pub revenue_trains: usize,
    pub standby_trains: usize,
    pub maintenance_trains: usize,
    /// None when the cohort is empty
    pub avg_mileage_revenue: Option<i64>,
    pub avg_mileage_standby: Option<i64>,
    /// Heuristic only: branding-wrap trains in service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding_coverage: Option<usize>,

    pub bays_used: usize,
    pub bay_capacity: Option<f64>,
    pub man_hours_used: f64,
    pub man_hour_capacity: Option<f64>,
    /// Heuristic only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_exceeded: Option<bool>,
}

/// Solver record (optimizer strategy)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerSummary {
    /// "OPTIMAL" | "FEASIBLE"
    pub solve_status: String,
    pub objective_value: f64,
    pub mileage_cost: f64,
    pub branding_cost: f64,
    pub shunting_cost: f64,
    pub urgency_cost: f64,
    pub elapsed_ms: u64,
    pub time_limit_secs: u64,
    pub search_workers: u32,
}

// ==========================================
// ErrorPayload - failure payload
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Always "Error"
    pub status: String,
    pub error_kind: String,
    pub error: String,
}

impl From<&ApiError> for ErrorPayload {
    fn from(err: &ApiError) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            error_kind: err.kind().to_string(),
            error: err.to_string(),
        }
    }
}

// ==========================================
// PlanResult -> PlanReport
// ==========================================

impl PlanReport {
    pub fn from_result(result: &PlanResult) -> Self {
        let heuristic = result.strategy == AssignStrategy::Heuristic;
        let mean = result.stats.mean_mileage;

        let assignments = result
            .trains
            .iter()
            .map(|t| AssignmentDetail::from_outcome(t, mean, heuristic))
            .collect();

        Self {
            status: STATUS_SUCCESS.to_string(),
            run_id: Uuid::new_v4().to_string(),
            strategy: result.strategy.as_str().to_string(),
            reference_date: result.reference_date.format("%Y-%m-%d").to_string(),
            eligibility_policy: result.policy.as_str().to_string(),
            assignments,
            metrics: PlanMetrics::from_result(result),
            optimizer: result.optimizer.as_ref().map(|run| OptimizerSummary {
                solve_status: run.solve_status.clone(),
                objective_value: run.objective_value,
                mileage_cost: run.breakdown.mileage,
                branding_cost: run.breakdown.branding,
                shunting_cost: run.breakdown.shunting,
                urgency_cost: run.breakdown.urgency,
                elapsed_ms: run.elapsed_ms,
                time_limit_secs: run.time_limit_secs,
                search_workers: run.search_workers,
            }),
        }
    }

    pub fn assignments_with(&self, status: TrainStatus) -> impl Iterator<Item = &AssignmentDetail> {
        let label = status.label();
        self.assignments
            .iter()
            .filter(move |a| a.assigned_status == label)
    }
}

impl AssignmentDetail {
    fn from_outcome(outcome: &TrainOutcome, mean_mileage: f64, heuristic: bool) -> Self {
        let a = &outcome.assessment;
        let mileage_vs_avg_pct = if mean_mileage > 0.0 {
            (a.mileage / mean_mileage * 100.0).round() as i64
        } else {
            0
        };

        Self {
            train_id: a.trainset_id.clone(),
            assigned_status: outcome.status.label().to_string(),
            is_eligible: a.is_eligible(),
            eligibility_reason: outcome.explanation.clone(),
            reason_codes: a.reason_codes().into_iter().map(str::to_string).collect(),
            cumulative_mileage: a.mileage,
            mileage_vs_avg_pct,
            pending_work_hours: a.pending_work_hours(),
            next_cert_expiry: a
                .eligibility
                .next_cert_expiry
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| NO_EXPIRY.to_string()),
            branding_priority: heuristic.then(|| a.scores.branding_priority.round() as i64),
            priority_score: heuristic.then(|| round2(a.priority_score)),
        }
    }
}

impl PlanMetrics {
    fn from_result(result: &PlanResult) -> Self {
        let heuristic = result.strategy == AssignStrategy::Heuristic;
        let cohort = |status: TrainStatus| -> Vec<&TrainOutcome> {
            result.trains.iter().filter(|t| t.status == status).collect()
        };
        let revenue = cohort(TrainStatus::RevenueService);
        let standby = cohort(TrainStatus::Standby);

        let branding_coverage = revenue
            .iter()
            .filter(|t| t.assessment.has_branding_wrap)
            .count();

        Self {
            revenue_trains: revenue.len(),
            standby_trains: standby.len(),
            maintenance_trains: result.count(TrainStatus::Maintenance),
            avg_mileage_revenue: average_mileage(&revenue),
            avg_mileage_standby: average_mileage(&standby),
            branding_coverage: heuristic.then_some(branding_coverage),
            bays_used: result.usage.bays_used,
            bay_capacity: result.usage.bay_capacity,
            man_hours_used: result.usage.man_hours_used,
            man_hour_capacity: result.usage.man_hour_capacity,
            capacity_exceeded: heuristic.then(|| result.usage.exceeded()),
        }
    }
}

fn average_mileage(trains: &[&TrainOutcome]) -> Option<i64> {
    if trains.is_empty() {
        return None;
    }
    let total: f64 = trains.iter().map(|t| t.assessment.mileage).sum();
    Some((total / trains.len() as f64).round() as i64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_shape() {
        let err = ApiError::NoSolution {
            status: "INFEASIBLE".to_string(),
        };
        let json = serde_json::to_value(ErrorPayload::from(&err)).unwrap();
        assert_eq!(json["status"], "Error");
        assert_eq!(json["error_kind"], "NO_SOLUTION");
        assert_eq!(json["error"], "no solution found (solver status: INFEASIBLE)");
        assert!(json.get("assignments").is_none());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(57.456), 57.46);
        assert_eq!(round2(1.0), 1.0);
    }
}
