// ==========================================
// Metro Induction Planner - assignment model
// ==========================================
// Backend-agnostic integer program:
// - binary x[t][s] for s ∈ {service, standby, maintenance}
// - Σ_s x[t][s] = 1 per train
// - disallowed (t, s) fixed to 0
// - Σ_t x[t][maint] ≤ bays
// - Σ_t pending(t)·x[t][maint] ≤ man-hours
// - Σ_t x[t][service] ≥ min_revenue (optional)
// Objective: Σ cost[t][s]·x[t][s], costs already weighted.
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::assessment::Assessment;
use crate::domain::types::TrainStatus;
use crate::engine::capacity::CapacityModel;
use crate::engine::scoring::FleetStats;
use crate::engine::strategy::AssignError;
use serde::{Deserialize, Serialize};

/// Weighted cost of one (train, status) pair, per objective term
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TermCosts {
    pub mileage: f64,
    pub branding: f64,
    pub shunting: f64,
    pub urgency: f64,
}

impl TermCosts {
    pub fn total(&self) -> f64 {
        self.mileage + self.branding + self.shunting + self.urgency
    }
}

impl std::ops::AddAssign for TermCosts {
    fn add_assign(&mut self, rhs: Self) {
        self.mileage += rhs.mileage;
        self.branding += rhs.branding;
        self.shunting += rhs.shunting;
        self.urgency += rhs.urgency;
    }
}

/// Decision row of one train
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRow {
    pub trainset_id: String,
    /// Indexed by `TrainStatus::index`
    pub allowed: [bool; 3],
    /// Indexed by `TrainStatus::index`
    pub costs: [TermCosts; 3],
    pub pending_hours: f64,
}

impl TrainRow {
    pub fn is_allowed(&self, status: TrainStatus) -> bool {
        self.allowed[status.index()]
    }

    pub fn cost(&self, status: TrainStatus) -> f64 {
        self.costs[status.index()].total()
    }

    pub fn allowed_statuses(&self) -> impl Iterator<Item = TrainStatus> + '_ {
        TrainStatus::ALL.into_iter().filter(|s| self.is_allowed(*s))
    }
}

// ==========================================
// AssignmentModel
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentModel {
    pub trains: Vec<TrainRow>,
    pub bay_capacity: Option<f64>,
    pub man_hour_capacity: Option<f64>,
    pub min_revenue: Option<usize>,
}

impl AssignmentModel {
    /// Builds the model from assessments
    ///
    /// # Coefficients (w = configured weights)
    /// - service:     w_m·|mileage − mean| + w_s·avg_cost_to_stabling
    /// - standby:     w_b·penalty (SLA trains) + w_s·avg_cost_to_stabling
    ///                + w_u (ineligible trains)
    /// - maintenance: w_b·penalty (SLA trains) + w_s·avg_cost_to_maintenance
    pub fn build(
        assessments: &[Assessment],
        capacity: &CapacityModel,
        stats: &FleetStats,
        config: &OptimizerConfig,
    ) -> Self {
        let w = &config.weights;
        let trains = assessments
            .iter()
            .map(|a| {
                let eligible = a.is_eligible();
                let branding = if a.scores.has_sla {
                    w.branding * a.scores.penalty_per_hour
                } else {
                    0.0
                };

                let service = TermCosts {
                    mileage: w.mileage * stats.deviation(a.mileage),
                    shunting: w.shunting * capacity.shunting_cost(TrainStatus::RevenueService),
                    ..TermCosts::default()
                };
                let standby = TermCosts {
                    branding,
                    shunting: w.shunting * capacity.shunting_cost(TrainStatus::Standby),
                    urgency: if eligible { 0.0 } else { w.urgency },
                    ..TermCosts::default()
                };
                let maintenance = TermCosts {
                    branding,
                    shunting: w.shunting * capacity.shunting_cost(TrainStatus::Maintenance),
                    ..TermCosts::default()
                };

                let standby_allowed = eligible || !config.hard_maintenance_for_ineligible;
                TrainRow {
                    trainset_id: a.trainset_id.clone(),
                    allowed: [eligible, standby_allowed, true],
                    costs: [service, standby, maintenance],
                    pending_hours: a.pending_work_hours(),
                }
            })
            .collect();

        Self {
            trains,
            bay_capacity: capacity.maintenance_bays,
            man_hour_capacity: capacity.staff_hours,
            min_revenue: config.min_revenue,
        }
    }

    /// Binary variables actually created (disallowed pairs are omitted)
    pub fn variable_count(&self) -> usize {
        self.trains
            .iter()
            .map(|t| t.allowed.iter().filter(|a| **a).count())
            .sum()
    }

    /// Exactly-one rows plus the capacity rows present
    pub fn constraint_count(&self) -> usize {
        self.trains.len()
            + usize::from(self.bay_capacity.is_some())
            + usize::from(self.man_hour_capacity.is_some())
            + usize::from(self.min_revenue.is_some())
    }

    /// Rejects models no backend should see
    pub fn validate(&self) -> Result<(), AssignError> {
        if self.trains.is_empty() {
            return Err(AssignError::InvalidModel("model has no trains".to_string()));
        }
        for row in &self.trains {
            if !row.allowed.iter().any(|a| *a) {
                return Err(AssignError::InvalidModel(format!(
                    "train {} has no allowed status",
                    row.trainset_id
                )));
            }
            let finite = row
                .costs
                .iter()
                .all(|c| c.total().is_finite())
                && row.pending_hours.is_finite();
            if !finite {
                return Err(AssignError::InvalidModel(format!(
                    "train {} has a non-finite coefficient",
                    row.trainset_id
                )));
            }
        }
        Ok(())
    }

    /// Checks every hard constraint for `choices` (aligned with `trains`)
    pub fn is_feasible(&self, choices: &[TrainStatus]) -> bool {
        if choices.len() != self.trains.len() {
            return false;
        }
        if self
            .trains
            .iter()
            .zip(choices)
            .any(|(row, s)| !row.is_allowed(*s))
        {
            return false;
        }

        let maintenance = choices
            .iter()
            .filter(|s| **s == TrainStatus::Maintenance)
            .count();
        if let Some(cap) = self.bay_capacity {
            if maintenance as f64 > cap + 1e-9 {
                return false;
            }
        }

        let hours: f64 = self
            .trains
            .iter()
            .zip(choices)
            .filter(|(_, s)| **s == TrainStatus::Maintenance)
            .map(|(row, _)| row.pending_hours)
            .sum();
        if let Some(cap) = self.man_hour_capacity {
            if hours > cap + 1e-9 {
                return false;
            }
        }

        if let Some(min) = self.min_revenue {
            let service = choices
                .iter()
                .filter(|s| **s == TrainStatus::RevenueService)
                .count();
            if service < min {
                return false;
            }
        }
        true
    }

    /// Per-term weighted cost of `choices`
    pub fn breakdown(&self, choices: &[TrainStatus]) -> TermCosts {
        let mut total = TermCosts::default();
        for (row, status) in self.trains.iter().zip(choices) {
            total += row.costs[status.index()];
        }
        total
    }

    pub fn objective(&self, choices: &[TrainStatus]) -> f64 {
        self.breakdown(choices).total()
    }
}
