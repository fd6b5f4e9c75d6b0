// ==========================================
// Metro Induction Planner - heuristic assigner
// ==========================================
// Greedy ranking:
// 1. ineligible → Maintenance
// 2. eligible ranked by weighted score (+ seeded jitter)
// 3. top `required_revenue` → Revenue Service
// 4. the rest → Maintenance (heavy work / expiring cert) or Standby
// Depot capacity is NOT enforced here; overruns are only reported.
// ==========================================

use crate::config::PlannerConfig;
use crate::domain::assessment::Assessment;
use crate::domain::solution::Solution;
use crate::domain::types::{CertStatus, TrainStatus};
use crate::engine::strategy::{AssignError, Assigner, AssignmentInput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument, warn};

/// Jitter range added to each weighted score
const JITTER_MIN: f64 = 0.001;
const JITTER_MAX: f64 = 0.01;

// ==========================================
// HeuristicAssigner
// ==========================================
pub struct HeuristicAssigner<R: Rng> {
    rng: R,
    w_mileage: f64,
    w_branding: f64,
    required_revenue: usize,
    maintenance_hours_threshold: f64,
}

impl HeuristicAssigner<StdRng> {
    /// Assigner from configuration; an unset seed draws one from the OS
    pub fn from_config(config: &PlannerConfig) -> Self {
        let rng = match config.heuristic.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> HeuristicAssigner<R> {
    pub fn with_rng(config: &PlannerConfig, rng: R) -> Self {
        Self {
            rng,
            w_mileage: config.w_mileage,
            w_branding: config.w_branding,
            required_revenue: config.required_revenue,
            maintenance_hours_threshold: config.heuristic.maintenance_hours_threshold,
        }
    }

    /// Weighted ranking score, before jitter
    ///
    /// (mileage_score × w_m/10 + urgency × w_b/100 [branding-capable only])
    ///   / max(1, w_m/10 + w_b/100)
    pub fn weighted_score(assessment: &Assessment, w_mileage: f64, w_branding: f64) -> f64 {
        let mileage_ratio = w_mileage / 10.0;
        let branding_ratio = w_branding / 100.0;

        let mileage_part = assessment.scores.mileage_score * mileage_ratio;
        let branding_part = assessment.effective_branding_urgency() * branding_ratio;
        let total_weight = (mileage_ratio + branding_ratio).max(1.0);

        (mileage_part + branding_part) / total_weight
    }

    /// Status of an eligible train below the service cutoff
    fn below_cutoff_status(&self, assessment: &Assessment) -> TrainStatus {
        if assessment.pending_work_hours() > self.maintenance_hours_threshold
            || assessment.cert_status() == CertStatus::ExpiringSoon
        {
            TrainStatus::Maintenance
        } else {
            TrainStatus::Standby
        }
    }
}

impl<R: Rng> Assigner for HeuristicAssigner<R> {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    #[instrument(skip_all, fields(trains = input.assessments.len()))]
    fn assign(&mut self, input: &AssignmentInput<'_>) -> Result<Solution, AssignError> {
        let eligible: Vec<&Assessment> =
            input.assessments.iter().filter(|a| a.is_eligible()).collect();

        if eligible.len() < self.required_revenue {
            warn!(
                eligible = eligible.len(),
                required = self.required_revenue,
                "not enough eligible trains"
            );
            return Err(AssignError::InsufficientEligibleTrains {
                available: eligible.len(),
                required: self.required_revenue,
            });
        }

        let mut ranked: Vec<(&Assessment, f64)> = Vec::with_capacity(eligible.len());
        for a in eligible {
            let jitter = self.rng.random_range(JITTER_MIN..JITTER_MAX);
            let score = Self::weighted_score(a, self.w_mileage, self.w_branding) + jitter;
            ranked.push((a, score));
        }
        ranked.sort_by(|(a, sa), (b, sb)| {
            sb.total_cmp(sa)
                .then_with(|| a.trainset_id.cmp(&b.trainset_id))
        });

        let mut solution = Solution::new();
        for a in input.assessments.iter().filter(|a| !a.is_eligible()) {
            solution.assign(a.trainset_id.as_str(), TrainStatus::Maintenance);
        }
        for (rank, (a, _)) in ranked.iter().enumerate() {
            let status = if rank < self.required_revenue {
                TrainStatus::RevenueService
            } else {
                self.below_cutoff_status(a)
            };
            solution.assign(a.trainset_id.as_str(), status);
        }

        let cutoff_score = self
            .required_revenue
            .checked_sub(1)
            .and_then(|i| ranked.get(i))
            .map(|(_, s)| *s);
        info!(
            eligible = ranked.len(),
            required = self.required_revenue,
            cutoff_score = ?cutoff_score,
            revenue = solution.count(TrainStatus::RevenueService),
            standby = solution.count(TrainStatus::Standby),
            maintenance = solution.count(TrainStatus::Maintenance),
            "heuristic assignment done"
        );

        let usage = input.capacity.usage(&solution, input.assessments);
        if usage.exceeded() {
            warn!(
                bays_used = usage.bays_used,
                bay_capacity = ?usage.bay_capacity,
                man_hours_used = usage.man_hours_used,
                man_hour_capacity = ?usage.man_hour_capacity,
                "heuristic assignment exceeds depot capacity"
            );
        }

        Ok(solution)
    }
}
