// ==========================================
// Metro Induction Planner - soft-factor scoring
// ==========================================
// Mileage score, branding urgency, age factor, maintenance demand,
// and the composite priority score used by the heuristic path.
// ==========================================

use crate::domain::assessment::{Assessment, Eligibility, SoftScores};
use crate::domain::fleet::{BrandingSla, Trainset};
use crate::domain::snapshot::FleetIndex;
use crate::domain::types::BrandingStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument};

// ==========================================
// FleetStats - mileage normalization inputs
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleetStats {
    pub train_count: usize,
    pub mean_mileage: f64,
    /// Population standard deviation
    pub std_mileage: f64,
}

impl FleetStats {
    pub fn from_trainsets<'a, I>(trainsets: I) -> Self
    where
        I: IntoIterator<Item = &'a Trainset>,
    {
        let mileages: Vec<f64> = trainsets
            .into_iter()
            .map(|t| t.cumulative_mileage_km)
            .collect();
        Self::from_mileages(&mileages)
    }

    pub fn from_mileages(mileages: &[f64]) -> Self {
        if mileages.is_empty() {
            return Self {
                train_count: 0,
                mean_mileage: 0.0,
                std_mileage: 0.0,
            };
        }

        let n = mileages.len() as f64;
        let mean = mileages.iter().sum::<f64>() / n;
        let variance = mileages.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / n;

        Self {
            train_count: mileages.len(),
            mean_mileage: mean,
            std_mileage: variance.sqrt(),
        }
    }

    /// |mileage - mean|
    pub fn deviation(&self, mileage: f64) -> f64 {
        (mileage - self.mean_mileage).abs()
    }
}

/// Branding evaluation of one SLA row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrandingScore {
    pub status: BrandingStatus,
    pub urgency: f64,
    /// shortfall hours × penalty per hour
    pub priority: f64,
}

// ==========================================
// ScoreCalculator
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator;

impl ScoreCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Mileage score in [0, 100]; lower mileage scores higher
    ///
    /// # Rules
    /// - std > 0: clamp(100 − (z·20 + 50), 0, 100), z = (m − mean) / std
    /// - std = 0: 50
    pub fn mileage_score(mileage: f64, stats: &FleetStats) -> f64 {
        if stats.std_mileage > 0.0 {
            let z = (mileage - stats.mean_mileage) / stats.std_mileage;
            (100.0 - (z * 20.0 + 50.0)).clamp(0.0, 100.0)
        } else {
            50.0
        }
    }

    /// Branding tier from the active SLA row
    ///
    /// # Rules (completion ratio = current / target)
    /// - no SLA → NO_BRANDING, 0
    /// - no shortfall → COMPLETE, 0
    /// - ratio < 0.7 → URGENT, 100
    /// - ratio < 0.9 → MODERATE, 70
    /// - otherwise → NEAR_COMPLETE, 30
    pub fn branding(sla: Option<&BrandingSla>) -> BrandingScore {
        let Some(sla) = sla else {
            return BrandingScore {
                status: BrandingStatus::NoBranding,
                urgency: 0.0,
                priority: 0.0,
            };
        };

        if sla.current_exposure_hours >= sla.target_exposure_hours {
            return BrandingScore {
                status: BrandingStatus::Complete,
                urgency: 0.0,
                priority: 0.0,
            };
        }

        let ratio = if sla.target_exposure_hours > 0.0 {
            sla.current_exposure_hours / sla.target_exposure_hours
        } else {
            0.0
        };
        let status = if ratio < 0.7 {
            BrandingStatus::Urgent
        } else if ratio < 0.9 {
            BrandingStatus::Moderate
        } else {
            BrandingStatus::NearComplete
        };

        BrandingScore {
            status,
            urgency: status.urgency(),
            priority: sla.shortfall_hours() * sla.penalty_per_hour,
        }
    }

    /// Days in service at `reference_date` (0 when not yet in service)
    pub fn age_days(in_service_date: NaiveDate, reference_date: NaiveDate) -> i64 {
        reference_date
            .signed_duration_since(in_service_date)
            .num_days()
            .max(0)
    }

    /// min(100, days / 365 × 10)
    pub fn age_factor(age_days: i64) -> f64 {
        (age_days as f64 / 365.0 * 10.0).min(100.0)
    }

    /// Composite priority for eligible trains; 0 for ineligible ones
    ///
    /// mileage_score + urgency (branding-capable only)
    ///   − min(30, 2 × pending hours) − min(10, age_factor / 10), floored at 1
    pub fn priority_score(
        eligibility: &Eligibility,
        scores: &SoftScores,
        has_branding_wrap: bool,
    ) -> f64 {
        if !eligibility.is_eligible {
            return 0.0;
        }

        let mut score = scores.mileage_score;
        if has_branding_wrap {
            score += scores.branding_urgency;
        }
        score -= (eligibility.pending_work_hours * 2.0).min(30.0);
        score -= (scores.age_factor / 10.0).min(10.0);
        score.max(1.0)
    }

    /// Soft scores of one train
    pub fn score(
        &self,
        train: &Trainset,
        sla: Option<&BrandingSla>,
        eligibility: &Eligibility,
        stats: &FleetStats,
        reference_date: NaiveDate,
    ) -> SoftScores {
        let branding = Self::branding(sla);
        let age_days = Self::age_days(train.in_service_date, reference_date);

        SoftScores {
            mileage_score: Self::mileage_score(train.cumulative_mileage_km, stats),
            branding_status: branding.status,
            branding_urgency: branding.urgency,
            branding_priority: branding.priority,
            penalty_per_hour: sla.map(|s| s.penalty_per_hour).unwrap_or(0.0),
            has_sla: sla.is_some(),
            age_days,
            age_factor: Self::age_factor(age_days),
            maintenance_demand: eligibility.pending_work_hours,
        }
    }

    /// Builds the full Assessment list, ordered by trainset id
    ///
    /// Trains missing from `eligibility` are skipped.
    #[instrument(skip_all, fields(trains = trainsets.len()))]
    pub fn assess_fleet(
        &self,
        trainsets: &[&Trainset],
        index: &FleetIndex<'_>,
        eligibility: &BTreeMap<String, Eligibility>,
        stats: &FleetStats,
        reference_date: NaiveDate,
    ) -> Vec<Assessment> {
        let mut out: Vec<Assessment> = Vec::with_capacity(trainsets.len());
        for train in trainsets {
            let id = train.trainset_id.as_str();
            let Some(elig) = eligibility.get(id) else {
                continue;
            };

            let scores = self.score(train, index.sla(id), elig, stats, reference_date);
            let priority_score = Self::priority_score(elig, &scores, train.has_branding_wrap);
            out.push(Assessment {
                trainset_id: id.to_string(),
                mileage: train.cumulative_mileage_km,
                has_branding_wrap: train.has_branding_wrap,
                eligibility: elig.clone(),
                scores,
                priority_score,
            });
        }
        out.sort_by(|a, b| a.trainset_id.cmp(&b.trainset_id));

        info!(
            mean_mileage = stats.mean_mileage,
            std_mileage = stats.std_mileage,
            "soft scores computed"
        );
        out
    }
}
