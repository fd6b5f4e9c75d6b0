// ==========================================
// Metro Induction Planner - fleet entity rows
// ==========================================
// One struct per snapshot table; read-only for a planning run
// ==========================================

use crate::domain::types::JobCardStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Trainset - physical unit (trainsets)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainset {
    pub trainset_id: String,
    pub cumulative_mileage_km: f64,
    pub in_service_date: NaiveDate,
    pub has_branding_wrap: bool,
}

// ==========================================
// Certificate - fitness certificate (fitness_certificates)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub certificate_id: String,
    pub trainset_id: String,
    pub certificate_type: String,
    pub expiry_date: NaiveDate,
}

// ==========================================
// JobCard - maintenance work order (job_cards)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCard {
    pub job_card_id: String,
    pub trainset_id: String,
    pub status: JobCardStatus,
    pub is_critical: bool,
    pub description: String,
    pub required_man_hours: f64,
}

impl JobCard {
    pub fn is_open(&self) -> bool {
        self.status == JobCardStatus::Open
    }
}

// ==========================================
// BrandingSla - exposure commitment (branding_slas)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandingSla {
    pub sla_id: String,
    pub trainset_id: String,
    pub target_exposure_hours: f64,
    pub current_exposure_hours: f64,
    pub penalty_per_hour: f64,
}

impl BrandingSla {
    /// Remaining exposure hours (never negative)
    pub fn shortfall_hours(&self) -> f64 {
        (self.target_exposure_hours - self.current_exposure_hours).max(0.0)
    }
}

// ==========================================
// DepotResource - depot capacity (depot_resources)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotResource {
    pub resource_id: String,
    pub available_capacity: f64,
}

// ==========================================
// ShuntingCost - historical move cost (depot_layout_costs)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuntingCost {
    pub from_location: String,
    pub to_location: String,
    pub cost: f64,
}
