// ==========================================
// Metro Induction Planner - per-train assessment
// ==========================================
// Derived once per train per run; never persisted.
// ==========================================

use crate::domain::types::{BrandingStatus, CertStatus, EligibilityPolicy, JobStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// IneligibilityReason - machine-readable reason code
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IneligibilityReason {
    ExpiredCertificate { certificate_type: String },
    CriticalJobOpen,
    MissingRequiredCertificates { present: usize, required: usize },
}

impl IneligibilityReason {
    pub fn code(&self) -> &'static str {
        match self {
            IneligibilityReason::ExpiredCertificate { .. } => "EXPIRED_CERTIFICATE",
            IneligibilityReason::CriticalJobOpen => "CRITICAL_JOB_OPEN",
            IneligibilityReason::MissingRequiredCertificates { .. } => {
                "MISSING_REQUIRED_CERTIFICATES"
            }
        }
    }
}

impl fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibilityReason::ExpiredCertificate { certificate_type } => {
                write!(f, "Expired {}", certificate_type)
            }
            IneligibilityReason::CriticalJobOpen => write!(f, "Critical Open Job Card"),
            IneligibilityReason::MissingRequiredCertificates { present, required } => {
                write!(f, "Missing Required Certificates ({}/{})", present, required)
            }
        }
    }
}

// ==========================================
// Eligibility - hard-constraint verdict
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eligibility {
    pub is_eligible: bool,
    pub policy: EligibilityPolicy,
    pub cert_status: CertStatus,
    /// Expired types when EXPIRED, expiring types when EXPIRING_SOON
    pub cert_issues: Vec<String>,
    pub distinct_cert_types: usize,
    pub next_cert_expiry: Option<NaiveDate>,
    pub job_status: JobStatus,
    pub critical_jobs: Vec<String>,
    pub pending_work_hours: f64,
    pub reasons: Vec<IneligibilityReason>,
}

// ==========================================
// SoftScores - normalized soft factors
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftScores {
    pub mileage_score: f64,
    pub branding_status: BrandingStatus,
    pub branding_urgency: f64,
    /// Monetary shortfall: max(0, target - current) * penalty_per_hour
    pub branding_priority: f64,
    pub penalty_per_hour: f64,
    pub has_sla: bool,
    pub age_days: i64,
    pub age_factor: f64,
    pub maintenance_demand: f64,
}

// ==========================================
// Assessment - eligibility + scores for one train
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub trainset_id: String,
    pub mileage: f64,
    pub has_branding_wrap: bool,
    pub eligibility: Eligibility,
    pub scores: SoftScores,
    /// Composite heuristic score; 0 for ineligible trains
    pub priority_score: f64,
}

impl Assessment {
    pub fn is_eligible(&self) -> bool {
        self.eligibility.is_eligible
    }

    pub fn pending_work_hours(&self) -> f64 {
        self.eligibility.pending_work_hours
    }

    pub fn cert_status(&self) -> CertStatus {
        self.eligibility.cert_status
    }

    pub fn job_status(&self) -> JobStatus {
        self.eligibility.job_status
    }

    /// Branding urgency counted only for wrap-capable trains
    pub fn effective_branding_urgency(&self) -> f64 {
        if self.has_branding_wrap {
            self.scores.branding_urgency
        } else {
            0.0
        }
    }

    pub fn reason_codes(&self) -> Vec<&'static str> {
        self.eligibility.reasons.iter().map(|r| r.code()).collect()
    }
}
