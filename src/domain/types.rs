// ==========================================
// Metro Induction Planner - domain types
// ==========================================
// Status enums shared by assessment, assignment and reporting.
// Serialized form: SCREAMING_SNAKE_CASE (matches the report contract)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Certificate status
// ==========================================
// Ordered by severity: Valid < ExpiringSoon < Expired
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertStatus {
    Valid,        // every certificate valid beyond the warning window
    ExpiringSoon, // at least one expires within the warning window
    Expired,      // at least one expired before the reference date
}

impl fmt::Display for CertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertStatus::Valid => write!(f, "VALID"),
            CertStatus::ExpiringSoon => write!(f, "EXPIRING_SOON"),
            CertStatus::Expired => write!(f, "EXPIRED"),
        }
    }
}

// ==========================================
// Job card status (per train)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Clear,        // no open job cards
    MinorPending, // open job cards, none critical
    CriticalOpen, // at least one open critical job card
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Clear => write!(f, "CLEAR"),
            JobStatus::MinorPending => write!(f, "MINOR_PENDING"),
            JobStatus::CriticalOpen => write!(f, "CRITICAL_OPEN"),
        }
    }
}

// ==========================================
// Job card row status (raw table value)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobCardStatus {
    Open,
    Closed,
    Other,
}

impl JobCardStatus {
    /// Parses the `job_cards.status` column (trimmed, case-insensitive)
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "OPEN" => JobCardStatus::Open,
            "CLOSED" => JobCardStatus::Closed,
            _ => JobCardStatus::Other,
        }
    }
}

impl fmt::Display for JobCardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobCardStatus::Open => write!(f, "OPEN"),
            JobCardStatus::Closed => write!(f, "CLOSED"),
            JobCardStatus::Other => write!(f, "OTHER"),
        }
    }
}

// ==========================================
// Branding exposure status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrandingStatus {
    NoBranding,   // no SLA row
    Urgent,       // completion < 70%
    Moderate,     // 70% <= completion < 90%
    NearComplete, // completion >= 90%, shortfall remains
    Complete,     // no shortfall
}

impl BrandingStatus {
    /// Urgency tier of the status (100 / 70 / 30 / 0)
    pub fn urgency(&self) -> f64 {
        match self {
            BrandingStatus::Urgent => 100.0,
            BrandingStatus::Moderate => 70.0,
            BrandingStatus::NearComplete => 30.0,
            BrandingStatus::Complete | BrandingStatus::NoBranding => 0.0,
        }
    }
}

impl fmt::Display for BrandingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrandingStatus::NoBranding => write!(f, "NO_BRANDING"),
            BrandingStatus::Urgent => write!(f, "URGENT"),
            BrandingStatus::Moderate => write!(f, "MODERATE"),
            BrandingStatus::NearComplete => write!(f, "NEAR_COMPLETE"),
            BrandingStatus::Complete => write!(f, "COMPLETE"),
        }
    }
}

// ==========================================
// Assigned operational status
// ==========================================
// Declaration order is the report sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrainStatus {
    #[serde(rename = "Revenue Service")]
    RevenueService,
    #[serde(rename = "Standby")]
    Standby,
    #[serde(rename = "Maintenance")]
    Maintenance,
}

impl TrainStatus {
    pub const ALL: [TrainStatus; 3] = [
        TrainStatus::RevenueService,
        TrainStatus::Standby,
        TrainStatus::Maintenance,
    ];

    /// Position in `ALL` (model column index)
    pub fn index(&self) -> usize {
        match self {
            TrainStatus::RevenueService => 0,
            TrainStatus::Standby => 1,
            TrainStatus::Maintenance => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrainStatus::RevenueService => "Revenue Service",
            TrainStatus::Standby => "Standby",
            TrainStatus::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for TrainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// Eligibility rule set
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityPolicy {
    /// Certificates not expired and no open critical job card
    Lenient,
    /// Lenient rules plus a minimum count of distinct certificate types
    Strict,
}

impl EligibilityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EligibilityPolicy::Lenient => "lenient",
            EligibilityPolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for EligibilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EligibilityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(EligibilityPolicy::Lenient),
            "strict" => Ok(EligibilityPolicy::Strict),
            other => Err(format!("unknown eligibility policy: {}", other)),
        }
    }
}

/// Parses boolean-like text columns (`has_branding_wrap`, `is_critical`)
pub fn parse_bool_text(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branding_urgency_tiers() {
        assert_eq!(BrandingStatus::Urgent.urgency(), 100.0);
        assert_eq!(BrandingStatus::Moderate.urgency(), 70.0);
        assert_eq!(BrandingStatus::NearComplete.urgency(), 30.0);
        assert_eq!(BrandingStatus::Complete.urgency(), 0.0);
        assert_eq!(BrandingStatus::NoBranding.urgency(), 0.0);
    }

    #[test]
    fn test_train_status_serializes_as_label() {
        let json = serde_json::to_string(&TrainStatus::RevenueService).unwrap();
        assert_eq!(json, "\"Revenue Service\"");
        assert!(TrainStatus::RevenueService < TrainStatus::Standby);
        assert!(TrainStatus::Standby < TrainStatus::Maintenance);
    }

    #[test]
    fn test_job_card_status_parse() {
        assert_eq!(JobCardStatus::parse(" open "), JobCardStatus::Open);
        assert_eq!(JobCardStatus::parse("CLOSED"), JobCardStatus::Closed);
        assert_eq!(JobCardStatus::parse("deferred"), JobCardStatus::Other);
    }

    #[test]
    fn test_parse_bool_text() {
        assert!(parse_bool_text("TRUE"));
        assert!(parse_bool_text(" true"));
        assert!(parse_bool_text("1"));
        assert!(!parse_bool_text("false"));
        assert!(!parse_bool_text(""));
        assert!(!parse_bool_text("yes"));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Strict".parse::<EligibilityPolicy>().unwrap(), EligibilityPolicy::Strict);
        assert_eq!(" lenient ".parse::<EligibilityPolicy>().unwrap(), EligibilityPolicy::Lenient);
        assert!("loose".parse::<EligibilityPolicy>().is_err());
    }
}
