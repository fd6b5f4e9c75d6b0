// ==========================================
// Metro Induction Planner - eligibility assessor
// ==========================================
// Hard readiness check per train: certificates + job cards.
// Ineligible trains are never placed into Revenue Service.
// ==========================================

use crate::config::EligibilityConfig;
use crate::domain::assessment::Eligibility;
use crate::domain::fleet::{Certificate, JobCard, Trainset};
use crate::domain::snapshot::FleetIndex;
use crate::domain::types::{CertStatus, EligibilityPolicy};
use crate::engine::eligibility_core::EligibilityCore;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

// ==========================================
// EligibilityAssessor
// ==========================================
#[derive(Debug, Clone)]
pub struct EligibilityAssessor {
    policy: EligibilityPolicy,
    min_certificate_types: usize,
    expiry_warning_days: i64,
}

impl EligibilityAssessor {
    /// Assessor with the default thresholds (3 types, 7-day window)
    pub fn new(policy: EligibilityPolicy) -> Self {
        let defaults = EligibilityConfig::default();
        Self {
            policy,
            min_certificate_types: defaults.min_certificate_types,
            expiry_warning_days: defaults.expiry_warning_days,
        }
    }

    /// Assessor from configuration; `policy` is the resolved policy
    pub fn from_config(config: &EligibilityConfig, policy: EligibilityPolicy) -> Self {
        Self {
            policy,
            min_certificate_types: config.min_certificate_types,
            expiry_warning_days: config.expiry_warning_days,
        }
    }

    pub fn policy(&self) -> EligibilityPolicy {
        self.policy
    }

    /// Evaluates one train
    ///
    /// # Rules
    /// eligible = cert_status ∈ {VALID, EXPIRING_SOON}
    ///            AND job_status ≠ CRITICAL_OPEN
    ///            AND (strict only) enough distinct certificate types
    pub fn assess(
        &self,
        certificates: &[&Certificate],
        job_cards: &[&JobCard],
        reference_date: NaiveDate,
    ) -> Eligibility {
        let certs =
            EligibilityCore::check_certificates(certificates, reference_date, self.expiry_warning_days);
        let jobs = EligibilityCore::check_job_cards(job_cards);
        let reasons = EligibilityCore::ineligibility_reasons(
            &certs,
            &jobs,
            self.policy,
            self.min_certificate_types,
        );

        Eligibility {
            is_eligible: reasons.is_empty(),
            policy: self.policy,
            cert_status: certs.status,
            cert_issues: certs.issues,
            distinct_cert_types: certs.distinct_types,
            next_cert_expiry: certs.next_expiry,
            job_status: jobs.status,
            critical_jobs: jobs.critical_jobs,
            pending_work_hours: jobs.pending_work_hours,
            reasons,
        }
    }

    /// Evaluates every train, keyed by trainset id
    #[instrument(skip(self, trainsets, index), fields(policy = %self.policy))]
    pub fn assess_fleet(
        &self,
        trainsets: &[&Trainset],
        index: &FleetIndex<'_>,
        reference_date: NaiveDate,
    ) -> BTreeMap<String, Eligibility> {
        let mut out = BTreeMap::new();
        for train in trainsets {
            let id = train.trainset_id.as_str();
            let eligibility =
                self.assess(index.certificates(id), index.job_cards(id), reference_date);
            if !eligibility.is_eligible {
                debug!(trainset_id = id, reasons = ?eligibility.reasons, "ineligible");
            }
            out.insert(id.to_string(), eligibility);
        }

        let eligible = out.values().filter(|e| e.is_eligible).count();
        let expiring = out
            .values()
            .filter(|e| e.cert_status == CertStatus::ExpiringSoon)
            .count();
        info!(
            eligible,
            ineligible = out.len() - eligible,
            expiring_soon = expiring,
            "eligibility assessed"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{JobCardStatus, JobStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cert(kind: &str, expiry: NaiveDate) -> Certificate {
        Certificate {
            certificate_id: format!("C-{}", kind),
            trainset_id: "T01".to_string(),
            certificate_type: kind.to_string(),
            expiry_date: expiry,
        }
    }

    fn critical_job() -> JobCard {
        JobCard {
            job_card_id: "J9".to_string(),
            trainset_id: "T01".to_string(),
            status: JobCardStatus::Open,
            is_critical: true,
            description: "Brake failure".to_string(),
            required_man_hours: 12.0,
        }
    }

    #[test]
    fn test_expiring_certificate_still_eligible() {
        let assessor = EligibilityAssessor::new(EligibilityPolicy::Lenient);
        let c = cert("Telecom", date(2025, 9, 21));
        let result = assessor.assess(&[&c], &[], date(2025, 9, 18));

        assert!(result.is_eligible);
        assert_eq!(result.cert_status, CertStatus::ExpiringSoon);
        assert_eq!(result.cert_issues, vec!["Telecom".to_string()]);
        assert_eq!(result.job_status, JobStatus::Clear);
    }

    #[test]
    fn test_critical_job_ineligible_regardless_of_certificates() {
        let assessor = EligibilityAssessor::new(EligibilityPolicy::Lenient);
        let valid = cert("Rolling-Stock", date(2026, 6, 1));
        let job = critical_job();
        let result = assessor.assess(&[&valid], &[&job], date(2025, 9, 18));

        assert!(!result.is_eligible);
        assert_eq!(result.cert_status, CertStatus::Valid);
        assert_eq!(result.critical_jobs, vec!["Brake failure".to_string()]);
        assert_eq!(result.pending_work_hours, 12.0);
    }

    #[test]
    fn test_expired_and_critical_reasons_both_reported() {
        let assessor = EligibilityAssessor::new(EligibilityPolicy::Lenient);
        let expired = cert("Signalling", date(2025, 9, 1));
        let job = critical_job();
        let result = assessor.assess(&[&expired], &[&job], date(2025, 9, 18));

        let codes: Vec<&str> = result.reasons.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["EXPIRED_CERTIFICATE", "CRITICAL_JOB_OPEN"]);
    }

    #[test]
    fn test_config_thresholds_apply() {
        let config = EligibilityConfig {
            policy: None,
            min_certificate_types: 1,
            expiry_warning_days: 2,
        };
        let assessor = EligibilityAssessor::from_config(&config, EligibilityPolicy::Strict);
        let c = cert("Telecom", date(2025, 9, 21));
        let result = assessor.assess(&[&c], &[], date(2025, 9, 18));

        assert!(result.is_eligible);
        assert_eq!(result.cert_status, CertStatus::Valid);
    }
}
