// ==========================================
// Metro Induction Planner - eligibility rules
// ==========================================
// Pure functions over one train's certificates and job cards.
// No state, no side effects, no I/O.
// ==========================================

use crate::domain::assessment::IneligibilityReason;
use crate::domain::fleet::{Certificate, JobCard};
use crate::domain::types::{CertStatus, EligibilityPolicy, JobStatus};
use chrono::{Duration, NaiveDate};

/// Certificate rule outcome
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateCheck {
    pub status: CertStatus,
    /// Types behind the status (expired, or expiring soon)
    pub issues: Vec<String>,
    pub distinct_types: usize,
    pub next_expiry: Option<NaiveDate>,
}

/// Job card rule outcome
#[derive(Debug, Clone, PartialEq)]
pub struct JobCheck {
    pub status: JobStatus,
    /// Descriptions of open critical cards
    pub critical_jobs: Vec<String>,
    /// Sum of required man-hours over open cards
    pub pending_work_hours: f64,
}

// ==========================================
// EligibilityCore
// ==========================================
pub struct EligibilityCore;

impl EligibilityCore {
    /// Evaluates certificate status
    ///
    /// # Rules
    /// 1. any expiry < reference_date → EXPIRED (issues: expired types)
    /// 2. any expiry in [reference_date, reference_date + warning_days] → EXPIRING_SOON
    /// 3. otherwise VALID (also for a train with no certificates)
    pub fn check_certificates(
        certificates: &[&Certificate],
        reference_date: NaiveDate,
        warning_days: i64,
    ) -> CertificateCheck {
        // past the calendar end every later expiry counts as expiring
        let warning_end = Duration::try_days(warning_days)
            .and_then(|window| reference_date.checked_add_signed(window))
            .unwrap_or(NaiveDate::MAX);

        let expired: Vec<&Certificate> = certificates
            .iter()
            .copied()
            .filter(|c| c.expiry_date < reference_date)
            .collect();

        let (status, flagged) = if !expired.is_empty() {
            (CertStatus::Expired, expired)
        } else {
            let expiring: Vec<&Certificate> = certificates
                .iter()
                .copied()
                .filter(|c| c.expiry_date >= reference_date && c.expiry_date <= warning_end)
                .collect();
            if expiring.is_empty() {
                (CertStatus::Valid, Vec::new())
            } else {
                (CertStatus::ExpiringSoon, expiring)
            }
        };

        let mut issues: Vec<String> = Vec::new();
        for cert in flagged {
            if !issues.contains(&cert.certificate_type) {
                issues.push(cert.certificate_type.clone());
            }
        }

        CertificateCheck {
            status,
            issues,
            distinct_types: Self::distinct_certificate_types(certificates),
            next_expiry: certificates.iter().map(|c| c.expiry_date).min(),
        }
    }

    /// Counts distinct certificate types present
    pub fn distinct_certificate_types(certificates: &[&Certificate]) -> usize {
        let mut types: Vec<&str> = certificates
            .iter()
            .map(|c| c.certificate_type.trim())
            .filter(|t| !t.is_empty())
            .collect();
        types.sort_unstable();
        types.dedup();
        types.len()
    }

    /// Evaluates job card status
    ///
    /// # Rules
    /// 1. any OPEN card with is_critical → CRITICAL_OPEN
    /// 2. any OPEN card → MINOR_PENDING
    /// 3. otherwise CLEAR
    pub fn check_job_cards(job_cards: &[&JobCard]) -> JobCheck {
        let open: Vec<&JobCard> = job_cards.iter().copied().filter(|j| j.is_open()).collect();

        let pending_work_hours: f64 = open.iter().map(|j| j.required_man_hours).sum();
        let critical_jobs: Vec<String> = open
            .iter()
            .filter(|j| j.is_critical)
            .map(|j| j.description.clone())
            .collect();

        let status = if !critical_jobs.is_empty() {
            JobStatus::CriticalOpen
        } else if !open.is_empty() {
            JobStatus::MinorPending
        } else {
            JobStatus::Clear
        };

        JobCheck {
            status,
            critical_jobs,
            pending_work_hours,
        }
    }

    /// Collects ineligibility reasons; empty means eligible
    ///
    /// # Rules
    /// - EXPIRED → one ExpiredCertificate per expired type
    /// - CRITICAL_OPEN → CriticalJobOpen
    /// - Strict policy only: fewer than `min_certificate_types` distinct
    ///   types → MissingRequiredCertificates
    pub fn ineligibility_reasons(
        certs: &CertificateCheck,
        jobs: &JobCheck,
        policy: EligibilityPolicy,
        min_certificate_types: usize,
    ) -> Vec<IneligibilityReason> {
        let mut reasons = Vec::new();

        if certs.status == CertStatus::Expired {
            reasons.extend(certs.issues.iter().map(|t| {
                IneligibilityReason::ExpiredCertificate {
                    certificate_type: t.clone(),
                }
            }));
        }

        if jobs.status == JobStatus::CriticalOpen {
            reasons.push(IneligibilityReason::CriticalJobOpen);
        }

        if policy == EligibilityPolicy::Strict && certs.distinct_types < min_certificate_types {
            reasons.push(IneligibilityReason::MissingRequiredCertificates {
                present: certs.distinct_types,
                required: min_certificate_types,
            });
        }

        reasons
    }
}
