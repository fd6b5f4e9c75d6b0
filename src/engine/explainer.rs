// ==========================================
// Metro Induction Planner - result explainer
// ==========================================
// Pure mapping (Assessment, status, weights) -> justification text.
// Format: "<primary>[, ...] [Context: a, b]"
// ==========================================

use crate::domain::assessment::Assessment;
use crate::domain::types::{BrandingStatus, CertStatus, JobStatus, TrainStatus};

/// Weights the explanation thresholds are compared against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplainWeights {
    pub w_mileage: f64,
    pub w_branding: f64,
}

// ==========================================
// ResultExplainer
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ResultExplainer {
    weights: ExplainWeights,
}

impl ResultExplainer {
    pub fn new(w_mileage: f64, w_branding: f64) -> Self {
        Self {
            weights: ExplainWeights {
                w_mileage,
                w_branding,
            },
        }
    }

    /// Justification for `status`
    ///
    /// Ineligible trains list their blocking reasons only.
    pub fn explain(&self, assessment: &Assessment, status: TrainStatus) -> String {
        if !assessment.is_eligible() {
            return assessment
                .eligibility
                .reasons
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ");
        }

        let primary = self.primary_factor(assessment, status);
        let context = Self::context_tags(assessment);
        if context.is_empty() {
            primary.to_string()
        } else {
            format!("{} [Context: {}]", primary, context.join(", "))
        }
    }

    /// Why the train landed in this bucket
    pub fn primary_factor(&self, assessment: &Assessment, status: TrainStatus) -> &'static str {
        let scores = &assessment.scores;
        let pending = assessment.pending_work_hours();

        match status {
            TrainStatus::RevenueService => {
                if assessment.effective_branding_urgency() > 70.0 && self.weights.w_branding > 50.0 {
                    "High Branding Priority"
                } else if scores.mileage_score > 70.0 && self.weights.w_mileage > 5.0 {
                    "Optimal Mileage"
                } else {
                    "Balanced Readiness"
                }
            }
            TrainStatus::Standby => {
                if pending > 5.0 {
                    "Maintenance Buffer"
                } else if scores.mileage_score < 40.0 {
                    "High Mileage Rotation"
                } else {
                    "Operational Reserve"
                }
            }
            TrainStatus::Maintenance => {
                if pending > 10.0 {
                    "Substantial Maintenance Needed"
                } else if assessment.cert_status() == CertStatus::ExpiringSoon {
                    "Certification Renewal"
                } else {
                    "Scheduled Maintenance"
                }
            }
        }
    }

    /// Secondary tags: branding, minor work, mileage extremity
    pub fn context_tags(assessment: &Assessment) -> Vec<String> {
        let mut tags = Vec::new();

        if assessment.has_branding_wrap {
            match assessment.scores.branding_status {
                BrandingStatus::Urgent => tags.push("Branding Urgent".to_string()),
                BrandingStatus::Moderate => tags.push("Branding Due".to_string()),
                _ => {}
            }
        }

        if assessment.job_status() == JobStatus::MinorPending {
            tags.push(format!("Minor Work: {}h", format_hours(assessment.pending_work_hours())));
        }

        let mileage_score = assessment.scores.mileage_score;
        if mileage_score > 80.0 {
            tags.push("Low Mileage".to_string());
        } else if mileage_score < 30.0 {
            tags.push("High Mileage".to_string());
        }

        tags
    }
}

/// Whole hours print without a fraction
fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}", hours as i64)
    } else {
        format!("{:.1}", hours)
    }
}
