// ==========================================
// Metro Induction Planner - planning snapshot
// ==========================================
// Immutable copy of the six input tables for one planning run,
// plus per-train indexes built once per run.
// ==========================================

use crate::domain::fleet::{
    BrandingSla, Certificate, DepotResource, JobCard, ShuntingCost, Trainset,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// FleetSnapshot - raw table rows
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub trainsets: Vec<Trainset>,
    pub certificates: Vec<Certificate>,
    pub job_cards: Vec<JobCard>,
    pub branding_slas: Vec<BrandingSla>,
    pub depot_resources: Vec<DepotResource>,
    pub shunting_costs: Vec<ShuntingCost>,
}

impl FleetSnapshot {
    /// Builds the per-train lookup indexes
    pub fn index(&self) -> FleetIndex<'_> {
        FleetIndex::build(self)
    }

    /// Trainsets ordered by id
    pub fn trainsets_sorted(&self) -> Vec<&Trainset> {
        let mut trains: Vec<&Trainset> = self.trainsets.iter().collect();
        trains.sort_by(|a, b| a.trainset_id.cmp(&b.trainset_id));
        trains
    }

    pub fn resource(&self, resource_id: &str) -> Option<&DepotResource> {
        self.depot_resources
            .iter()
            .find(|r| r.resource_id == resource_id)
    }
}

// ==========================================
// FleetIndex - train_id -> related rows
// ==========================================
#[derive(Debug, Default)]
pub struct FleetIndex<'a> {
    certificates: HashMap<&'a str, Vec<&'a Certificate>>,
    job_cards: HashMap<&'a str, Vec<&'a JobCard>>,
    slas: HashMap<&'a str, &'a BrandingSla>,
}

impl<'a> FleetIndex<'a> {
    fn build(snapshot: &'a FleetSnapshot) -> Self {
        let mut certificates: HashMap<&'a str, Vec<&'a Certificate>> = HashMap::new();
        for cert in &snapshot.certificates {
            certificates
                .entry(cert.trainset_id.as_str())
                .or_default()
                .push(cert);
        }

        let mut job_cards: HashMap<&'a str, Vec<&'a JobCard>> = HashMap::new();
        for job in &snapshot.job_cards {
            job_cards.entry(job.trainset_id.as_str()).or_default().push(job);
        }

        // first row wins: at most one active SLA per train
        let mut slas: HashMap<&'a str, &'a BrandingSla> = HashMap::new();
        for sla in &snapshot.branding_slas {
            slas.entry(sla.trainset_id.as_str()).or_insert(sla);
        }

        Self {
            certificates,
            job_cards,
            slas,
        }
    }

    pub fn certificates(&self, trainset_id: &str) -> &[&'a Certificate] {
        self.certificates
            .get(trainset_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn job_cards(&self, trainset_id: &str) -> &[&'a JobCard] {
        self.job_cards
            .get(trainset_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn sla(&self, trainset_id: &str) -> Option<&'a BrandingSla> {
        self.slas.get(trainset_id).copied()
    }
}
