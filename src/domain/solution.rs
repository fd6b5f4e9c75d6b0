// ==========================================
// Metro Induction Planner - fleet assignment
// ==========================================
// trainset_id -> exactly one TrainStatus
// ==========================================

use crate::domain::types::TrainStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    assignments: BTreeMap<String, TrainStatus>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status of a train; a later call replaces the earlier one
    pub fn assign(&mut self, trainset_id: impl Into<String>, status: TrainStatus) {
        self.assignments.insert(trainset_id.into(), status);
    }

    pub fn status_of(&self, trainset_id: &str) -> Option<TrainStatus> {
        self.assignments.get(trainset_id).copied()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn count(&self, status: TrainStatus) -> usize {
        self.assignments.values().filter(|s| **s == status).count()
    }

    /// Train ids holding `status`, in id order
    pub fn trains_with(&self, status: TrainStatus) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|(_, s)| **s == status)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TrainStatus)> {
        self.assignments.iter().map(|(id, s)| (id.as_str(), *s))
    }

    /// Checks that exactly the given trains are assigned
    ///
    /// # Returns
    /// - Err(message) naming the first missing or unknown train
    pub fn verify_totality<'a, I>(&self, trainset_ids: I) -> Result<(), String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut expected = 0usize;
        for id in trainset_ids {
            expected += 1;
            if !self.assignments.contains_key(id) {
                return Err(format!("train {} has no assigned status", id));
            }
        }
        if expected != self.assignments.len() {
            return Err(format!(
                "solution covers {} trains, snapshot has {}",
                self.assignments.len(),
                expected
            ));
        }
        Ok(())
    }
}
