// ==========================================
// Metro Induction Planner - depot capacity model
// ==========================================
// Maintenance bay count, staff man-hour budget and average shunting
// costs, derived once per run from the snapshot.
// ==========================================

use crate::config::ResourceIds;
use crate::domain::assessment::Assessment;
use crate::domain::fleet::ShuntingCost;
use crate::domain::snapshot::FleetSnapshot;
use crate::domain::solution::Solution;
use crate::domain::types::TrainStatus;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Destination substring of moves into a maintenance bay
pub const MAINTENANCE_LOCATION_MARKER: &str = "IBL_Bay";

/// Destination substring of moves onto a stabling track
pub const STABLING_LOCATION_MARKER: &str = "Stabling_Track";

// ==========================================
// CapacityModel
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityModel {
    /// None: no bay limit row in the snapshot
    pub maintenance_bays: Option<f64>,
    /// None: no man-hour row in the snapshot
    pub staff_hours: Option<f64>,
    pub avg_cost_to_maintenance: f64,
    pub avg_cost_to_stabling: f64,
}

/// Resource use of one assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityUsage {
    pub bays_used: usize,
    pub bay_capacity: Option<f64>,
    pub man_hours_used: f64,
    pub man_hour_capacity: Option<f64>,
}

impl CapacityUsage {
    pub fn bays_exceeded(&self) -> bool {
        self.bay_capacity
            .map(|cap| self.bays_used as f64 > cap)
            .unwrap_or(false)
    }

    pub fn man_hours_exceeded(&self) -> bool {
        self.man_hour_capacity
            .map(|cap| self.man_hours_used > cap + 1e-9)
            .unwrap_or(false)
    }

    pub fn exceeded(&self) -> bool {
        self.bays_exceeded() || self.man_hours_exceeded()
    }
}

impl CapacityModel {
    /// No limits, zero shunting costs
    pub fn unconstrained() -> Self {
        Self {
            maintenance_bays: None,
            staff_hours: None,
            avg_cost_to_maintenance: 0.0,
            avg_cost_to_stabling: 0.0,
        }
    }

    /// Reads the configured resource rows and shunting averages
    ///
    /// A missing resource row leaves that limit unconstrained.
    pub fn from_snapshot(snapshot: &FleetSnapshot, ids: &ResourceIds) -> Self {
        let maintenance_bays = snapshot
            .resource(&ids.maintenance_bays_id)
            .map(|r| r.available_capacity);
        if maintenance_bays.is_none() {
            warn!(
                resource_id = %ids.maintenance_bays_id,
                "depot resource missing; maintenance bays unconstrained"
            );
        }

        let staff_hours = snapshot
            .resource(&ids.staff_hours_id)
            .map(|r| r.available_capacity);
        if staff_hours.is_none() {
            warn!(
                resource_id = %ids.staff_hours_id,
                "depot resource missing; staff man-hours unconstrained"
            );
        }

        Self {
            maintenance_bays,
            staff_hours,
            avg_cost_to_maintenance: average_cost_to(
                &snapshot.shunting_costs,
                MAINTENANCE_LOCATION_MARKER,
            ),
            avg_cost_to_stabling: average_cost_to(
                &snapshot.shunting_costs,
                STABLING_LOCATION_MARKER,
            ),
        }
    }

    /// Average shunting cost of the move implied by `status`
    pub fn shunting_cost(&self, status: TrainStatus) -> f64 {
        match status {
            TrainStatus::Maintenance => self.avg_cost_to_maintenance,
            TrainStatus::RevenueService | TrainStatus::Standby => self.avg_cost_to_stabling,
        }
    }

    /// Bays and man-hours consumed by the Maintenance trains of `solution`
    pub fn usage(&self, solution: &Solution, assessments: &[Assessment]) -> CapacityUsage {
        let mut bays_used = 0usize;
        let mut man_hours_used = 0.0;
        for a in assessments {
            if solution.status_of(&a.trainset_id) == Some(TrainStatus::Maintenance) {
                bays_used += 1;
                man_hours_used += a.pending_work_hours();
            }
        }

        CapacityUsage {
            bays_used,
            bay_capacity: self.maintenance_bays,
            man_hours_used,
            man_hour_capacity: self.staff_hours,
        }
    }
}

/// Mean cost over rows whose destination contains `marker`; 0 when none match
pub fn average_cost_to(costs: &[ShuntingCost], marker: &str) -> f64 {
    let matching: Vec<f64> = costs
        .iter()
        .filter(|c| c.to_location.contains(marker))
        .map(|c| c.cost)
        .collect();
    if matching.is_empty() {
        0.0
    } else {
        matching.iter().sum::<f64>() / matching.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fleet::DepotResource;

    fn cost(from: &str, to: &str, cost: f64) -> ShuntingCost {
        ShuntingCost {
            from_location: from.to_string(),
            to_location: to.to_string(),
            cost,
        }
    }

    #[test]
    fn test_average_costs_by_destination() {
        let costs = vec![
            cost("Stabling_Track_1", "IBL_Bay_1", 100.0),
            cost("Stabling_Track_2", "IBL_Bay_2", 200.0),
            cost("IBL_Bay_1", "Stabling_Track_3", 50.0),
            cost("Washing_Line", "Mainline_Exit", 999.0),
        ];
        assert_eq!(average_cost_to(&costs, MAINTENANCE_LOCATION_MARKER), 150.0);
        assert_eq!(average_cost_to(&costs, STABLING_LOCATION_MARKER), 50.0);
        assert_eq!(average_cost_to(&[], STABLING_LOCATION_MARKER), 0.0);
    }

    #[test]
    fn test_from_snapshot_reads_configured_ids() {
        let snapshot = FleetSnapshot {
            depot_resources: vec![
                DepotResource {
                    resource_id: "IBL_Bays".to_string(),
                    available_capacity: 5.0,
                },
                DepotResource {
                    resource_id: "Cleaning_Staff_ManHours".to_string(),
                    available_capacity: 120.0,
                },
            ],
            shunting_costs: vec![cost("Stabling_Track_1", "IBL_Bay_1", 80.0)],
            ..Default::default()
        };

        let model = CapacityModel::from_snapshot(&snapshot, &ResourceIds::default());
        assert_eq!(model.maintenance_bays, Some(5.0));
        assert_eq!(model.staff_hours, Some(120.0));
        assert_eq!(model.shunting_cost(TrainStatus::Maintenance), 80.0);
        assert_eq!(model.shunting_cost(TrainStatus::Standby), 0.0);

        let ids = ResourceIds {
            maintenance_bays_id: "Pit_Lines".to_string(),
            ..ResourceIds::default()
        };
        let model = CapacityModel::from_snapshot(&snapshot, &ids);
        assert_eq!(model.maintenance_bays, None);
    }

    #[test]
    fn test_usage_flags_overrun() {
        let usage = CapacityUsage {
            bays_used: 8,
            bay_capacity: Some(5.0),
            man_hours_used: 30.0,
            man_hour_capacity: Some(40.0),
        };
        assert!(usage.bays_exceeded());
        assert!(!usage.man_hours_exceeded());
        assert!(usage.exceeded());

        let open = CapacityUsage {
            bay_capacity: None,
            man_hour_capacity: None,
            ..usage
        };
        assert!(!open.exceeded());
    }
}
