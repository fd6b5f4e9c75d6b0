// ==========================================
// Fleet builders for integration tests
// ==========================================
// One FleetBuilder renders the same fleet three ways:
// in-memory snapshot, snapshot database rows, seed CSV files.
// ==========================================

use chrono::NaiveDate;
use csv::Writer;
use metro_induction::domain::{
    BrandingSla, Certificate, DepotResource, FleetSnapshot, JobCard, JobCardStatus, ShuntingCost,
    Trainset,
};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fs::File;
use std::path::Path;

pub const CERT_TYPES: [&str; 3] = ["Rolling-Stock", "Signalling", "Telecom"];

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// TrainBuilder
// ==========================================

pub struct TrainBuilder {
    id: String,
    mileage: f64,
    in_service: NaiveDate,
    wrap: bool,
    certificates: Vec<(String, NaiveDate)>,
    jobs: Vec<(bool, JobCardStatus, f64)>,
    sla: Option<(f64, f64, f64)>,
}

impl TrainBuilder {
    /// Healthy train: three certificates valid well past 2025-09-18
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            mileage: 50_000.0,
            in_service: ymd(2018, 1, 1),
            wrap: false,
            certificates: CERT_TYPES
                .iter()
                .map(|t| (t.to_string(), ymd(2026, 3, 1)))
                .collect(),
            jobs: Vec::new(),
            sla: None,
        }
    }

    pub fn mileage(mut self, km: f64) -> Self {
        self.mileage = km;
        self
    }

    pub fn in_service(mut self, date: NaiveDate) -> Self {
        self.in_service = date;
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    /// Replaces the expiry of one certificate type
    pub fn cert_expiring(mut self, cert_type: &str, date: NaiveDate) -> Self {
        self.certificates.retain(|(t, _)| t != cert_type);
        self.certificates.push((cert_type.to_string(), date));
        self
    }

    pub fn without_cert(mut self, cert_type: &str) -> Self {
        self.certificates.retain(|(t, _)| t != cert_type);
        self
    }

    pub fn open_job(mut self, critical: bool, hours: f64) -> Self {
        self.jobs.push((critical, JobCardStatus::Open, hours));
        self
    }

    pub fn closed_job(mut self, critical: bool, hours: f64) -> Self {
        self.jobs.push((critical, JobCardStatus::Closed, hours));
        self
    }

    pub fn sla(mut self, target: f64, current: f64, penalty: f64) -> Self {
        self.sla = Some((target, current, penalty));
        self
    }
}

// ==========================================
// FleetBuilder
// ==========================================

#[derive(Default)]
pub struct FleetBuilder {
    snapshot: FleetSnapshot,
    job_seq: usize,
}

impl FleetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn train(mut self, train: TrainBuilder) -> Self {
        let snap = &mut self.snapshot;
        snap.trainsets.push(Trainset {
            trainset_id: train.id.clone(),
            cumulative_mileage_km: train.mileage,
            in_service_date: train.in_service,
            has_branding_wrap: train.wrap,
        });
        for (cert_type, expiry) in train.certificates {
            snap.certificates.push(Certificate {
                certificate_id: format!("FC-{}-{}", train.id, cert_type),
                trainset_id: train.id.clone(),
                certificate_type: cert_type,
                expiry_date: expiry,
            });
        }
        for (critical, status, hours) in train.jobs {
            self.job_seq += 1;
            snap.job_cards.push(JobCard {
                job_card_id: format!("JC-{:04}", self.job_seq),
                trainset_id: train.id.clone(),
                status,
                is_critical: critical,
                description: if critical {
                    "Brake system fault".to_string()
                } else {
                    "Routine cleaning".to_string()
                },
                required_man_hours: hours,
            });
        }
        if let Some((target, current, penalty)) = train.sla {
            snap.branding_slas.push(BrandingSla {
                sla_id: format!("SLA-{}", train.id),
                trainset_id: train.id,
                target_exposure_hours: target,
                current_exposure_hours: current,
                penalty_per_hour: penalty,
            });
        }
        self
    }

    /// `count` healthy trains TS-<start>.. with spread mileage
    pub fn healthy_trains(mut self, start: usize, count: usize) -> Self {
        for i in start..start + count {
            self = self.train(
                TrainBuilder::new(&format!("TS-{:02}", i)).mileage(30_000.0 + i as f64 * 1_500.0),
            );
        }
        self
    }

    /// `count` trains TS-<start>.. each with an open critical job card
    pub fn broken_trains(mut self, start: usize, count: usize, hours: f64) -> Self {
        for i in start..start + count {
            self = self.train(TrainBuilder::new(&format!("TS-{:02}", i)).open_job(true, hours));
        }
        self
    }

    pub fn resource(mut self, resource_id: &str, capacity: f64) -> Self {
        self.snapshot.depot_resources.push(DepotResource {
            resource_id: resource_id.to_string(),
            available_capacity: capacity,
        });
        self
    }

    pub fn bays(self, count: f64) -> Self {
        self.resource("IBL_Bays", count)
    }

    pub fn staff_hours(self, hours: f64) -> Self {
        self.resource("Cleaning_Staff_ManHours", hours)
    }

    pub fn shunting(mut self, from: &str, to: &str, cost: f64) -> Self {
        self.snapshot.shunting_costs.push(ShuntingCost {
            from_location: from.to_string(),
            to_location: to.to_string(),
            cost,
        });
        self
    }

    pub fn build(&self) -> FleetSnapshot {
        self.snapshot.clone()
    }

    // ==========================================
    // Rendering
    // ==========================================

    /// Inserts every row into an initialized snapshot database
    pub fn seed_db(&self, db_path: &str) -> Result<(), Box<dyn Error>> {
        let conn = Connection::open(db_path)?;
        metro_induction::db::init_schema(&conn)?;
        let s = &self.snapshot;

        for t in &s.trainsets {
            conn.execute(
                "INSERT INTO trainsets VALUES (?1, ?2, ?3, ?4)",
                params![
                    t.trainset_id,
                    t.cumulative_mileage_km,
                    t.in_service_date.to_string(),
                    if t.has_branding_wrap { "true" } else { "false" }
                ],
            )?;
        }
        for c in &s.certificates {
            conn.execute(
                "INSERT INTO fitness_certificates VALUES (?1, ?2, ?3, ?4)",
                params![
                    c.certificate_id,
                    c.trainset_id,
                    c.certificate_type,
                    c.expiry_date.to_string()
                ],
            )?;
        }
        for j in &s.job_cards {
            conn.execute(
                "INSERT INTO job_cards VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    j.job_card_id,
                    j.trainset_id,
                    j.status.to_string(),
                    if j.is_critical { "true" } else { "false" },
                    j.description,
                    j.required_man_hours
                ],
            )?;
        }
        for b in &s.branding_slas {
            conn.execute(
                "INSERT INTO branding_slas VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    b.sla_id,
                    b.trainset_id,
                    b.target_exposure_hours,
                    b.current_exposure_hours,
                    b.penalty_per_hour
                ],
            )?;
        }
        for r in &s.depot_resources {
            conn.execute(
                "INSERT INTO depot_resources VALUES (?1, ?2)",
                params![r.resource_id, r.available_capacity],
            )?;
        }
        for c in &s.shunting_costs {
            conn.execute(
                "INSERT INTO depot_layout_costs (from_location, to_location, shunting_cost)
                 VALUES (?1, ?2, ?3)",
                params![c.from_location, c.to_location, c.cost],
            )?;
        }
        Ok(())
    }

    /// Writes the six seed CSV files (upper-case booleans, as exported)
    pub fn write_csvs(&self, dir: &Path) -> Result<(), Box<dyn Error>> {
        let s = &self.snapshot;
        let flag = |b: bool| (if b { "TRUE" } else { "FALSE" }).to_string();

        let mut w = Writer::from_writer(File::create(dir.join("trainsets_master.csv"))?);
        w.write_record([
            "trainset_id",
            "cumulative_mileage_km",
            "in_service_date",
            "has_branding_wrap",
        ])?;
        for t in &s.trainsets {
            w.write_record([
                t.trainset_id.clone(),
                t.cumulative_mileage_km.to_string(),
                t.in_service_date.to_string(),
                flag(t.has_branding_wrap),
            ])?;
        }
        w.flush()?;

        let mut w = Writer::from_writer(File::create(dir.join("fitness_certificates.csv"))?);
        w.write_record(["certificate_id", "trainset_id", "certificate_type", "expiry_date"])?;
        for c in &s.certificates {
            w.write_record([
                c.certificate_id.clone(),
                c.trainset_id.clone(),
                c.certificate_type.clone(),
                c.expiry_date.to_string(),
            ])?;
        }
        w.flush()?;

        let mut w = Writer::from_writer(File::create(dir.join("job_cards_maximo.csv"))?);
        w.write_record([
            "job_card_id",
            "trainset_id",
            "status",
            "is_critical",
            "description",
            "required_man_hours",
        ])?;
        for j in &s.job_cards {
            w.write_record([
                j.job_card_id.clone(),
                j.trainset_id.clone(),
                j.status.to_string(),
                flag(j.is_critical),
                j.description.clone(),
                j.required_man_hours.to_string(),
            ])?;
        }
        w.flush()?;

        let mut w = Writer::from_writer(File::create(dir.join("branding_slas.csv"))?);
        w.write_record([
            "sla_id",
            "trainset_id",
            "target_exposure_hours",
            "current_exposure_hours",
            "penalty_per_hour",
        ])?;
        for b in &s.branding_slas {
            w.write_record([
                b.sla_id.clone(),
                b.trainset_id.clone(),
                b.target_exposure_hours.to_string(),
                b.current_exposure_hours.to_string(),
                b.penalty_per_hour.to_string(),
            ])?;
        }
        w.flush()?;

        let mut w = Writer::from_writer(File::create(dir.join("depot_resources.csv"))?);
        w.write_record(["resource_id", "available_capacity"])?;
        for r in &s.depot_resources {
            w.write_record([r.resource_id.clone(), r.available_capacity.to_string()])?;
        }
        w.flush()?;

        let mut w = Writer::from_writer(File::create(dir.join("depot_layout_costs.csv"))?);
        w.write_record(["from_location", "to_location", "shunting_cost"])?;
        for c in &s.shunting_costs {
            w.write_record([
                c.from_location.clone(),
                c.to_location.clone(),
                c.cost.to_string(),
            ])?;
        }
        w.flush()?;
        Ok(())
    }
}
