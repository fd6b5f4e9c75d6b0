// ==========================================
// Fleet data generator
// ==========================================
// Usage: generate_fleet_data [out_dir] [train_count] [seed]
// Output: the six seed CSV files read by seed_fleet_db
// Same seed → same files.
// ==========================================

use chrono::{Duration, NaiveDate};
use csv::Writer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fs::{self, File};
use std::path::Path;

const DEFAULT_OUT_DIR: &str = "tests/fixtures/fleet";
const DEFAULT_TRAIN_COUNT: usize = 25;
const DEFAULT_SEED: u64 = 2025;

const CERTIFICATE_TYPES: [&str; 3] = ["Rolling-Stock", "Signalling", "Telecom"];

const JOB_DESCRIPTIONS: [&str; 6] = [
    "Brake pad replacement",
    "HVAC filter service",
    "Door actuator fault",
    "Pantograph inspection",
    "Traction motor vibration",
    "Interior cleaning backlog",
];

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let out_dir = args.first().map(String::as_str).unwrap_or(DEFAULT_OUT_DIR);
    let train_count = args
        .get(1)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_TRAIN_COUNT)
        .max(1);
    let seed = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);

    let out = Path::new(out_dir);
    fs::create_dir_all(out)?;

    // anchor: the day the data is meant to be planned for
    let today = NaiveDate::from_ymd_opt(2025, 9, 18).ok_or("bad anchor date")?;
    let mut rng = StdRng::seed_from_u64(seed);

    let ids: Vec<String> = (1..=train_count).map(|i| format!("TS-{:02}", i)).collect();

    generate_trainsets(out, &ids, today, &mut rng)?;
    generate_certificates(out, &ids, today, &mut rng)?;
    generate_job_cards(out, &ids, &mut rng)?;
    generate_branding_slas(out, &ids, &mut rng)?;
    generate_depot_resources(out)?;
    generate_layout_costs(out, &mut rng)?;

    println!("✓ fleet data for {} trainsets written to {}", train_count, out_dir);
    Ok(())
}

fn writer(out: &Path, file_name: &str) -> Result<Writer<File>, Box<dyn Error>> {
    Ok(Writer::from_writer(File::create(out.join(file_name))?))
}

fn generate_trainsets(
    out: &Path,
    ids: &[String],
    today: NaiveDate,
    rng: &mut StdRng,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = writer(out, "trainsets_master.csv")?;
    wtr.write_record([
        "trainset_id",
        "cumulative_mileage_km",
        "in_service_date",
        "has_branding_wrap",
    ])?;
    for id in ids {
        let mileage: u32 = rng.random_range(20_000..120_000);
        let age_days: i64 = rng.random_range(365..3_650);
        let service_date = today - Duration::days(age_days);
        let wrap = if rng.random_bool(0.3) { "TRUE" } else { "FALSE" };
        wtr.write_record([
            id.clone(),
            mileage.to_string(),
            service_date.to_string(),
            wrap.to_string(),
        ])?;
    }
    wtr.flush()?;
    println!("✓ trainsets_master.csv ({} rows)", ids.len());
    Ok(())
}

fn generate_certificates(
    out: &Path,
    ids: &[String],
    today: NaiveDate,
    rng: &mut StdRng,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = writer(out, "fitness_certificates.csv")?;
    wtr.write_record(["certificate_id", "trainset_id", "certificate_type", "expiry_date"])?;
    let mut rows = 0;
    for id in ids {
        for kind in CERTIFICATE_TYPES {
            // ~5% expired, ~10% expiring within the week
            let roll: f64 = rng.random();
            let offset: i64 = if roll < 0.05 {
                -rng.random_range(1..30i64)
            } else if roll < 0.15 {
                rng.random_range(0..=7)
            } else {
                rng.random_range(30..365)
            };
            rows += 1;
            wtr.write_record([
                format!("FC-{:04}", rows),
                id.clone(),
                kind.to_string(),
                (today + Duration::days(offset)).to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    println!("✓ fitness_certificates.csv ({} rows)", rows);
    Ok(())
}

fn generate_job_cards(out: &Path, ids: &[String], rng: &mut StdRng) -> Result<(), Box<dyn Error>> {
    let mut wtr = writer(out, "job_cards_maximo.csv")?;
    wtr.write_record([
        "job_card_id",
        "trainset_id",
        "status",
        "is_critical",
        "description",
        "required_man_hours",
    ])?;
    let mut rows = 0;
    for id in ids {
        let cards: u32 = rng.random_range(0..3);
        for _ in 0..cards {
            rows += 1;
            let status = if rng.random_bool(0.6) { "OPEN" } else { "CLOSED" };
            let critical = if rng.random_bool(0.1) { "TRUE" } else { "FALSE" };
            let description = JOB_DESCRIPTIONS[rng.random_range(0..JOB_DESCRIPTIONS.len())];
            let hours: u32 = rng.random_range(1..16);
            wtr.write_record([
                format!("JC-{:04}", rows),
                id.clone(),
                status.to_string(),
                critical.to_string(),
                description.to_string(),
                hours.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    println!("✓ job_cards_maximo.csv ({} rows)", rows);
    Ok(())
}

fn generate_branding_slas(
    out: &Path,
    ids: &[String],
    rng: &mut StdRng,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = writer(out, "branding_slas.csv")?;
    wtr.write_record([
        "sla_id",
        "trainset_id",
        "target_exposure_hours",
        "current_exposure_hours",
        "penalty_per_hour",
    ])?;
    let mut rows = 0;
    for id in ids {
        if !rng.random_bool(0.4) {
            continue;
        }
        rows += 1;
        let target: u32 = rng.random_range(200..600);
        let current = (target as f64 * rng.random_range(0.3..1.05)).round() as u32;
        let penalty: u32 = rng.random_range(20..120);
        wtr.write_record([
            format!("SLA-{:03}", rows),
            id.clone(),
            target.to_string(),
            current.to_string(),
            penalty.to_string(),
        ])?;
    }
    wtr.flush()?;
    println!("✓ branding_slas.csv ({} rows)", rows);
    Ok(())
}

fn generate_depot_resources(out: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = writer(out, "depot_resources.csv")?;
    wtr.write_record(["resource_id", "available_capacity"])?;
    wtr.write_record(["IBL_Bays", "5"])?;
    wtr.write_record(["Cleaning_Staff_ManHours", "80"])?;
    wtr.flush()?;
    println!("✓ depot_resources.csv (2 rows)");
    Ok(())
}

fn generate_layout_costs(out: &Path, rng: &mut StdRng) -> Result<(), Box<dyn Error>> {
    let mut wtr = writer(out, "depot_layout_costs.csv")?;
    wtr.write_record(["from_location", "to_location", "shunting_cost"])?;
    let mut rows = 0;
    for track in 1..=4 {
        for bay in 1..=3 {
            rows += 2;
            let inbound: u32 = rng.random_range(8..25);
            let outbound: u32 = rng.random_range(6..20);
            wtr.write_record([
                format!("Stabling_Track_{}", track),
                format!("IBL_Bay_{}", bay),
                inbound.to_string(),
            ])?;
            wtr.write_record([
                format!("IBL_Bay_{}", bay),
                format!("Stabling_Track_{}", track),
                outbound.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    println!("✓ depot_layout_costs.csv ({} rows)", rows);
    Ok(())
}
