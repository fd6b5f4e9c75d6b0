// ==========================================
// seed_fleet_db <db_path> <csv_dir> [key=value ...]
// ==========================================
// Loads the six fleet CSV files into a snapshot database.
// Trailing key=value pairs are stored as config_kv overrides.
// ==========================================

use anyhow::{bail, Context};
use metro_induction::config::ConfigManager;
use metro_induction::db::open_sqlite_connection;
use metro_induction::importer::CsvFleetImporter;
use metro_induction::logging;
use std::path::Path;
use std::sync::{Arc, Mutex};

fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        bail!("usage: seed_fleet_db <db_path> <csv_dir> [key=value ...]");
    }
    let db_path = &args[0];
    let csv_dir = Path::new(&args[1]);

    let conn = open_sqlite_connection(db_path)
        .with_context(|| format!("cannot open database {}", db_path))?;
    let conn = Arc::new(Mutex::new(conn));

    let summary = CsvFleetImporter::from_connection(conn.clone())
        .import_dir(csv_dir)
        .with_context(|| format!("import from {} failed", csv_dir.display()))?;

    let config = ConfigManager::from_connection(conn);
    for pair in &args[2..] {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected key=value, got '{}'", pair);
        };
        config
            .set_value(key, value)
            .with_context(|| format!("cannot store override {}", pair))?;
    }

    for (table, rows) in &summary.tables {
        eprintln!("{:<22} {:>6} rows", table, rows);
    }
    eprintln!(
        "Seeded {} ({} rows, {} overrides)",
        db_path,
        summary.total_rows(),
        args.len() - 2
    );
    Ok(())
}
