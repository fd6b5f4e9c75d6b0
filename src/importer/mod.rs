// ==========================================
// Metro Induction Planner - CSV seeding
// ==========================================
// Loads the six planning tables from the depot's CSV exports
// ==========================================

pub mod csv_importer;
pub mod error;

pub use csv_importer::{read_csv_records, CsvFleetImporter, ImportSummary, TableSource, TABLE_SOURCES};
pub use error::{ImportError, ImportResult};
