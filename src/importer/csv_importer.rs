// ==========================================
// Metro Induction Planner - CSV fleet importer
// ==========================================
// One CSV file per table; each table is replaced inside its own
// transaction. Values are stored as text and SQLite column affinity
// types the numeric columns.
// ==========================================

use crate::db::init_schema;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use rusqlite::types::Value;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, instrument};

// ==========================================
// Table sources
// ==========================================

/// CSV file -> table mapping
#[derive(Debug, Clone, Copy)]
pub struct TableSource {
    pub file_name: &'static str,
    pub table: &'static str,
    pub columns: &'static [&'static str],
    /// Boolean-like columns stored lower-cased
    pub lowercase: &'static [&'static str],
}

/// Import order of the six tables
pub const TABLE_SOURCES: [TableSource; 6] = [
    TableSource {
        file_name: "trainsets_master.csv",
        table: "trainsets",
        columns: &[
            "trainset_id",
            "cumulative_mileage_km",
            "in_service_date",
            "has_branding_wrap",
        ],
        lowercase: &["has_branding_wrap"],
    },
    TableSource {
        file_name: "fitness_certificates.csv",
        table: "fitness_certificates",
        columns: &["certificate_id", "trainset_id", "certificate_type", "expiry_date"],
        lowercase: &[],
    },
    TableSource {
        file_name: "job_cards_maximo.csv",
        table: "job_cards",
        columns: &[
            "job_card_id",
            "trainset_id",
            "status",
            "is_critical",
            "description",
            "required_man_hours",
        ],
        lowercase: &["is_critical"],
    },
    TableSource {
        file_name: "branding_slas.csv",
        table: "branding_slas",
        columns: &[
            "sla_id",
            "trainset_id",
            "target_exposure_hours",
            "current_exposure_hours",
            "penalty_per_hour",
        ],
        lowercase: &[],
    },
    TableSource {
        file_name: "depot_resources.csv",
        table: "depot_resources",
        columns: &["resource_id", "available_capacity"],
        lowercase: &[],
    },
    TableSource {
        file_name: "depot_layout_costs.csv",
        table: "depot_layout_costs",
        columns: &["from_location", "to_location", "shunting_cost"],
        lowercase: &[],
    },
];

/// Rows written per table, in import order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub tables: Vec<(String, usize)>,
}

impl ImportSummary {
    pub fn rows_for(&self, table: &str) -> Option<usize> {
        self.tables
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, n)| *n)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, n)| n).sum()
    }
}

// ==========================================
// CSV reading
// ==========================================

/// Reads a headed CSV file into trimmed header -> value maps
///
/// Fully blank rows are skipped.
pub fn read_csv_records(path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = HashMap::new();
        for (idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(idx) {
                row.insert(header.clone(), value.trim().to_string());
            }
        }

        if row.values().all(|v| v.is_empty()) {
            continue;
        }
        records.push(row);
    }
    Ok(records)
}

// ==========================================
// CsvFleetImporter
// ==========================================
pub struct CsvFleetImporter {
    conn: Arc<Mutex<Connection>>,
}

impl CsvFleetImporter {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> ImportResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ImportError::LockError(e.to_string()))
    }

    /// Imports every table from `dir`
    ///
    /// All files are read and checked before the first write, so a
    /// missing file leaves the database untouched.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn import_dir(&self, dir: &Path) -> ImportResult<ImportSummary> {
        let mut staged = Vec::with_capacity(TABLE_SOURCES.len());
        for source in &TABLE_SOURCES {
            let records = read_csv_records(&dir.join(source.file_name))?;
            let rows = Self::project_rows(source, &records)?;
            staged.push((source, rows));
        }

        let mut conn = self.get_conn()?;
        init_schema(&conn)?;

        let mut summary = ImportSummary::default();
        for (source, rows) in staged {
            let written = Self::replace_table(&mut conn, source, &rows)?;
            info!(table = source.table, rows = written, "table seeded");
            summary.tables.push((source.table.to_string(), written));
        }
        Ok(summary)
    }

    /// Picks the table columns out of each record
    fn project_rows(
        source: &TableSource,
        records: &[HashMap<String, String>],
    ) -> ImportResult<Vec<Vec<Value>>> {
        let mut rows = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let mut values = Vec::with_capacity(source.columns.len());
            for column in source.columns {
                let raw = record.get(*column).ok_or_else(|| ImportError::MissingColumn {
                    file: source.file_name.to_string(),
                    // header is row 1
                    row: idx + 2,
                    column: column.to_string(),
                })?;

                let value = if raw.is_empty() {
                    Value::Null
                } else if source.lowercase.contains(column) {
                    Value::Text(raw.to_lowercase())
                } else {
                    Value::Text(raw.clone())
                };
                values.push(value);
            }
            rows.push(values);
        }
        Ok(rows)
    }

    fn replace_table(
        conn: &mut Connection,
        source: &TableSource,
        rows: &[Vec<Value>],
    ) -> ImportResult<usize> {
        let placeholders = vec!["?"; source.columns.len()].join(",");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            source.table,
            source.columns.join(","),
            placeholders
        );

        let tx = conn.transaction()?;
        tx.execute(&format!("DELETE FROM {}", source.table), [])?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                stmt.execute(rusqlite::params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_read_csv_records_skips_blank_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "resource_id,available_capacity").unwrap();
        writeln!(file, "IBL_Bays, 5").unwrap();
        writeln!(file, ",").unwrap();
        writeln!(file, "Cleaning_Staff_ManHours,120").unwrap();

        let records = read_csv_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("available_capacity"), Some(&"5".to_string()));
    }

    #[test]
    fn test_read_csv_records_missing_file() {
        let result = read_csv_records(Path::new("no_such_dir/trainsets_master.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_missing_column_names_file_and_row() {
        let records = vec![HashMap::from([
            ("resource_id".to_string(), "IBL_Bays".to_string()),
        ])];
        let err = CsvFleetImporter::project_rows(&TABLE_SOURCES[4], &records).unwrap_err();
        match err {
            ImportError::MissingColumn { file, row, column } => {
                assert_eq!(file, "depot_resources.csv");
                assert_eq!(row, 2);
                assert_eq!(column, "available_capacity");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_import_dir_missing_file_writes_nothing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("trainsets_master.csv"),
            "trainset_id,cumulative_mileage_km,in_service_date,has_branding_wrap\nT01,1000,2020-01-01,TRUE\n",
        )
        .unwrap();

        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let importer = CsvFleetImporter::from_connection(conn.clone());
        assert!(matches!(
            importer.import_dir(dir.path()),
            Err(ImportError::FileNotFound(_))
        ));

        let guard = conn.lock().unwrap();
        assert!(!crate::db::table_exists(&guard, "trainsets").unwrap());
    }
}
