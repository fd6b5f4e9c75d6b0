// ==========================================
// Metro Induction Planner - snapshot repository
// ==========================================
// Reads the six planning tables into an immutable FleetSnapshot.
// No business rules here: only typing and shape checks.
// ==========================================

use crate::db::{table_exists, SNAPSHOT_TABLES};
use crate::domain::fleet::{
    BrandingSla, Certificate, DepotResource, JobCard, ShuntingCost, Trainset,
};
use crate::domain::snapshot::FleetSnapshot;
use crate::domain::types::{parse_bool_text, JobCardStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, instrument};

// ==========================================
// SnapshotRepository
// ==========================================
pub struct SnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SnapshotRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Loads all six tables
    ///
    /// # Errors
    /// - SchemaMismatch: a table or column is missing
    /// - FieldValueError: a value cannot be typed (bad date, non-numeric)
    /// - EmptySnapshot: no trainsets
    #[instrument(skip(self))]
    pub fn load(&self) -> RepositoryResult<FleetSnapshot> {
        let conn = self.get_conn()?;

        for table in SNAPSHOT_TABLES {
            if !table_exists(&conn, table)? {
                return Err(RepositoryError::SchemaMismatch {
                    table: table.to_string(),
                    detail: "table does not exist".to_string(),
                });
            }
        }

        let snapshot = FleetSnapshot {
            trainsets: load_trainsets(&conn)?,
            certificates: load_certificates(&conn)?,
            job_cards: load_job_cards(&conn)?,
            branding_slas: load_branding_slas(&conn)?,
            depot_resources: load_depot_resources(&conn)?,
            shunting_costs: load_shunting_costs(&conn)?,
        };

        if snapshot.trainsets.is_empty() {
            return Err(RepositoryError::EmptySnapshot);
        }

        info!(
            trainsets = snapshot.trainsets.len(),
            certificates = snapshot.certificates.len(),
            job_cards = snapshot.job_cards.len(),
            branding_slas = snapshot.branding_slas.len(),
            depot_resources = snapshot.depot_resources.len(),
            shunting_costs = snapshot.shunting_costs.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}

// ==========================================
// Per-table loaders
// ==========================================

/// Runs `sql` and maps each row, tagging shape errors with the table name
fn query_table<T, F>(conn: &Connection, table: &str, sql: &str, mut map: F) -> RepositoryResult<Vec<T>>
where
    F: FnMut(&Row<'_>) -> RepositoryResult<T>,
{
    let mut stmt = conn.prepare(sql).map_err(|e| RepositoryError::SchemaMismatch {
        table: table.to_string(),
        detail: e.to_string(),
    })?;
    let mut rows = stmt.query([])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(map(row)?);
    }
    Ok(out)
}

fn load_trainsets(conn: &Connection) -> RepositoryResult<Vec<Trainset>> {
    const TABLE: &str = "trainsets";
    query_table(
        conn,
        TABLE,
        "SELECT trainset_id, cumulative_mileage_km, in_service_date, has_branding_wrap
         FROM trainsets ORDER BY trainset_id",
        |row| {
            let id = text(row, 0)?;
            Ok(Trainset {
                cumulative_mileage_km: number(row, 1, TABLE, &id, "cumulative_mileage_km")?,
                in_service_date: date(row, 2, TABLE, &id, "in_service_date")?,
                has_branding_wrap: parse_bool_text(&text(row, 3)?),
                trainset_id: id,
            })
        },
    )
}

fn load_certificates(conn: &Connection) -> RepositoryResult<Vec<Certificate>> {
    const TABLE: &str = "fitness_certificates";
    query_table(
        conn,
        TABLE,
        "SELECT certificate_id, trainset_id, certificate_type, expiry_date
         FROM fitness_certificates ORDER BY certificate_id",
        |row| {
            let id = text(row, 0)?;
            Ok(Certificate {
                trainset_id: text(row, 1)?,
                certificate_type: text(row, 2)?,
                expiry_date: date(row, 3, TABLE, &id, "expiry_date")?,
                certificate_id: id,
            })
        },
    )
}

fn load_job_cards(conn: &Connection) -> RepositoryResult<Vec<JobCard>> {
    const TABLE: &str = "job_cards";
    query_table(
        conn,
        TABLE,
        "SELECT job_card_id, trainset_id, status, is_critical, description, required_man_hours
         FROM job_cards ORDER BY job_card_id",
        |row| {
            let id = text(row, 0)?;
            Ok(JobCard {
                trainset_id: text(row, 1)?,
                status: JobCardStatus::parse(&text(row, 2)?),
                is_critical: parse_bool_text(&text(row, 3)?),
                description: text(row, 4)?,
                required_man_hours: number_or_zero(row, 5, TABLE, &id, "required_man_hours")?,
                job_card_id: id,
            })
        },
    )
}

fn load_branding_slas(conn: &Connection) -> RepositoryResult<Vec<BrandingSla>> {
    const TABLE: &str = "branding_slas";
    query_table(
        conn,
        TABLE,
        "SELECT sla_id, trainset_id, target_exposure_hours, current_exposure_hours, penalty_per_hour
         FROM branding_slas ORDER BY sla_id",
        |row| {
            let id = text(row, 0)?;
            Ok(BrandingSla {
                trainset_id: text(row, 1)?,
                target_exposure_hours: number(row, 2, TABLE, &id, "target_exposure_hours")?,
                current_exposure_hours: number(row, 3, TABLE, &id, "current_exposure_hours")?,
                penalty_per_hour: number(row, 4, TABLE, &id, "penalty_per_hour")?,
                sla_id: id,
            })
        },
    )
}

fn load_depot_resources(conn: &Connection) -> RepositoryResult<Vec<DepotResource>> {
    const TABLE: &str = "depot_resources";
    query_table(
        conn,
        TABLE,
        "SELECT resource_id, available_capacity FROM depot_resources ORDER BY resource_id",
        |row| {
            let id = text(row, 0)?;
            Ok(DepotResource {
                available_capacity: number(row, 1, TABLE, &id, "available_capacity")?,
                resource_id: id,
            })
        },
    )
}

fn load_shunting_costs(conn: &Connection) -> RepositoryResult<Vec<ShuntingCost>> {
    const TABLE: &str = "depot_layout_costs";
    query_table(
        conn,
        TABLE,
        "SELECT id, from_location, to_location, shunting_cost
         FROM depot_layout_costs ORDER BY id",
        |row| {
            let id = text(row, 0)?;
            Ok(ShuntingCost {
                from_location: text(row, 1)?,
                to_location: text(row, 2)?,
                cost: number(row, 3, TABLE, &id, "shunting_cost")?,
            })
        },
    )
}

// ==========================================
// Column typing helpers
// ==========================================
// Seeded databases store CSV text in numeric columns, so every column
// is read as a dynamic Value and typed here.

fn text(row: &Row<'_>, idx: usize) -> RepositoryResult<String> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => s.trim().to_string(),
        Value::Blob(b) => String::from_utf8_lossy(&b).trim().to_string(),
    })
}

fn field_error(table: &str, key: &str, field: &str, message: String) -> RepositoryError {
    RepositoryError::FieldValueError {
        table: table.to_string(),
        key: key.to_string(),
        field: field.to_string(),
        message,
    }
}

fn optional_number(
    row: &Row<'_>,
    idx: usize,
    table: &str,
    key: &str,
    field: &str,
) -> RepositoryResult<Option<f64>> {
    let value: Value = row.get(idx)?;
    match value {
        Value::Null => Ok(None),
        Value::Integer(i) => Ok(Some(i as f64)),
        Value::Real(r) if r.is_finite() => Ok(Some(r)),
        Value::Text(s) if s.trim().is_empty() => Ok(None),
        Value::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(field_error(table, key, field, format!("not a number: '{}'", s))),
        },
        other => Err(field_error(
            table,
            key,
            field,
            format!("not a number: {:?}", other),
        )),
    }
}

fn number(row: &Row<'_>, idx: usize, table: &str, key: &str, field: &str) -> RepositoryResult<f64> {
    optional_number(row, idx, table, key, field)?
        .ok_or_else(|| field_error(table, key, field, "value is missing".to_string()))
}

fn number_or_zero(
    row: &Row<'_>,
    idx: usize,
    table: &str,
    key: &str,
    field: &str,
) -> RepositoryResult<f64> {
    Ok(optional_number(row, idx, table, key, field)?.unwrap_or(0.0))
}

/// Parses `YYYY-MM-DD`, tolerating a trailing time part
pub fn parse_snapshot_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok().or_else(|| {
        trimmed
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    })
}

fn date(row: &Row<'_>, idx: usize, table: &str, key: &str, field: &str) -> RepositoryResult<NaiveDate> {
    let raw = text(row, idx)?;
    parse_snapshot_date(&raw)
        .ok_or_else(|| field_error(table, key, field, format!("not a YYYY-MM-DD date: '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn repo_with(sql: &str) -> SnapshotRepository {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(sql).unwrap();
        SnapshotRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_parse_snapshot_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 18);
        assert_eq!(parse_snapshot_date("2025-09-18"), expected);
        assert_eq!(parse_snapshot_date("2025-09-18 00:00:00"), expected);
        assert_eq!(parse_snapshot_date("18/09/2025"), None);
    }

    #[test]
    fn test_load_types_text_columns() {
        let repo = repo_with(
            r#"
            INSERT INTO trainsets VALUES ('T02', '61000', '2018-03-01', 'TRUE');
            INSERT INTO trainsets VALUES ('T01', 58000, '2017-06-17', 'false');
            INSERT INTO fitness_certificates VALUES ('C1', 'T01', 'Telecom', '2025-09-20');
            INSERT INTO job_cards VALUES ('J1', 'T01', 'open', 'True', 'Brake pads', '6');
            INSERT INTO branding_slas VALUES ('S1', 'T02', 400, 100, 500);
            INSERT INTO depot_resources VALUES ('IBL_Bays', 5);
            INSERT INTO depot_layout_costs (from_location, to_location, shunting_cost)
                VALUES ('Stabling_Track_1', 'IBL_Bay_1', 120);
            "#,
        );

        let snapshot = repo.load().unwrap();
        assert_eq!(snapshot.trainsets.len(), 2);
        assert_eq!(snapshot.trainsets[0].trainset_id, "T01");
        assert_eq!(snapshot.trainsets[1].cumulative_mileage_km, 61000.0);
        assert!(snapshot.trainsets[1].has_branding_wrap);
        assert!(!snapshot.trainsets[0].has_branding_wrap);

        let job = &snapshot.job_cards[0];
        assert_eq!(job.status, JobCardStatus::Open);
        assert!(job.is_critical);
        assert_eq!(job.required_man_hours, 6.0);

        assert_eq!(snapshot.shunting_costs[0].cost, 120.0);
        assert_eq!(snapshot.depot_resources[0].available_capacity, 5.0);
    }

    #[test]
    fn test_bad_date_is_field_error() {
        let repo = repo_with(
            "INSERT INTO trainsets VALUES ('T01', 1000, 'last spring', 'false');",
        );
        match repo.load() {
            Err(RepositoryError::FieldValueError { table, field, .. }) => {
                assert_eq!(table, "trainsets");
                assert_eq!(field, "in_service_date");
            }
            other => panic!("expected FieldValueError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_trainsets_rejected() {
        let repo = repo_with("");
        assert!(matches!(repo.load(), Err(RepositoryError::EmptySnapshot)));
    }

    #[test]
    fn test_missing_table_is_schema_mismatch() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch("DROP TABLE depot_layout_costs;").unwrap();
        let repo = SnapshotRepository::from_connection(Arc::new(Mutex::new(conn)));

        match repo.load() {
            Err(RepositoryError::SchemaMismatch { table, .. }) => {
                assert_eq!(table, "depot_layout_costs")
            }
            other => panic!("expected SchemaMismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(
            "DROP TABLE trainsets;
             CREATE TABLE trainsets (trainset_id TEXT PRIMARY KEY, cumulative_mileage_km INTEGER);",
        )
        .unwrap();
        let repo = SnapshotRepository::from_connection(Arc::new(Mutex::new(conn)));

        assert!(matches!(
            repo.load(),
            Err(RepositoryError::SchemaMismatch { .. })
        ));
    }
}
