// ==========================================
// Metro Induction Planner - SQLite connection setup
// ==========================================
// Every Connection::open goes through here so PRAGMAs and busy_timeout
// are the same for the planner, the seeder and the tests.
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Tables the planner reads
pub const SNAPSHOT_TABLES: [&str; 6] = [
    "trainsets",
    "fitness_certificates",
    "job_cards",
    "branding_slas",
    "depot_resources",
    "depot_layout_costs",
];

/// Applies the shared PRAGMAs to a connection
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Opens a SQLite connection with the shared configuration
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Opens an existing database read-only (planning runs never write)
pub fn open_sqlite_connection_read_only(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_URI,
    )?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(conn)
}

/// Creates the snapshot tables and config_kv (idempotent)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS trainsets (
            trainset_id TEXT PRIMARY KEY,
            cumulative_mileage_km INTEGER,
            in_service_date TEXT,
            has_branding_wrap TEXT
        );
        CREATE TABLE IF NOT EXISTS fitness_certificates (
            certificate_id TEXT PRIMARY KEY,
            trainset_id TEXT,
            certificate_type TEXT,
            expiry_date TEXT
        );
        CREATE TABLE IF NOT EXISTS job_cards (
            job_card_id TEXT PRIMARY KEY,
            trainset_id TEXT,
            status TEXT,
            is_critical TEXT,
            description TEXT,
            required_man_hours INTEGER
        );
        CREATE TABLE IF NOT EXISTS branding_slas (
            sla_id TEXT PRIMARY KEY,
            trainset_id TEXT,
            target_exposure_hours INTEGER,
            current_exposure_hours INTEGER,
            penalty_per_hour INTEGER
        );
        CREATE TABLE IF NOT EXISTS depot_resources (
            resource_id TEXT PRIMARY KEY,
            available_capacity INTEGER
        );
        CREATE TABLE IF NOT EXISTS depot_layout_costs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            from_location TEXT,
            to_location TEXT,
            shunting_cost INTEGER
        );
        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )
}

/// Returns true when `table` exists
pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1",
            [table],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    Ok(found)
}
