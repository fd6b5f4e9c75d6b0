// ==========================================
// Metro Induction Planner - repository errors
// ==========================================
// Tool: thiserror derive
// ==========================================

use thiserror::Error;

/// Repository-layer errors (all are input faults for a planning run)
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Database errors =====
    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database lock failed: {0}")]
    LockError(String),

    #[error("database query failed: {0}")]
    DatabaseQueryError(String),

    // ===== Snapshot shape errors =====
    #[error("schema mismatch in table {table}: {detail}")]
    SchemaMismatch { table: String, detail: String },

    #[error("bad value in {table} (row {key}, field {field}): {message}")]
    FieldValueError {
        table: String,
        key: String,
        field: String,
        message: String,
    },

    #[error("snapshot contains no trainsets")]
    EmptySnapshot,
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("no such") => {
                RepositoryError::SchemaMismatch {
                    table: "unknown".to_string(),
                    detail: msg,
                }
            }
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::CannotOpen =>
            {
                RepositoryError::DatabaseConnectionError(
                    msg.unwrap_or_else(|| "unable to open database file".to_string()),
                )
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;
