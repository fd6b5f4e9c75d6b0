// ==========================================
// Metro Induction Planner - configuration manager
// ==========================================
// Storage: config_kv table (key -> value) in the snapshot database.
// The table is optional; a database without it uses the defaults.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::planner_config::PlannerConfig;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Creates a manager over an already-open connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::ReadError(format!("lock poisoned: {}", e)))
    }

    fn has_table(conn: &Connection) -> ConfigResult<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name='config_kv' LIMIT 1",
                [],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(found)
    }

    /// Reads every stored override, ordered by key
    ///
    /// # Returns
    /// - Ok(empty) when the config_kv table does not exist
    pub fn read_overrides(&self) -> ConfigResult<Vec<(String, String)>> {
        let conn = self.get_conn()?;
        if !Self::has_table(&conn)? {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut overrides = Vec::new();
        for row in rows {
            overrides.push(row?);
        }
        Ok(overrides)
    }

    /// Applies the stored overrides onto `config`
    ///
    /// # Returns
    /// Number of overrides applied
    pub fn apply_to(&self, config: &mut PlannerConfig) -> ConfigResult<usize> {
        let overrides = self.read_overrides()?;
        for (key, value) in &overrides {
            debug!(key = %key, value = %value, "applying config_kv override");
            config.apply_override(key, value)?;
        }
        Ok(overrides.len())
    }

    /// Stores one override (insert or replace)
    ///
    /// The value is checked against a scratch config first, so a bad
    /// value is rejected here instead of on the next planning run.
    pub fn set_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        PlannerConfig::default().apply_override(key, value)?;

        let conn = self.get_conn()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS config_kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        conn.execute(
            "INSERT INTO config_kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key.trim(), value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_missing_table_means_no_overrides() {
        let manager = manager();
        assert!(manager.read_overrides().unwrap().is_empty());

        let mut config = PlannerConfig::default();
        assert_eq!(manager.apply_to(&mut config).unwrap(), 0);
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_set_and_apply_overrides() {
        let manager = manager();
        manager.set_value("optimizer.time_limit_secs", "5").unwrap();
        manager.set_value("w_branding", "80").unwrap();
        manager.set_value("w_branding", "90").unwrap();

        let mut config = PlannerConfig::default();
        assert_eq!(manager.apply_to(&mut config).unwrap(), 2);
        assert_eq!(config.optimizer.time_limit_secs, 5);
        assert_eq!(config.w_branding, 90.0);
    }

    #[test]
    fn test_set_value_rejects_bad_value() {
        let manager = manager();
        assert!(manager.set_value("w_mileage", "abc").is_err());
        assert!(manager.read_overrides().unwrap().is_empty());
    }
}
