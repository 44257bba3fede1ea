use crate::error::{TrackerError, TrackerResult};
use rusqlite::{Connection, ErrorCode, OptionalExtension};
use tracing::debug;

/// Roughly what a browser profile grants a single origin.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Flat string key-value storage. Every call is atomic on its own; sequences of
/// calls are not.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> TrackerResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> TrackerResult<()>;
    fn remove(&self, key: &str) -> TrackerResult<()>;
    fn list_keys(&self) -> TrackerResult<Vec<String>>;
}

pub struct SqliteStore {
    conn: Connection,
    quota_bytes: u64,
}

impl SqliteStore {
    pub fn new(conn: Connection, quota_bytes: u64) -> Self {
        Self { conn, quota_bytes }
    }

    /// Size the store would have if `key` were dropped, counted in characters.
    fn used_bytes_excluding(&self, key: &str) -> TrackerResult<u64> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(key) + LENGTH(value)), 0) FROM kv_store WHERE key <> ?1",
            [key],
            |row| row.get(0),
        )?;
        Ok(used.max(0) as u64)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> TrackerResult<Option<String>> {
        debug!(key, "kv get");
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> TrackerResult<()> {
        let needed = self.used_bytes_excluding(key)?
            + key.chars().count() as u64
            + value.chars().count() as u64;
        if needed > self.quota_bytes {
            return Err(TrackerError::StorageQuotaExceeded {
                key: key.to_string(),
                needed,
                quota: self.quota_bytes,
            });
        }

        debug!(key, len = value.len(), "kv set");
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, value],
            )
            .map_err(|e| match e.sqlite_error_code() {
                Some(ErrorCode::DiskFull) => TrackerError::StorageQuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota: self.quota_bytes,
                },
                _ => TrackerError::Storage(e),
            })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> TrackerResult<()> {
        debug!(key, "kv remove");
        self.conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }

    fn list_keys(&self) -> TrackerResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
pub fn test_store() -> SqliteStore {
    let conn = crate::db::connection::establish_test_connection().unwrap();
    SqliteStore::new(conn, DEFAULT_QUOTA_BYTES)
}
