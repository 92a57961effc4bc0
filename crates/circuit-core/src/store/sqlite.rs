//! SqliteStore: file-backed ordered key-value store.

use super::{BatchOp, KvStore, KV_SCHEMA};
use crate::error::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const UPSERT_SQL: &str = r#"
    INSERT INTO kv (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value
"#;

const DELETE_SQL: &str = "DELETE FROM kv WHERE key = ?1";

/// SQLite-backed key-value store.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a file-backed store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory store (for testing).
    pub fn memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    /// Create store from existing connection (for multi-connection tests).
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::init_connection(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_connection(conn: &Connection) -> Result<(), StoreError> {
        // WAL mode for file-backed DBs (no-op for in-memory)
        let _ = conn.execute_batch("PRAGMA journal_mode = WAL");
        let _ = conn.execute_batch("PRAGMA busy_timeout = 5000");
        conn.execute_batch(KV_SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(UPSERT_SQL, params![key, value])?;
        Ok(())
    }

    fn remove(&self, key: &[u8]) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(DELETE_SQL, [key])?;
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM kv WHERE key >= ?1 ORDER BY key")?;
        let mut rows = stmt.query([prefix])?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let key: Vec<u8> = row.get(0)?;
            if !key.starts_with(prefix) {
                break;
            }
            entries.push((key, row.get(1)?));
        }
        Ok(entries)
    }

    fn apply_batch(&self, batch: &[BatchOp]) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for (key, value) in batch {
            match value {
                Some(value) => {
                    tx.execute(UPSERT_SQL, params![key, value])?;
                }
                None => {
                    tx.execute(DELETE_SQL, params![key])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}
