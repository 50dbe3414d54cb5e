//! SQLite implementation of the Store trait.
//!
//! This is the persistent backend. Each commit validates the read set and
//! applies the writes inside a single SQLite transaction.

use std::path::Path;
use std::sync::Mutex;

use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{CommitResult, Store, Versioned, WriteBatch};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&mut conn)
    }
}

fn to_version(raw: i64) -> Result<u64> {
    u64::try_from(raw).map_err(|_| StoreError::InvalidData(format!("negative version {}", raw)))
}

fn current_version(conn: &Connection, key: &str) -> Result<Option<u64>> {
    let raw: Option<i64> = conn
        .query_row(
            "SELECT version FROM world_state WHERE key = ?1",
            params![key.as_bytes()],
            |row| row.get(0),
        )
        .optional()?;
    raw.map(to_version).transpose()
}

fn current_height(conn: &Connection) -> Result<u64> {
    let raw: i64 = conn.query_row("SELECT COALESCE(MAX(height), 0) FROM commits", [], |row| {
        row.get(0)
    })?;
    to_version(raw)
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Versioned>> {
        self.with_conn(|conn| {
            let row: Option<(Vec<u8>, i64)> = conn
                .query_row(
                    "SELECT value, version FROM world_state WHERE key = ?1",
                    params![key.as_bytes()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            row.map(|(value, version)| -> Result<Versioned> {
                Ok(Versioned {
                    value: Bytes::from(value),
                    version: to_version(version)?,
                })
            })
            .transpose()
        })
    }

    fn commit(&self, batch: &WriteBatch) -> Result<CommitResult> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;

            for (key, seen) in &batch.reads {
                let current = current_version(&tx, key)?;
                if current != *seen {
                    debug!(key = %key.escape_debug(), ?seen, ?current, "read conflict");
                    // Dropping the transaction rolls it back
                    return Ok(CommitResult::Conflict { key: key.clone() });
                }
            }

            let height = current_height(&tx)?;
            if batch.is_read_only() {
                return Ok(CommitResult::Committed { height });
            }

            let height = height + 1;
            tx.execute(
                "INSERT INTO commits (height, write_count, committed_at) VALUES (?1, ?2, ?3)",
                params![height as i64, batch.writes.len() as i64, now_millis()],
            )?;

            for (key, value) in &batch.writes {
                tx.execute(
                    "INSERT INTO world_state (key, value, version) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, version = excluded.version",
                    params![key.as_bytes(), &value[..], height as i64],
                )?;
            }

            tx.commit()?;
            debug!(height, writes = batch.writes.len(), "committed batch");
            Ok(CommitResult::Committed { height })
        })
    }

    fn height(&self) -> Result<u64> {
        self.with_conn(|conn| current_height(conn))
    }

    fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM world_state", [], |row| row.get(0))?;
            usize::try_from(count).map_err(|_| StoreError::InvalidData(format!("row count {}", count)))
        })
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn batch_writing(entries: &[(&str, &str)]) -> WriteBatch {
        let mut batch = WriteBatch::new();
        for (key, value) in entries {
            batch
                .writes
                .insert(key.to_string(), Bytes::copy_from_slice(value.as_bytes()));
        }
        batch
    }

    #[test]
    fn test_commit_and_get() {
        let store = SqliteStore::open_memory().unwrap();

        let result = store
            .commit(&batch_writing(&[("a", "1"), ("b", "2")]))
            .unwrap();
        assert_eq!(result, CommitResult::Committed { height: 1 });

        let a = store.get("a").unwrap().unwrap();
        assert_eq!(a.value, Bytes::from_static(b"1"));
        assert_eq!(a.version, 1);
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.height().unwrap(), 1);
    }

    #[test]
    fn test_keys_with_nul_bytes() {
        let store = SqliteStore::open_memory().unwrap();
        let k1 = "\u{0}1:t\u{0}1:a\u{0}";
        let k2 = "\u{0}1:t\u{0}1:b\u{0}";

        store.commit(&batch_writing(&[(k1, "A"), (k2, "B")])).unwrap();

        assert_eq!(store.get(k1).unwrap().unwrap().value, Bytes::from_static(b"A"));
        assert_eq!(store.get(k2).unwrap().unwrap().value, Bytes::from_static(b"B"));
    }

    #[test]
    fn test_conflict_rolls_back() {
        let store = SqliteStore::open_memory().unwrap();
        store.commit(&batch_writing(&[("a", "1")])).unwrap();

        let mut stale = batch_writing(&[("a", "stale"), ("b", "never")]);
        stale.reads.insert("a".to_string(), Some(1));
        store.commit(&batch_writing(&[("a", "2")])).unwrap();

        let result = store.commit(&stale).unwrap();
        assert_eq!(result, CommitResult::Conflict { key: "a".to_string() });
        assert_eq!(store.get("a").unwrap().unwrap().value, Bytes::from_static(b"2"));
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.height().unwrap(), 2);
    }

    #[test]
    fn test_overwrite_bumps_version() {
        let store = SqliteStore::open_memory().unwrap();
        store.commit(&batch_writing(&[("a", "1")])).unwrap();
        store.commit(&batch_writing(&[("b", "x")])).unwrap();
        store.commit(&batch_writing(&[("a", "3")])).unwrap();

        let a = store.get("a").unwrap().unwrap();
        assert_eq!(a.version, 3);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_reopen_keeps_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.commit(&batch_writing(&[("a", "1")])).unwrap();
            store.commit(&batch_writing(&[("b", "2")])).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.height().unwrap(), 2);
        assert_eq!(store.get("a").unwrap().unwrap().version, 1);
        assert_eq!(store.get("b").unwrap().unwrap().value, Bytes::from_static(b"2"));
    }

    proptest! {
        #[test]
        fn behaves_like_memory_store(
            batches in prop::collection::vec(
                prop::collection::btree_map("[a-c]", "[x-z]{1,3}", 0..3),
                1..8,
            )
        ) {
            let sqlite = SqliteStore::open_memory().unwrap();
            let memory = MemoryStore::new();

            for writes in &batches {
                let mut batch = WriteBatch::new();
                for (key, value) in writes {
                    batch.writes.insert(key.clone(), Bytes::copy_from_slice(value.as_bytes()));
                }
                prop_assert_eq!(sqlite.commit(&batch).unwrap(), memory.commit(&batch).unwrap());
            }

            for key in ["a", "b", "c"] {
                prop_assert_eq!(sqlite.get(key).unwrap(), memory.get(key).unwrap());
            }
            prop_assert_eq!(sqlite.count().unwrap(), memory.count().unwrap());
            prop_assert_eq!(sqlite.height().unwrap(), memory.height().unwrap());
        }
    }
}
