//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::traits::{CommitResult, Store, Versioned, WriteBatch};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// World state indexed by key.
    state: HashMap<String, Versioned>,

    /// Height of the last writing commit.
    height: u64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                state: HashMap::new(),
                height: 0,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Poisoned(e.to_string())
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Versioned>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.state.get(key).cloned())
    }

    fn commit(&self, batch: &WriteBatch) -> Result<CommitResult> {
        let mut inner = self.inner.write().map_err(poisoned)?;

        // Validate the read set against current versions
        for (key, seen) in &batch.reads {
            let current = inner.state.get(key).map(|v| v.version);
            if current != *seen {
                debug!(key = %key.escape_debug(), ?seen, ?current, "read conflict");
                return Ok(CommitResult::Conflict { key: key.clone() });
            }
        }

        if batch.is_read_only() {
            return Ok(CommitResult::Committed {
                height: inner.height,
            });
        }

        let height = inner.height + 1;
        for (key, value) in &batch.writes {
            inner.state.insert(
                key.clone(),
                Versioned {
                    value: value.clone(),
                    version: height,
                },
            );
        }
        inner.height = height;

        debug!(height, writes = batch.writes.len(), "committed batch");
        Ok(CommitResult::Committed { height })
    }

    fn height(&self) -> Result<u64> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.height)
    }

    fn count(&self) -> Result<usize> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.state.len())
    }
}
