//! The per-invocation transaction context.
//!
//! Workflows see the ledger only through [`LedgerAccessor`]. The concrete
//! [`Transaction`] reads through to a [`Store`], remembers the version of
//! every key it reads, and keeps writes in a private write set until the
//! caller turns it into a [`WriteBatch`] and commits it.

use std::collections::BTreeMap;

use bytes::Bytes;
use propreg_core::CompositeKey;

use crate::error::Result;
use crate::traits::{Store, WriteBatch};

/// The get/put boundary an invocation runs against.
pub trait LedgerAccessor {
    /// Current bytes stored at `key`, or empty bytes when the key is absent.
    fn get_state(&mut self, key: &CompositeKey) -> Result<Bytes>;

    /// Stage `value` at `key`. Nothing is visible outside the transaction
    /// until it commits.
    fn put_state(&mut self, key: &CompositeKey, value: Bytes) -> Result<()>;

    /// Timestamp of the transaction (Unix ms). Stable across retries.
    fn tx_timestamp(&self) -> i64;

    /// Derive a composite key from a tag and ordered fields.
    fn create_composite_key(&self, tag: &str, fields: &[&str]) -> CompositeKey {
        CompositeKey::derive(tag, fields)
    }
}

/// A transaction over a [`Store`].
///
/// Reads observe the transaction's own staged writes first.
pub struct Transaction<'s, S: Store + ?Sized> {
    store: &'s S,
    tx_id: u64,
    timestamp: i64,
    reads: BTreeMap<String, Option<u64>>,
    writes: BTreeMap<String, Bytes>,
}

impl<'s, S: Store + ?Sized> Transaction<'s, S> {
    /// Start a transaction with a fixed id and timestamp.
    pub fn new(store: &'s S, tx_id: u64, timestamp: i64) -> Self {
        Self {
            store,
            tx_id,
            timestamp,
            reads: BTreeMap::new(),
            writes: BTreeMap::new(),
        }
    }

    pub fn tx_id(&self) -> u64 {
        self.tx_id
    }

    /// Number of writes staged so far.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Finish the transaction, yielding its read set and write set.
    pub fn into_batch(self) -> WriteBatch {
        WriteBatch {
            reads: self.reads,
            writes: self.writes,
        }
    }
}

impl<'s, S: Store + ?Sized> LedgerAccessor for Transaction<'s, S> {
    fn get_state(&mut self, key: &CompositeKey) -> Result<Bytes> {
        if let Some(staged) = self.writes.get(key.as_str()) {
            return Ok(staged.clone());
        }

        let stored = self.store.get(key.as_str())?;
        // The first observed version is the one the commit validates against
        self.reads
            .entry(key.as_str().to_string())
            .or_insert_with(|| stored.as_ref().map(|v| v.version));

        Ok(stored.map(|v| v.value).unwrap_or_default())
    }

    fn put_state(&mut self, key: &CompositeKey, value: Bytes) -> Result<()> {
        self.writes.insert(key.as_str().to_string(), value);
        Ok(())
    }

    fn tx_timestamp(&self) -> i64 {
        self.timestamp
    }
}
