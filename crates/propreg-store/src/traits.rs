//! Store trait: the abstract interface for world-state persistence.
//!
//! This trait allows the workflows to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::error::Result;

/// A stored value and the ledger height at which it was last written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    pub value: Bytes,
    pub version: u64,
}

/// Everything one transaction observed and proposed.
///
/// `reads` maps each key read to the version seen (`None` when the key was
/// absent). `writes` holds the staged value for each key written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    pub reads: BTreeMap<String, Option<u64>>,
    pub writes: BTreeMap<String, Bytes>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the batch proposes no writes.
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Result of committing a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitResult {
    /// All writes were applied at this ledger height.
    Committed { height: u64 },
    /// A key read by the transaction changed since it was read. Nothing was
    /// written.
    Conflict { key: String },
}

/// The Store trait: synchronous interface for versioned world state.
///
/// # Design Notes
///
/// - **Absence**: `get` returns `None` for keys never written.
/// - **Atomic commit**: `commit` validates every read version, then applies
///   every write, under one lock or one database transaction.
/// - **Versions**: each commit that writes bumps the height by one; every
///   key it writes takes that height as its version.
pub trait Store: Send + Sync {
    /// Get the current value and version of a key.
    fn get(&self, key: &str) -> Result<Option<Versioned>>;

    /// Validate the batch's read set and apply its writes atomically.
    fn commit(&self, batch: &WriteBatch) -> Result<CommitResult>;

    /// Height of the last commit that wrote anything (0 for an empty ledger).
    fn height(&self) -> Result<u64>;

    /// Number of keys in the world state.
    fn count(&self) -> Result<usize>;
}
