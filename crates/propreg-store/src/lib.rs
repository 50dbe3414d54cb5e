//! # propreg store
//!
//! World-state storage for the property-registration ledger. Provides a
//! trait-based interface with SQLite and in-memory implementations, and the
//! per-invocation [`Transaction`] that workflows read and write through.
//!
//! ## Overview
//!
//! A [`Store`] holds one versioned value per key. Workflows never touch the
//! store directly: they run against a [`LedgerAccessor`] (implemented by
//! [`Transaction`]) that records the version of every key it reads and
//! stages every write. The staged [`WriteBatch`] is committed in one step.
//!
//! ## Key Types
//!
//! - [`Store`] - The trait for all storage backends
//! - [`SqliteStore`] - SQLite-based persistent world state
//! - [`MemoryStore`] - In-memory world state for tests
//! - [`LedgerAccessor`] - get/put/timestamp boundary seen by workflows
//! - [`Transaction`] - Read-set tracking, write staging
//! - [`CommitResult`] - Outcome of committing a batch
//!
//! ## Usage
//!
//! ```rust,no_run
//! use propreg_core::PropertyId;
//! use propreg_store::{LedgerAccessor, MemoryStore, Store, Transaction};
//!
//! let store = MemoryStore::new();
//! let mut tx = Transaction::new(&store, 1, 1_700_000_000_000);
//! let key = PropertyId::new("P1").key();
//! let current = tx.get_state(&key).unwrap();
//! assert!(current.is_empty());
//! tx.put_state(&key, b"{}".to_vec().into()).unwrap();
//! let result = store.commit(&tx.into_batch()).unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Absent is empty**: `get_state` returns zero-length bytes for a missing key
//! - **All-or-nothing commits**: a batch is applied entirely or not at all
//! - **Optimistic concurrency**: a batch whose read versions are stale returns
//!   `Conflict` and writes nothing; the caller re-runs the invocation

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;
pub mod transaction;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{CommitResult, Store, Versioned, WriteBatch};
pub use transaction::{LedgerAccessor, Transaction};
