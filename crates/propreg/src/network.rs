//! The Network: runs workflow invocations as ledger transactions.
//!
//! A submitted invocation executes against a fresh [`Transaction`] and its
//! write set is committed atomically. If the commit reports a conflict the
//! invocation is executed again from scratch against the new state, with the
//! same transaction id and timestamp, up to `max_commit_attempts` times.
//! An invocation that returns an error is never committed.

use std::sync::atomic::{AtomicU64, Ordering};

use propreg_store::{CommitResult, Store, Transaction};
use tracing::{debug, info, warn};

use crate::config::NetworkConfig;
use crate::contract::{RegistrarContract, UserContract};
use crate::error::{RegistryError, Result};
use crate::topup::TopUpTable;

/// A ledger plus the configuration the workflows run under.
pub struct Network<S: Store> {
    store: S,
    config: NetworkConfig,
    top_up: TopUpTable,
    next_tx: AtomicU64,
    clock: fn() -> i64,
}

impl<S: Store> Network<S> {
    /// Create a network over `store`. Fails if `config` is invalid.
    pub fn new(store: S, config: NetworkConfig) -> Result<Self> {
        config.validate()?;
        let top_up = TopUpTable::new(config.top_up.clone());
        Ok(Self {
            store,
            config,
            top_up,
            next_tx: AtomicU64::new(0),
            clock: now_millis,
        })
    }

    /// Replace the wall clock used to stamp transactions.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn top_up(&self) -> &TopUpTable {
        &self.top_up
    }

    /// Announce the deployment and report the current ledger height.
    pub fn instantiate(&self) -> Result<u64> {
        let height = self.store.height()?;
        let records = self.store.count()?;
        info!(
            height,
            records,
            top_up_references = self.top_up.len(),
            "property registration network instantiated"
        );
        Ok(height)
    }

    /// User-facing operations.
    pub fn user(&self) -> UserContract<'_, S> {
        UserContract::new(self)
    }

    /// Registrar-only operations.
    pub fn registrar(&self) -> RegistrarContract<'_, S> {
        RegistrarContract::new(self)
    }

    /// Execute `op` and commit its writes, retrying on commit conflicts.
    pub fn submit<T, F>(&self, name: &str, mut op: F) -> Result<T>
    where
        F: FnMut(&mut Transaction<'_, S>) -> Result<T>,
    {
        let tx_id = self.next_tx_id();
        let timestamp = (self.clock)();
        let attempts = self.config.max_commit_attempts;
        let mut conflict_key = String::new();

        for attempt in 1..=attempts {
            let mut tx = Transaction::new(&self.store, tx_id, timestamp);
            let value = op(&mut tx)?;
            let batch = tx.into_batch();
            let writes = batch.writes.len();

            match self.store.commit(&batch)? {
                CommitResult::Committed { height } => {
                    info!(tx_id, op = name, height, writes, attempt, "transaction committed");
                    return Ok(value);
                }
                CommitResult::Conflict { key } => {
                    warn!(tx_id, op = name, attempt, key = %key, "commit conflict");
                    conflict_key = key;
                }
            }
        }

        Err(RegistryError::CommitConflict {
            attempts,
            key: conflict_key,
        })
    }

    /// Execute `op` against current state without committing.
    pub fn evaluate<T, F>(&self, name: &str, op: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction<'_, S>) -> Result<T>,
    {
        let tx_id = self.next_tx_id();
        let mut tx = Transaction::new(&self.store, tx_id, (self.clock)());
        let value = op(&mut tx)?;
        debug!(tx_id, op = name, "query evaluated");
        Ok(value)
    }

    fn next_tx_id(&self) -> u64 {
        self.next_tx.fetch_add(1, Ordering::Relaxed) + 1
    }
}

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
    use crate::error::ErrorKind;
    use crate::registry;
    use propreg_core::{UserAccount, UserId};
    use propreg_store::{LedgerAccessor, MemoryStore};

    fn fixed_clock() -> i64 {
        1_700_000_000_000
    }

    fn network() -> Network<MemoryStore> {
        Network::new(MemoryStore::new(), NetworkConfig::default())
            .unwrap()
            .with_clock(fixed_clock)
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = NetworkConfig {
            max_commit_attempts: 0,
            ..NetworkConfig::default()
        };
        let err = Network::new(MemoryStore::new(), config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_instantiate_reports_height() {
        let network = network();
        assert_eq!(network.instantiate().unwrap(), 0);
    }

    #[test]
    fn test_submit_commits_writes() {
        let network = network();
        let alice = UserId::new("Alice", "111");

        network
            .submit("seed", |tx| {
                let account = UserAccount::new(&alice, "a@x.io", "555", tx.tx_timestamp());
                registry::save(tx, &alice.account_key(), &account)
            })
            .unwrap();

        assert_eq!(network.store().height().unwrap(), 1);
        let account = network
            .evaluate("read", |tx| registry::load_account(tx, &alice))
            .unwrap()
            .unwrap();
        assert_eq!(account.created_at, fixed_clock());
    }

    #[test]
    fn test_failed_invocation_writes_nothing() {
        let network = network();
        let alice = UserId::new("Alice", "111");

        let err = network
            .submit("fail", |tx| -> Result<()> {
                let account = UserAccount::new(&alice, "a@x.io", "555", 0);
                registry::save(tx, &alice.account_key(), &account)?;
                Err(RegistryError::InvalidPrice)
            })
            .unwrap_err();

        assert!(matches!(err, RegistryError::InvalidPrice));
        assert_eq!(network.store().height().unwrap(), 0);
        assert_eq!(network.store().count().unwrap(), 0);
    }

    #[test]
    fn test_evaluate_never_commits() {
        let network = network();
        let alice = UserId::new("Alice", "111");

        network
            .evaluate("write", |tx| {
                let account = UserAccount::new(&alice, "a@x.io", "555", 0);
                registry::save(tx, &alice.account_key(), &account)
            })
            .unwrap();

        assert_eq!(network.store().count().unwrap(), 0);
    }

    #[test]
    fn test_transaction_ids_increase() {
        let network = network();
        let first = network.evaluate("a", |tx| Ok(tx.tx_id())).unwrap();
        let second = network.evaluate("b", |tx| Ok(tx.tx_id())).unwrap();
        assert!(second > first);
    }
}
