//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use bytes::Bytes;
use propreg::{Network, NetworkConfig, PropertyId, UserId};
use propreg_core::CompositeKey;
use propreg_store::{CommitResult, MemoryStore, Store, StoreError, Versioned, WriteBatch};

/// Fixed timestamp used by fixture networks (2023-11-14T22:13:20Z).
pub const FIXTURE_TIME: i64 = 1_700_000_000_000;

fn fixture_clock() -> i64 {
    FIXTURE_TIME
}

/// A network over a fresh store with a fixed clock.
pub struct TestFixture<S: Store = MemoryStore> {
    pub network: Network<S>,
}

impl TestFixture<MemoryStore> {
    /// In-memory fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl Default for TestFixture<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Store> TestFixture<S> {
    pub fn with_store(store: S) -> Self {
        Self::with_config(store, NetworkConfig::default())
    }

    pub fn with_config(store: S, config: NetworkConfig) -> Self {
        let network = Network::new(store, config)
            .expect("fixture config is valid")
            .with_clock(fixture_clock);
        Self { network }
    }

    pub fn store(&self) -> &S {
        self.network.store()
    }

    pub fn store_height(&self) -> u64 {
        self.store().height().expect("store height")
    }

    pub fn store_count(&self) -> usize {
        self.store().count().expect("store count")
    }

    /// Create, request and approve a user. The balance starts at zero.
    pub fn approved_user(&self, name: &str, ssn: &str) -> UserId {
        let email = format!("{}@example.com", name.to_lowercase());
        let user = self.network.user();
        user.create_account(name, &email, "5550100", ssn)
            .expect("create account");
        user.request_approval(name, &email, "5550100", ssn)
            .expect("request approval");
        self.network
            .registrar()
            .approve_user(name, ssn)
            .expect("approve user");
        UserId::new(name, ssn)
    }

    /// Approved user topped up with each reference in turn.
    pub fn funded_user(&self, name: &str, ssn: &str, references: &[&str]) -> UserId {
        let id = self.approved_user(name, ssn);
        for reference in references {
            self.network
                .user()
                .recharge(name, ssn, reference)
                .expect("recharge");
        }
        id
    }

    /// File and approve a property for `owner`.
    pub fn registered_property(&self, id: &str, owner: &UserId, price: u64) -> PropertyId {
        self.network
            .user()
            .file_registration(id, &owner.name, &owner.ssn, price)
            .expect("file registration");
        self.network
            .registrar()
            .approve_registration(id)
            .expect("approve registration");
        PropertyId::new(id)
    }

    /// Registered property listed for sale.
    pub fn listed_property(&self, id: &str, owner: &UserId, price: u64) -> PropertyId {
        let property = self.registered_property(id, owner, price);
        self.network
            .user()
            .set_sale_status(id, &owner.name, &owner.ssn, "onSale")
            .expect("list property");
        property
    }

    /// Raw bytes stored at each key, in order.
    pub fn snapshot(&self, keys: &[CompositeKey]) -> Vec<Option<Bytes>> {
        keys.iter()
            .map(|key| {
                self.store()
                    .get(key.as_str())
                    .expect("store read")
                    .map(|v| v.value)
            })
            .collect()
    }
}

/// A store that commits a competing write just before the next commit(s)
/// it receives, forcing a genuine read conflict.
pub struct ContendedStore<S: Store = MemoryStore> {
    inner: S,
    pending: Mutex<Vec<(String, Bytes)>>,
}

impl<S: Store> ContendedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Before each of the next commits, overwrite `key` with `value`.
    /// Calling this `n` times interferes with the next `n` commits.
    pub fn interfere(&self, key: &CompositeKey, value: Bytes) {
        self.pending
            .lock()
            .expect("pending lock")
            .push((key.as_str().to_string(), value));
    }
}

impl<S: Store> Store for ContendedStore<S> {
    fn get(&self, key: &str) -> propreg_store::Result<Option<Versioned>> {
        self.inner.get(key)
    }

    fn commit(&self, batch: &WriteBatch) -> propreg_store::Result<CommitResult> {
        let competing = {
            let mut pending = self
                .pending
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            if pending.is_empty() {
                None
            } else {
                Some(pending.remove(0))
            }
        };

        if let Some((key, value)) = competing {
            let mut rival = WriteBatch::new();
            rival.writes.insert(key, value);
            self.inner.commit(&rival)?;
        }

        self.inner.commit(batch)
    }

    fn height(&self) -> propreg_store::Result<u64> {
        self.inner.height()
    }

    fn count(&self) -> propreg_store::Result<usize> {
        self.inner.count()
    }
}

/// A store whose reads or commits can be switched to fail, standing in for
/// an unreachable ledger.
pub struct FailingStore<S: Store = MemoryStore> {
    inner: S,
    reads_fail: AtomicBool,
    commits_fail: AtomicBool,
}

impl<S: Store> FailingStore<S> {
    /// Starts healthy.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads_fail: AtomicBool::new(false),
            commits_fail: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self) {
        self.reads_fail.store(true, Ordering::SeqCst);
    }

    pub fn fail_commits(&self) {
        self.commits_fail.store(true, Ordering::SeqCst);
    }

    fn unavailable() -> StoreError {
        StoreError::InvalidData("ledger unavailable".into())
    }
}

impl<S: Store> Store for FailingStore<S> {
    fn get(&self, key: &str) -> propreg_store::Result<Option<Versioned>> {
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.get(key)
    }

    fn commit(&self, batch: &WriteBatch) -> propreg_store::Result<CommitResult> {
        if self.commits_fail.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.commit(batch)
    }

    fn height(&self) -> propreg_store::Result<u64> {
        self.inner.height()
    }

    fn count(&self) -> propreg_store::Result<usize> {
        self.inner.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propreg::RegistrationStatus;

    #[test]
    fn test_approved_user() {
        let fixture = TestFixture::new();
        let alice = fixture.approved_user("Alice", "111");
        let status = fixture
            .network
            .user()
            .registration_status(&alice.name, &alice.ssn)
            .unwrap();
        assert_eq!(status, RegistrationStatus::Approved);
    }

    #[test]
    fn test_funded_user() {
        let fixture = TestFixture::new();
        let bob = fixture.funded_user("Bob", "222", &["upg500", "upg100"]);
        let account = fixture.network.user().view_user(&bob.name, &bob.ssn).unwrap();
        assert_eq!(account.balance, Some(600));
        assert_eq!(account.updated_at, FIXTURE_TIME);
    }

    #[test]
    fn test_contended_store_forces_conflict() {
        let store = ContendedStore::new(MemoryStore::new());
        let key = PropertyId::new("P1").key();

        let mut batch = WriteBatch::new();
        batch.reads.insert(key.as_str().to_string(), None);
        batch
            .writes
            .insert(key.as_str().to_string(), Bytes::from_static(b"mine"));

        store.interfere(&key, Bytes::from_static(b"theirs"));
        assert!(matches!(
            store.commit(&batch).unwrap(),
            CommitResult::Conflict { .. }
        ));
        assert_eq!(
            store.get(key.as_str()).unwrap().unwrap().value,
            Bytes::from_static(b"theirs")
        );
    }

    #[test]
    fn test_failing_store_switches() {
        let store = FailingStore::new(MemoryStore::new());
        let key = PropertyId::new("P1").key();
        assert!(store.get(key.as_str()).unwrap().is_none());

        store.fail_commits();
        assert!(store.get(key.as_str()).is_ok());
        assert!(store.commit(&WriteBatch::new()).is_err());

        store.fail_reads();
        assert!(store.get(key.as_str()).is_err());
    }
}
