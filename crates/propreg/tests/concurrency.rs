//! Commit conflicts and re-execution.

use bytes::Bytes;
use propreg::core::codec;
use propreg::{ErrorKind, NetworkConfig, RegistryError, UserAccount};
use propreg_store::{MemoryStore, Store};
use propreg_testkit::{ContendedStore, TestFixture};

fn contended() -> TestFixture<ContendedStore> {
    TestFixture::with_store(ContendedStore::new(MemoryStore::new()))
}

#[test]
fn test_recharge_reruns_against_new_balance() {
    let fixture = contended();
    let alice = fixture.approved_user("Alice", "111");

    // Someone else credits Alice 50 between her read and her commit
    let mut rival = fixture
        .network
        .user()
        .view_user(&alice.name, &alice.ssn)
        .unwrap();
    rival.balance = Some(50);
    fixture
        .store()
        .interfere(&alice.account_key(), codec::encode(&rival));

    let account = fixture
        .network
        .user()
        .recharge(&alice.name, &alice.ssn, "upg100")
        .unwrap();
    assert_eq!(account.balance, Some(150));
}

#[test]
fn test_purchase_retry_sees_delisting() {
    let fixture = contended();
    let alice = fixture.funded_user("Alice", "111", &[]);
    let bob = fixture.funded_user("Bob", "222", &["upg1000"]);
    let p1 = fixture.listed_property("P1", &alice, 300);

    // Alice delists P1 while Bob's purchase is in flight
    let mut delisted = fixture.network.registrar().view_property("P1").unwrap();
    delisted.status = propreg::PropertyStatus::Registered;
    fixture.store().interfere(&p1.key(), codec::encode(&delisted));

    let err = fixture
        .network
        .user()
        .purchase("P1", &bob.name, &bob.ssn)
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotForSale(_)));

    let bob_account = fixture.network.user().view_user(&bob.name, &bob.ssn).unwrap();
    assert_eq!(bob_account.balance, Some(1000));
}

#[test]
fn test_conflicts_exhaust_attempts() {
    let config = NetworkConfig {
        max_commit_attempts: 2,
        ..NetworkConfig::default()
    };
    let fixture = TestFixture::with_config(ContendedStore::new(MemoryStore::new()), config);
    let alice = fixture.approved_user("Alice", "111");
    let account_key = alice.account_key();

    let current = fixture
        .network
        .user()
        .view_user(&alice.name, &alice.ssn)
        .unwrap();
    for _ in 0..2 {
        fixture
            .store()
            .interfere(&account_key, codec::encode(&current));
    }

    let err = fixture
        .network
        .user()
        .recharge(&alice.name, &alice.ssn, "upg500")
        .unwrap_err();
    match &err {
        RegistryError::CommitConflict { attempts, key } => {
            assert_eq!(*attempts, 2);
            assert_eq!(key, account_key.as_str());
        }
        other => panic!("expected a commit conflict, got {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::LedgerUnavailable);

    let stored = fixture
        .store()
        .get(account_key.as_str())
        .unwrap()
        .unwrap();
    let stored: UserAccount = codec::decode(&stored.value).unwrap();
    assert_eq!(stored.balance, Some(0));
}

#[test]
fn test_unrelated_write_does_not_conflict() {
    let fixture = contended();
    let alice = fixture.approved_user("Alice", "111");
    let height = fixture.store_height();

    fixture.store().interfere(
        &propreg::PropertyId::new("elsewhere").key(),
        Bytes::from_static(b"{}"),
    );
    fixture
        .network
        .user()
        .recharge(&alice.name, &alice.ssn, "upg100")
        .unwrap();

    // One rival commit plus ours
    assert_eq!(fixture.store_height(), height + 2);
}
