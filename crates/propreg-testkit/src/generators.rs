//! Proptest generators for property-based testing.

use proptest::prelude::*;

use propreg_core::{PropertyId, PropertyStatus, UserAccount, UserId};

/// A key field. Biased towards the characters the key layout itself uses,
/// so separators and length digits show up inside values.
pub fn field() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            3 => prop::char::range('a', 'e'),
            2 => Just(':'),
            2 => Just('\u{0}'),
            2 => prop::char::range('0', '9'),
            1 => any::<char>(),
        ],
        0..8,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// A type tag plus an ordered field tuple.
pub fn key_tuple() -> impl Strategy<Value = (String, Vec<String>)> {
    (field(), prop::collection::vec(field(), 0..4))
}

pub fn user_id() -> impl Strategy<Value = UserId> {
    ("[A-Z][a-z]{0,7}", "[0-9]{3,9}").prop_map(|(name, ssn)| UserId::new(name, ssn))
}

pub fn property_id() -> impl Strategy<Value = PropertyId> {
    "P[0-9]{1,4}".prop_map(|id| PropertyId::new(id))
}

/// A valid (positive) property price.
pub fn price() -> impl Strategy<Value = u64> {
    1u64..=1_000_000
}

/// Generate a reasonable timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=i64::MAX / 2
}

pub fn property_status() -> impl Strategy<Value = PropertyStatus> {
    prop_oneof![
        Just(PropertyStatus::PendingApproval),
        Just(PropertyStatus::Registered),
        Just(PropertyStatus::OnSale),
    ]
}

/// An account, approved or not.
pub fn user_account() -> impl Strategy<Value = UserAccount> {
    (
        user_id(),
        "[a-z]{1,8}@[a-z]{1,8}\\.io",
        "[0-9]{7,10}",
        prop::option::of(0u64..=1_000_000),
        timestamp(),
    )
        .prop_map(|(id, email, phone, balance, ts)| {
            let mut account = UserAccount::new(&id, email, phone, ts);
            account.balance = balance;
            account
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use propreg_core::{codec, CompositeKey};

    proptest! {
        #[test]
        fn derive_is_deterministic((tag, fields) in key_tuple()) {
            let a = CompositeKey::derive(&tag, &fields);
            let b = CompositeKey::derive(&tag, &fields);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn derive_is_injective(a in key_tuple(), b in key_tuple()) {
            let ka = CompositeKey::derive(&a.0, &a.1);
            let kb = CompositeKey::derive(&b.0, &b.1);
            prop_assert_eq!(ka == kb, a == b);
        }

        #[test]
        fn distinct_users_have_distinct_keys(a in user_id(), b in user_id()) {
            prop_assert_eq!(a.account_key() == b.account_key(), a == b);
            prop_assert_ne!(a.account_key(), a.request_key());
        }

        #[test]
        fn accounts_survive_the_codec(account in user_account()) {
            let decoded: UserAccount = codec::decode(&codec::encode(&account)).unwrap();
            prop_assert_eq!(decoded, account);
        }
    }
}
