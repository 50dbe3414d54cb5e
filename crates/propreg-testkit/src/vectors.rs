//! Golden test vectors for the on-ledger format.
//!
//! Keys and record encodings are read by anything else that looks at the
//! ledger, so they must not drift.

use propreg_core::{
    codec, CompositeKey, KeyKind, PropertyId, PropertyRecord, PropertyStatus, UserAccount, UserId,
};

/// A golden composite key.
#[derive(Debug, Clone)]
pub struct GoldenKey {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub tag: &'static str,
    pub fields: &'static [&'static str],
    /// Expected raw key string.
    pub expected: &'static str,
}

/// A golden record encoding.
#[derive(Debug, Clone)]
pub struct GoldenRecord {
    pub name: &'static str,
    /// Expected JSON, byte for byte.
    pub expected: &'static str,
    pub build: fn() -> Vec<u8>,
}

/// Get all golden key vectors.
pub fn all_keys() -> Vec<GoldenKey> {
    vec![
        GoldenKey {
            name: "user account",
            tag: KeyKind::User.tag(),
            fields: &["Alice", "111"],
            expected: "\u{0}16:propertyreg.user\u{0}5:Alice\u{0}3:111\u{0}",
        },
        GoldenKey {
            name: "registration request",
            tag: KeyKind::Request.tag(),
            fields: &["Alice", "111"],
            expected: "\u{0}24:propertyreg.user.request\u{0}5:Alice\u{0}3:111\u{0}",
        },
        GoldenKey {
            name: "property",
            tag: KeyKind::Property.tag(),
            fields: &["P1"],
            expected: "\u{0}25:propertyreg.user.property\u{0}2:P1\u{0}",
        },
        GoldenKey {
            name: "field containing separators",
            tag: "t",
            fields: &["a:b", "c\u{0}d"],
            expected: "\u{0}1:t\u{0}3:a:b\u{0}3:c\u{0}d\u{0}",
        },
        GoldenKey {
            name: "empty field",
            tag: "t",
            fields: &[""],
            expected: "\u{0}1:t\u{0}0:\u{0}",
        },
        GoldenKey {
            name: "multibyte field",
            tag: "t",
            fields: &["é"],
            expected: "\u{0}1:t\u{0}2:é\u{0}",
        },
    ]
}

fn pending_account() -> Vec<u8> {
    let alice = UserId::new("Alice", "111");
    codec::encode(&UserAccount::new(&alice, "alice@example.com", "5550100", 1000)).to_vec()
}

fn approved_account() -> Vec<u8> {
    let bob = UserId::new("Bob", "222");
    let mut account = UserAccount::new(&bob, "bob@example.com", "5550101", 1000);
    account.balance = Some(700);
    account.updated_at = 2000;
    codec::encode(&account).to_vec()
}

fn pending_property() -> Vec<u8> {
    let alice = UserId::new("Alice", "111");
    codec::encode(&PropertyRecord::new(PropertyId::new("P1"), &alice, 300, 1000)).to_vec()
}

fn listed_property() -> Vec<u8> {
    let bob = UserId::new("Bob", "222");
    let mut property = PropertyRecord::new(PropertyId::new("P2"), &bob, 50, 1000);
    property.status = PropertyStatus::OnSale;
    codec::encode(&property).to_vec()
}

/// Get all golden record vectors.
pub fn all_records() -> Vec<GoldenRecord> {
    vec![
        GoldenRecord {
            name: "unapproved account has no balance field",
            expected: r#"{"docType":"user","name":"Alice","emailID":"alice@example.com","phoneNumber":"5550100","socialSecurityNumber":"111","createdAt":1000,"updatedAt":1000}"#,
            build: pending_account,
        },
        GoldenRecord {
            name: "approved account",
            expected: r#"{"docType":"user","name":"Bob","emailID":"bob@example.com","phoneNumber":"5550101","socialSecurityNumber":"222","upgradCoins":700,"createdAt":1000,"updatedAt":2000}"#,
            build: approved_account,
        },
        GoldenRecord {
            name: "pending property",
            expected: r#"{"docType":"property","propertyId":"P1","owner":"\u000016:propertyreg.user\u00005:Alice\u00003:111\u0000","price":300,"status":"","createdAt":1000,"updatedAt":1000}"#,
            build: pending_property,
        },
        GoldenRecord {
            name: "listed property",
            expected: r#"{"docType":"property","propertyId":"P2","owner":"\u000016:propertyreg.user\u00003:Bob\u00003:222\u0000","price":50,"status":"onSale","createdAt":1000,"updatedAt":1000}"#,
            build: listed_property,
        },
    ]
}

/// Check every vector, returning the names of those that fail.
pub fn verify_all_vectors() -> Vec<&'static str> {
    let keys = all_keys()
        .into_iter()
        .filter(|v| CompositeKey::derive(v.tag, v.fields).as_str() != v.expected)
        .map(|v| v.name);
    let records = all_records()
        .into_iter()
        .filter(|v| (v.build)() != v.expected.as_bytes())
        .map(|v| v.name);
    keys.chain(records).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_hold() {
        assert_eq!(verify_all_vectors(), Vec::<&str>::new());
    }

    #[test]
    fn test_golden_keys_split_back() {
        for vector in all_keys() {
            let key = CompositeKey::parse(vector.expected).unwrap();
            let (tag, fields) = key.split().unwrap();
            assert_eq!(tag, vector.tag, "{}", vector.name);
            assert_eq!(fields, vector.fields, "{}", vector.name);
        }
    }

    #[test]
    fn test_golden_records_decode() {
        for vector in all_records() {
            let record = codec::decode_any(vector.expected.as_bytes()).unwrap();
            let reencoded = match record {
                codec::Record::User(account) => codec::encode(&account),
                codec::Record::Request(request) => codec::encode(&request),
                codec::Record::Property(property) => codec::encode(&property),
            };
            assert_eq!(&reencoded[..], vector.expected.as_bytes(), "{}", vector.name);
        }
    }
}
