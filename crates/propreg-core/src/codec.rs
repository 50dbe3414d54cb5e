//! JSON codec for ledger records.
//!
//! Every record is a JSON object carrying a `docType` discriminant:
//!
//! | docType    | record                  |
//! |------------|-------------------------|
//! | `user`     | [`UserAccount`]         |
//! | `request`  | [`RegistrationRequest`] |
//! | `property` | [`PropertyRecord`]      |
//!
//! Decoding is strict: a missing or unknown `docType`, or a `docType` other
//! than the one the caller asked for, is a [`CoreError`]. Stored bytes that
//! fail to decode mean the ledger is corrupt or on another schema.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};
use crate::record::{PropertyRecord, RegistrationRequest, UserAccount};

/// Closed set of record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Request,
    Property,
}

impl RecordKind {
    /// The `docType` string for this kind.
    pub const fn doc_type(self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Request => "request",
            RecordKind::Property => "property",
        }
    }

    pub fn from_doc_type(doc_type: &str) -> Option<Self> {
        match doc_type {
            "user" => Some(RecordKind::User),
            "request" => Some(RecordKind::Request),
            "property" => Some(RecordKind::Property),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.doc_type())
    }
}

/// Any decoded ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "docType")]
pub enum Record {
    #[serde(rename = "user")]
    User(UserAccount),
    #[serde(rename = "request")]
    Request(RegistrationRequest),
    #[serde(rename = "property")]
    Property(PropertyRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::User(_) => RecordKind::User,
            Record::Request(_) => RecordKind::Request,
            Record::Property(_) => RecordKind::Property,
        }
    }
}

/// Borrowed view used for encoding without cloning.
#[derive(Serialize)]
#[serde(tag = "docType")]
pub enum RecordRef<'a> {
    #[serde(rename = "user")]
    User(&'a UserAccount),
    #[serde(rename = "request")]
    Request(&'a RegistrationRequest),
    #[serde(rename = "property")]
    Property(&'a PropertyRecord),
}

/// A type that is stored on the ledger under a fixed `docType`.
pub trait LedgerRecord: Sized {
    const KIND: RecordKind;

    fn as_record(&self) -> RecordRef<'_>;

    fn from_record(record: Record) -> Option<Self>;
}

impl LedgerRecord for UserAccount {
    const KIND: RecordKind = RecordKind::User;

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::User(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::User(user) => Some(user),
            _ => None,
        }
    }
}

impl LedgerRecord for RegistrationRequest {
    const KIND: RecordKind = RecordKind::Request;

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::Request(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Request(request) => Some(request),
            _ => None,
        }
    }
}

impl LedgerRecord for PropertyRecord {
    const KIND: RecordKind = RecordKind::Property;

    fn as_record(&self) -> RecordRef<'_> {
        RecordRef::Property(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Property(property) => Some(property),
            _ => None,
        }
    }
}

/// Encode a record to its on-ledger bytes.
pub fn encode<T: LedgerRecord>(record: &T) -> Bytes {
    // Plain structs of strings and integers always serialize.
    let buf = serde_json::to_vec(&record.as_record()).expect("record serialization is infallible");
    Bytes::from(buf)
}

/// Decode bytes as any known record kind.
pub fn decode_any(bytes: &[u8]) -> Result<Record> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let doc_type = value
        .get("docType")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| CoreError::Decode("missing docType".to_string()))?;
    if RecordKind::from_doc_type(doc_type).is_none() {
        return Err(CoreError::UnknownDocType(doc_type.to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

/// Decode bytes as a specific record kind.
pub fn decode<T: LedgerRecord>(bytes: &[u8]) -> Result<T> {
    let record = decode_any(bytes)?;
    let found = record.kind();
    T::from_record(record).ok_or(CoreError::UnexpectedDocType {
        expected: T::KIND,
        found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PropertyStatus;
    use crate::types::{PropertyId, UserId};

    fn alice() -> UserAccount {
        UserAccount::new(&UserId::new("Alice", "111"), "alice@example.com", "555-0100", 1_000)
    }

    #[test]
    fn test_user_wire_format() {
        let bytes = encode(&alice());
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["docType"], "user");
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["emailID"], "alice@example.com");
        assert_eq!(json["phoneNumber"], "555-0100");
        assert_eq!(json["socialSecurityNumber"], "111");
        assert_eq!(json["createdAt"], 1_000);
        assert!(json.get("upgradCoins").is_none());
    }

    #[test]
    fn test_approved_user_carries_balance() {
        let mut user = alice();
        user.balance = Some(0);
        let json: serde_json::Value = serde_json::from_slice(&encode(&user)).unwrap();
        assert_eq!(json["upgradCoins"], 0);

        let decoded: UserAccount = decode(&encode(&user)).unwrap();
        assert!(decoded.is_approved());
    }

    #[test]
    fn test_property_status_strings() {
        let mut property =
            PropertyRecord::new(PropertyId::new("P1"), &UserId::new("Alice", "111"), 300, 0);
        let json: serde_json::Value = serde_json::from_slice(&encode(&property)).unwrap();
        assert_eq!(json["docType"], "property");
        assert_eq!(json["propertyId"], "P1");
        assert_eq!(json["status"], "");

        property.status = PropertyStatus::OnSale;
        let json: serde_json::Value = serde_json::from_slice(&encode(&property)).unwrap();
        assert_eq!(json["status"], "onSale");
    }

    #[test]
    fn test_decode_rejects_wrong_kind() {
        let bytes = encode(&alice());
        let err = decode::<PropertyRecord>(&bytes).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnexpectedDocType {
                expected: RecordKind::Property,
                found: RecordKind::User
            }
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_doc_type() {
        let err = decode_any(br#"{"docType":"property-registration-request"}"#).unwrap_err();
        assert!(matches!(err, CoreError::UnknownDocType(_)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_any(b"not json"), Err(CoreError::Decode(_))));
        assert!(matches!(decode_any(b""), Err(CoreError::Decode(_))));
        assert!(matches!(decode_any(br#"{"name":"x"}"#), Err(CoreError::Decode(_))));
        assert!(matches!(
            decode_any(br#"{"docType":"user","name":"x"}"#),
            Err(CoreError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let raw = br#"{"docType":"property","propertyId":"P1","owner":"x","price":1,"status":"sold","createdAt":0,"updatedAt":0}"#;
        assert!(matches!(decode_any(raw), Err(CoreError::Decode(_))));
    }
}
