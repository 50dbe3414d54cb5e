//! # propreg core
//!
//! Pure primitives for the property-registration ledger: composite keys,
//! record types, and the JSON codec used to store them.
//!
//! This crate contains no I/O, no storage, no transactions. It is pure
//! computation over the records that live on the ledger.
//!
//! ## Key Types
//!
//! - [`CompositeKey`] - Deterministic, injective ledger key for a record
//! - [`UserId`] / [`PropertyId`] - Caller-facing identities that derive keys
//! - [`UserAccount`], [`RegistrationRequest`], [`PropertyRecord`] - Stored records
//! - [`RecordKind`] - Closed set of `docType` discriminants
//!
//! ## Encoding
//!
//! Records are UTF-8 JSON objects tagged with a `docType` field. See the
//! [`codec`] module.

pub mod codec;
pub mod error;
pub mod key;
pub mod record;
pub mod types;

pub use codec::{decode, decode_any, encode, LedgerRecord, Record, RecordKind};
pub use error::{CoreError, Result};
pub use key::{CompositeKey, KeyKind};
pub use record::{
    PropertyRecord, PropertyStatus, RegistrationRequest, RegistrationStatus, UserAccount,
};
pub use types::{PropertyId, UserId};
