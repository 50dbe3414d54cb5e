//! Strong identity types.
//!
//! Callers address users by (name, ssn) and properties by id. Each newtype
//! knows the key kind of its records, so a user key can never be built from
//! a property id by mistake.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::key::{CompositeKey, KeyKind};

/// Identity of a user: the (name, social-security-number) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId {
    pub name: String,
    pub ssn: String,
}

impl UserId {
    pub fn new(name: impl Into<String>, ssn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ssn: ssn.into(),
        }
    }

    /// Key of the user's account record.
    ///
    /// This is also the canonical owner reference stored on properties.
    pub fn account_key(&self) -> CompositeKey {
        CompositeKey::for_kind(KeyKind::User, &[&self.name, &self.ssn])
    }

    /// Key of the user's registration request.
    pub fn request_key(&self) -> CompositeKey {
        CompositeKey::for_kind(KeyKind::Request, &[&self.name, &self.ssn])
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ssn {})", self.name, self.ssn)
    }
}

/// Caller-supplied identifier of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub String);

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the property record.
    pub fn key(&self) -> CompositeKey {
        CompositeKey::for_kind(KeyKind::Property, &[&self.0])
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
