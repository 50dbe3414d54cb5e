//! Composite keys: deterministic ledger keys derived from a type tag and
//! an ordered tuple of field values.
//!
//! Layout: a leading NUL, then every component (tag first, then each
//! field) written as `<byte length>:<value>` and terminated by NUL.
//!
//! ```text
//! \0 16:propertyreg.user \0 5:Alice \0 3:111 \0
//! ```
//!
//! The length prefix makes the encoding injective for arbitrary strings,
//! including values that contain `:` or NUL themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

const SEPARATOR: char = '\u{0}';

/// Namespace of a record on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// User accounts, keyed by (name, ssn).
    User,
    /// Registration requests, keyed by (name, ssn).
    Request,
    /// Property records, keyed by property id.
    Property,
}

impl KeyKind {
    /// The tag written into every key of this kind.
    pub const fn tag(self) -> &'static str {
        match self {
            KeyKind::User => "propertyreg.user",
            KeyKind::Request => "propertyreg.user.request",
            KeyKind::Property => "propertyreg.user.property",
        }
    }

    /// Look up a kind by its tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "propertyreg.user" => Some(KeyKind::User),
            "propertyreg.user.request" => Some(KeyKind::Request),
            "propertyreg.user.property" => Some(KeyKind::Property),
            _ => None,
        }
    }
}

/// A ledger key built from a tag and an ordered field tuple.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeKey(String);

impl CompositeKey {
    /// Derive a key from an arbitrary tag and fields.
    pub fn derive<S: AsRef<str>>(tag: &str, fields: &[S]) -> Self {
        let mut key = String::new();
        key.push(SEPARATOR);
        push_component(&mut key, tag);
        for field in fields {
            push_component(&mut key, field.as_ref());
        }
        Self(key)
    }

    /// Derive a key in one of the known namespaces.
    pub fn for_kind<S: AsRef<str>>(kind: KeyKind, fields: &[S]) -> Self {
        Self::derive(kind.tag(), fields)
    }

    /// Parse a raw key string, rejecting anything `derive` could not produce.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let key = Self(raw.into());
        key.split()?;
        Ok(key)
    }

    /// The raw key string as stored on the ledger.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the key back into its tag and fields.
    pub fn split(&self) -> Result<(String, Vec<String>)> {
        let mut rest = self
            .0
            .strip_prefix(SEPARATOR)
            .ok_or_else(|| malformed(self, "missing leading separator"))?;

        let mut components = Vec::new();
        while !rest.is_empty() {
            let (len_str, tail) = rest
                .split_once(':')
                .ok_or_else(|| malformed(self, "missing length prefix"))?;
            let len: usize = len_str
                .parse()
                .map_err(|_| malformed(self, "invalid length prefix"))?;
            if len.to_string() != len_str {
                return Err(malformed(self, "non-canonical length prefix"));
            }
            let value = tail
                .get(..len)
                .ok_or_else(|| malformed(self, "component shorter than its length"))?;
            rest = tail[len..]
                .strip_prefix(SEPARATOR)
                .ok_or_else(|| malformed(self, "unterminated component"))?;
            components.push(value.to_string());
        }

        let mut components = components.into_iter();
        let tag = components
            .next()
            .ok_or_else(|| malformed(self, "missing tag"))?;
        Ok((tag, components.collect()))
    }

    /// The namespace this key belongs to, if it is one of ours.
    pub fn kind(&self) -> Option<KeyKind> {
        self.split()
            .ok()
            .and_then(|(tag, _)| KeyKind::from_tag(&tag))
    }
}

fn push_component(key: &mut String, value: &str) {
    key.push_str(&value.len().to_string());
    key.push(':');
    key.push_str(value);
    key.push(SEPARATOR);
}

fn malformed(key: &CompositeKey, reason: &str) -> CoreError {
    CoreError::MalformedKey(format!("{}: {}", key, reason))
}

impl fmt::Debug for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeKey({})", self)
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_debug())
    }
}

impl AsRef<str> for CompositeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
