//! Error types for propreg core.

use thiserror::Error;

use crate::codec::RecordKind;

/// Errors raised while decoding records or parsing keys.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("decoding error: {0}")]
    Decode(String),

    #[error("unknown docType: {0:?}")]
    UnknownDocType(String),

    #[error("unexpected docType: expected {expected}, found {found}")]
    UnexpectedDocType {
        expected: RecordKind,
        found: RecordKind,
    },

    #[error("malformed composite key: {0}")]
    MalformedKey(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Decode(e.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
