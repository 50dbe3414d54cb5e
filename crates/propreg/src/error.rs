//! Error types for the registry workflows.

use propreg_core::{CompositeKey, CoreError, PropertyId, PropertyStatus, UserId};
use propreg_store::StoreError;
use thiserror::Error;

/// Coarse classification of a [`RegistryError`].
///
/// Callers branch on the kind; the message is for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced entity is absent.
    NotFound,
    /// A duplicate creation was attempted.
    AlreadyExists,
    /// The operation is not allowed from the current status.
    InvalidState,
    /// The caller is not the owner, or not yet approved.
    Unauthorized,
    InsufficientFunds,
    /// Unknown payment reference.
    InvalidReference,
    /// Malformed caller input (zero price, bad target status, bad config).
    InvalidArgument,
    /// Stored bytes could not be decoded as the expected record.
    DecodeError,
    /// The ledger itself failed or could not commit.
    LedgerUnavailable,
}

/// Errors returned by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("user {0} already exists")]
    AccountExists(UserId),

    #[error("user {0} does not exist")]
    AccountNotFound(UserId),

    #[error("user {0} has already requested registration")]
    AlreadyRequested(UserId),

    #[error("no registration request found for user {0}")]
    RequestNotFound(UserId),

    #[error("user {0} is already approved")]
    UserAlreadyApproved(UserId),

    #[error("user {0} is not an approved user")]
    OwnerNotApproved(UserId),

    #[error("registration for property {0} has already been filed")]
    AlreadyFiled(PropertyId),

    #[error("property {0} does not exist")]
    PropertyNotFound(PropertyId),

    #[error("property {0} is already approved")]
    AlreadyApproved(PropertyId),

    #[error("user {user} is not the owner of property {property}")]
    NotOwner { property: PropertyId, user: UserId },

    #[error("property {0} is still awaiting registrar approval")]
    NotApprovedYet(PropertyId),

    #[error("property {0} is not for sale")]
    NotForSale(PropertyId),

    #[error("insufficient funds: price {price}, balance {balance}")]
    InsufficientFunds { price: u64, balance: u64 },

    #[error("seller {owner} of property {property} cannot be resolved")]
    SellerNotFound {
        property: PropertyId,
        owner: CompositeKey,
    },

    #[error("user {user} already owns property {property}")]
    BuyerIsOwner { property: PropertyId, user: UserId },

    #[error("user {0} is not registered")]
    Unregistered(UserId),

    #[error("invalid payment reference: {0:?}")]
    InvalidReference(String),

    #[error("price must be a positive integer")]
    InvalidPrice,

    #[error("property status cannot be set to {0}")]
    InvalidStatus(PropertyStatus),

    #[error("unknown property status {0:?}")]
    UnknownStatus(String),

    #[error("balance of user {0} would overflow")]
    BalanceOverflow(UserId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("decode error: {0}")]
    Decode(#[from] CoreError),

    #[error("ledger unavailable: {0}")]
    Ledger(#[from] StoreError),

    #[error("transaction conflicted on key {key:?} after {attempts} attempts")]
    CommitConflict { attempts: u32, key: String },
}

impl RegistryError {
    /// The taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        use RegistryError::*;
        match self {
            AccountNotFound(_) | RequestNotFound(_) | PropertyNotFound(_) | SellerNotFound { .. } => {
                ErrorKind::NotFound
            }
            AccountExists(_) | AlreadyRequested(_) | AlreadyFiled(_) => ErrorKind::AlreadyExists,
            UserAlreadyApproved(_)
            | AlreadyApproved(_)
            | NotApprovedYet(_)
            | NotForSale(_)
            | BuyerIsOwner { .. }
            | BalanceOverflow(_) => ErrorKind::InvalidState,
            OwnerNotApproved(_) | NotOwner { .. } | Unregistered(_) => ErrorKind::Unauthorized,
            InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            InvalidReference(_) => ErrorKind::InvalidReference,
            InvalidPrice | InvalidStatus(_) | UnknownStatus(_) | InvalidConfig(_) => {
                ErrorKind::InvalidArgument
            }
            Decode(_) => ErrorKind::DecodeError,
            Ledger(_) | CommitConflict { .. } => ErrorKind::LedgerUnavailable,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
