//! # propreg
//!
//! Property registration and ownership transfer over a transactional
//! key-value ledger.
//!
//! ## Overview
//!
//! Three record kinds live on the ledger: user accounts, registration
//! requests, and properties. Users create accounts and ask to be approved;
//! the registrar approves users and property filings; approved users buy
//! coins, list their properties for sale, and buy each other's properties.
//!
//! Every workflow is a plain function over a [`LedgerAccessor`]. It reads
//! the records it needs, checks every precondition, and only then stages
//! its writes. The [`Network`] runs each invocation as one transaction and
//! commits the staged writes atomically, re-running the invocation when the
//! commit conflicts with a concurrent one.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use propreg::{Network, NetworkConfig};
//! use propreg::store::MemoryStore;
//!
//! let network = Network::new(MemoryStore::new(), NetworkConfig::default()).unwrap();
//! let user = network.user();
//! let registrar = network.registrar();
//!
//! user.create_account("Alice", "alice@example.com", "5550100", "111").unwrap();
//! user.request_approval("Alice", "alice@example.com", "5550100", "111").unwrap();
//! registrar.approve_user("Alice", "111").unwrap();
//! user.recharge("Alice", "111", "upg500").unwrap();
//!
//! user.file_registration("P1", "Alice", "111", 300).unwrap();
//! registrar.approve_registration("P1").unwrap();
//! user.set_sale_status("P1", "Alice", "111", "onSale").unwrap();
//! ```
//!
//! ## Re-exports
//!
//! - `propreg::core` - Keys, records, codec
//! - `propreg::store` - Store trait, backends, transactions

pub mod config;
pub mod contract;
pub mod error;
pub mod network;
pub mod property;
pub mod registration;
pub mod registry;
pub mod topup;
pub mod transfer;

// Re-export component crates
pub use propreg_core as core;
pub use propreg_store as store;

pub use config::NetworkConfig;
pub use contract::{RegistrarContract, UserContract};
pub use error::{ErrorKind, RegistryError, Result};
pub use network::Network;
pub use topup::TopUpTable;
pub use transfer::PurchaseReceipt;

pub use propreg_core::{
    CompositeKey, PropertyId, PropertyRecord, PropertyStatus, RegistrationRequest,
    RegistrationStatus, UserAccount, UserId,
};
pub use propreg_store::LedgerAccessor;
