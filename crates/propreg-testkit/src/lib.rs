//! # propreg testkit
//!
//! Testing utilities for propreg.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Composite keys and record encodings that must never drift
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A network with a fixed clock, plus helpers that walk users
//!   and properties through their lifecycles
//!
//! ## Golden Vectors
//!
//! ```rust
//! use propreg_testkit::vectors::verify_all_vectors;
//!
//! assert!(verify_all_vectors().is_empty());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use propreg_testkit::generators::user_id;
//!
//! proptest! {
//!     #[test]
//!     fn account_keys_are_stable(user in user_id()) {
//!         prop_assert_eq!(user.account_key(), user.clone().account_key());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use propreg_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let alice = fixture.funded_user("Alice", "111", &["upg500"]);
//! let p1 = fixture.listed_property("P1", &alice, 300);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{ContendedStore, FailingStore, TestFixture, FIXTURE_TIME};
pub use vectors::{all_keys, all_records, verify_all_vectors, GoldenKey, GoldenRecord};
