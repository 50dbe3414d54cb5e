//! Records stored on the ledger.
//!
//! Field names are part of the on-ledger format and must stay stable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::key::CompositeKey;
use crate::types::{PropertyId, UserId};

/// Derived registration state of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationStatus {
    /// Account exists, no request filed.
    Unregistered,
    /// Request filed, not yet approved.
    Requested,
    /// Registrar approved; the balance is defined.
    Approved,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub name: String,
    #[serde(rename = "emailID")]
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone: String,
    #[serde(rename = "socialSecurityNumber")]
    pub ssn: String,
    /// Coin balance. Absent until the registrar approves the user.
    #[serde(rename = "upgradCoins", default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserAccount {
    pub fn new(
        user: &UserId,
        email: impl Into<String>,
        phone: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            name: user.name.clone(),
            email: email.into(),
            phone: phone.into(),
            ssn: user.ssn.clone(),
            balance: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn user_id(&self) -> UserId {
        UserId::new(&self.name, &self.ssn)
    }

    /// An account is approved once its balance field exists.
    pub fn is_approved(&self) -> bool {
        self.balance.is_some()
    }
}

/// A pending or approved request for registrar approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub name: String,
    #[serde(rename = "emailID")]
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone: String,
    #[serde(rename = "socialSecurityNumber")]
    pub ssn: String,
    /// Set to 0 when the registrar approves; marks the request as handled.
    #[serde(rename = "upgradCoins", default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl RegistrationRequest {
    pub fn new(
        user: &UserId,
        email: impl Into<String>,
        phone: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            name: user.name.clone(),
            email: email.into(),
            phone: phone.into(),
            ssn: user.ssn.clone(),
            balance: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.balance.is_some()
    }
}

/// Lifecycle state of a property.
///
/// `PendingApproval -> Registered <-> OnSale`; a purchase moves
/// `OnSale -> Registered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyStatus {
    #[serde(rename = "")]
    PendingApproval,
    #[serde(rename = "registered")]
    Registered,
    #[serde(rename = "onSale")]
    OnSale,
}

impl PropertyStatus {
    /// Whether the registrar has approved the property.
    pub fn is_approved(self) -> bool {
        matches!(self, PropertyStatus::Registered | PropertyStatus::OnSale)
    }

    /// The on-ledger string for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::PendingApproval => "",
            PropertyStatus::Registered => "registered",
            PropertyStatus::OnSale => "onSale",
        }
    }

    /// Parse an on-ledger status string.
    pub fn from_ledger_str(s: &str) -> Option<Self> {
        match s {
            "" => Some(PropertyStatus::PendingApproval),
            "registered" => Some(PropertyStatus::Registered),
            "onSale" => Some(PropertyStatus::OnSale),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyStatus::PendingApproval => f.write_str("pending approval"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A property and its current owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub property_id: PropertyId,
    /// Account key of the owning user.
    pub owner: CompositeKey,
    pub price: u64,
    pub status: PropertyStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PropertyRecord {
    pub fn new(property_id: PropertyId, owner: &UserId, price: u64, timestamp: i64) -> Self {
        Self {
            property_id,
            owner: owner.account_key(),
            price,
            status: PropertyStatus::PendingApproval,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner == user.account_key()
    }
}
