//! Caller-facing contracts.
//!
//! Users and the registrar reach the ledger through separate handles, so a
//! registrar-only operation cannot be invoked from a user handle. Mutating
//! operations are submitted; queries are evaluated.

use propreg_core::{
    PropertyId, PropertyRecord, PropertyStatus, RegistrationRequest, RegistrationStatus,
    UserAccount, UserId,
};
use propreg_store::Store;

use crate::error::{RegistryError, Result};
use crate::network::Network;
use crate::transfer::PurchaseReceipt;
use crate::{property, registration, topup, transfer};

/// Operations available to any user.
pub struct UserContract<'n, S: Store> {
    network: &'n Network<S>,
}

impl<'n, S: Store> UserContract<'n, S> {
    pub(crate) fn new(network: &'n Network<S>) -> Self {
        Self { network }
    }

    pub fn create_account(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        ssn: &str,
    ) -> Result<UserAccount> {
        let user = UserId::new(name, ssn);
        self.network.submit("createAccount", |tx| {
            registration::create_account(tx, &user, email, phone)
        })
    }

    pub fn request_approval(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        ssn: &str,
    ) -> Result<RegistrationRequest> {
        let user = UserId::new(name, ssn);
        self.network.submit("requestUserRegistration", |tx| {
            registration::request_approval(tx, &user, email, phone)
        })
    }

    /// Buy coins with an external payment reference.
    pub fn recharge(&self, name: &str, ssn: &str, reference: &str) -> Result<UserAccount> {
        let user = UserId::new(name, ssn);
        let table = self.network.top_up();
        self.network
            .submit("rechargeAccount", |tx| topup::recharge(tx, table, &user, reference))
    }

    pub fn view_user(&self, name: &str, ssn: &str) -> Result<UserAccount> {
        let user = UserId::new(name, ssn);
        self.network
            .evaluate("viewUser", |tx| registration::view_user(tx, &user))
    }

    pub fn registration_status(&self, name: &str, ssn: &str) -> Result<RegistrationStatus> {
        let user = UserId::new(name, ssn);
        self.network.evaluate("registrationStatus", |tx| {
            registration::registration_status(tx, &user)
        })
    }

    pub fn file_registration(
        &self,
        property_id: &str,
        owner_name: &str,
        owner_ssn: &str,
        price: u64,
    ) -> Result<PropertyRecord> {
        let property_id = PropertyId::new(property_id);
        let owner = UserId::new(owner_name, owner_ssn);
        self.network.submit("propertyRegistrationRequest", |tx| {
            property::file_registration(tx, &property_id, &owner, price)
        })
    }

    pub fn inquire(&self, property_id: &str, name: &str, ssn: &str) -> Result<PropertyRecord> {
        let property_id = PropertyId::new(property_id);
        let caller = UserId::new(name, ssn);
        self.network
            .evaluate("viewProperty", |tx| property::inquire(tx, &property_id, &caller))
    }

    pub fn inquire_status(
        &self,
        property_id: &str,
        name: &str,
        ssn: &str,
    ) -> Result<PropertyStatus> {
        let property_id = PropertyId::new(property_id);
        let caller = UserId::new(name, ssn);
        self.network.evaluate("viewPropertyStatus", |tx| {
            property::inquire_status(tx, &property_id, &caller)
        })
    }

    /// List or delist a property. `status` is the on-ledger string,
    /// `"onSale"` or `"registered"`.
    pub fn set_sale_status(
        &self,
        property_id: &str,
        name: &str,
        ssn: &str,
        status: &str,
    ) -> Result<PropertyRecord> {
        let status = PropertyStatus::from_ledger_str(status)
            .ok_or_else(|| RegistryError::UnknownStatus(status.to_string()))?;
        let property_id = PropertyId::new(property_id);
        let caller = UserId::new(name, ssn);
        self.network.submit("updateProperty", |tx| {
            property::set_sale_status(tx, &property_id, &caller, status)
        })
    }

    pub fn purchase(&self, property_id: &str, name: &str, ssn: &str) -> Result<PurchaseReceipt> {
        let property_id = PropertyId::new(property_id);
        let buyer = UserId::new(name, ssn);
        self.network
            .submit("purchaseProperty", |tx| transfer::purchase(tx, &property_id, &buyer))
    }
}

/// Operations reserved for the registrar.
pub struct RegistrarContract<'n, S: Store> {
    network: &'n Network<S>,
}

impl<'n, S: Store> RegistrarContract<'n, S> {
    pub(crate) fn new(network: &'n Network<S>) -> Self {
        Self { network }
    }

    pub fn approve_user(&self, name: &str, ssn: &str) -> Result<UserAccount> {
        let user = UserId::new(name, ssn);
        self.network
            .submit("approveNewUser", |tx| registration::approve_user(tx, &user))
    }

    pub fn approve_registration(&self, property_id: &str) -> Result<PropertyRecord> {
        let property_id = PropertyId::new(property_id);
        self.network.submit("approvePropertyRegistration", |tx| {
            property::approve_registration(tx, &property_id)
        })
    }

    pub fn view_user(&self, name: &str, ssn: &str) -> Result<UserAccount> {
        let user = UserId::new(name, ssn);
        self.network
            .evaluate("viewUser", |tx| registration::view_user(tx, &user))
    }

    pub fn view_property(&self, property_id: &str) -> Result<PropertyRecord> {
        let property_id = PropertyId::new(property_id);
        self.network
            .evaluate("viewProperty", |tx| property::view_property(tx, &property_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::error::ErrorKind;
    use propreg_store::MemoryStore;

    fn network() -> Network<MemoryStore> {
        Network::new(MemoryStore::new(), NetworkConfig::default()).unwrap()
    }

    #[test]
    fn test_unknown_sale_status() {
        let network = network();
        let err = network
            .user()
            .set_sale_status("P1", "Alice", "111", "sold")
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownStatus(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_registrar_views_any_property() {
        let network = network();
        let user = network.user();
        user.create_account("Alice", "a@x.io", "555", "111").unwrap();
        user.request_approval("Alice", "a@x.io", "555", "111").unwrap();
        network.registrar().approve_user("Alice", "111").unwrap();
        user.file_registration("P1", "Alice", "111", 300).unwrap();

        let property = network.registrar().view_property("P1").unwrap();
        assert_eq!(property.status, PropertyStatus::PendingApproval);
        assert_eq!(
            network.registrar().view_user("Alice", "111").unwrap().balance,
            Some(0)
        );
    }

    #[test]
    fn test_queries_do_not_advance_height() {
        let network = network();
        let user = network.user();
        user.create_account("Alice", "a@x.io", "555", "111").unwrap();
        let height = network.store().height().unwrap();

        user.view_user("Alice", "111").unwrap();
        user.registration_status("Alice", "111").unwrap();
        assert_eq!(network.store().height().unwrap(), height);
    }
}
