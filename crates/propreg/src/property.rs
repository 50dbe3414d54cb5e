//! Property lifecycle: filing, registrar approval, listing, inquiry.
//!
//! A property moves `PendingApproval -> Registered <-> OnSale`. Only the
//! registrar takes it out of `PendingApproval`; only the owner moves it
//! between `Registered` and `OnSale`.

use propreg_core::{PropertyId, PropertyRecord, PropertyStatus, UserId};
use propreg_store::LedgerAccessor;
use tracing::info;

use crate::error::{RegistryError, Result};
use crate::registry;

fn require_property<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    property_id: &PropertyId,
) -> Result<PropertyRecord> {
    registry::load_property(ctx, property_id)?
        .ok_or_else(|| RegistryError::PropertyNotFound(property_id.clone()))
}

/// File a new property owned by `owner`, pending registrar approval.
pub fn file_registration<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    property_id: &PropertyId,
    owner: &UserId,
    price: u64,
) -> Result<PropertyRecord> {
    if price == 0 {
        return Err(RegistryError::InvalidPrice);
    }
    registry::require_approved(ctx, owner)?;

    let key = registry::property_key(ctx, property_id);
    if registry::exists(ctx, &key)? {
        return Err(RegistryError::AlreadyFiled(property_id.clone()));
    }

    let property = PropertyRecord::new(property_id.clone(), owner, price, ctx.tx_timestamp());
    registry::save(ctx, &key, &property)?;

    info!(property = %property_id, owner = %owner, price, "property filed");
    Ok(property)
}

/// Registrar approval of a filed property.
pub fn approve_registration<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    property_id: &PropertyId,
) -> Result<PropertyRecord> {
    let mut property = require_property(ctx, property_id)?;
    if property.status.is_approved() {
        return Err(RegistryError::AlreadyApproved(property_id.clone()));
    }

    property.status = PropertyStatus::Registered;
    property.updated_at = ctx.tx_timestamp();
    let key = registry::property_key(ctx, property_id);
    registry::save(ctx, &key, &property)?;

    info!(property = %property_id, "property registered");
    Ok(property)
}

/// Owner lists or delists an approved property.
///
/// `status` must be `Registered` or `OnSale`. Setting the current status
/// again is accepted and rewrites the record.
pub fn set_sale_status<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    property_id: &PropertyId,
    caller: &UserId,
    status: PropertyStatus,
) -> Result<PropertyRecord> {
    if !status.is_approved() {
        return Err(RegistryError::InvalidStatus(status));
    }
    registry::require_approved(ctx, caller)?;

    let mut property = require_property(ctx, property_id)?;
    if !property.is_owned_by(caller) {
        return Err(RegistryError::NotOwner {
            property: property_id.clone(),
            user: caller.clone(),
        });
    }
    if !property.status.is_approved() {
        return Err(RegistryError::NotApprovedYet(property_id.clone()));
    }

    let previous = property.status;
    property.status = status;
    property.updated_at = ctx.tx_timestamp();
    let key = registry::property_key(ctx, property_id);
    registry::save(ctx, &key, &property)?;

    info!(property = %property_id, from = %previous, to = %status, "sale status changed");
    Ok(property)
}

/// Read a property on behalf of an approved user.
///
/// Any approved user may inquire; ownership is not required.
/// The owner reference is returned as stored: it always names an approved
/// account, since filing and purchase only ever assign approved owners and
/// accounts are never deleted or unapproved.
pub fn inquire<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    property_id: &PropertyId,
    caller: &UserId,
) -> Result<PropertyRecord> {
    registry::require_approved(ctx, caller)?;
    require_property(ctx, property_id)
}

pub fn inquire_status<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    property_id: &PropertyId,
    caller: &UserId,
) -> Result<PropertyStatus> {
    inquire(ctx, property_id, caller).map(|property| property.status)
}

/// Registrar read of any property.
pub fn view_property<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    property_id: &PropertyId,
) -> Result<PropertyRecord> {
    require_property(ctx, property_id)
}
