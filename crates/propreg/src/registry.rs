//! Typed access to ledger records.
//!
//! A key holding zero bytes is treated exactly like a missing key. Bytes
//! that are present but do not decode as the expected record surface as
//! [`RegistryError::Decode`].

use propreg_core::{
    codec, CompositeKey, KeyKind, LedgerRecord, PropertyId, PropertyRecord, RegistrationRequest,
    UserAccount, UserId,
};
use propreg_store::LedgerAccessor;
use tracing::debug;

use crate::error::{RegistryError, Result};

/// Key of `user`'s account record, derived through the ledger.
pub fn account_key<C: LedgerAccessor + ?Sized>(ctx: &C, user: &UserId) -> CompositeKey {
    ctx.create_composite_key(KeyKind::User.tag(), &[user.name.as_str(), user.ssn.as_str()])
}

pub fn request_key<C: LedgerAccessor + ?Sized>(ctx: &C, user: &UserId) -> CompositeKey {
    ctx.create_composite_key(KeyKind::Request.tag(), &[user.name.as_str(), user.ssn.as_str()])
}

pub fn property_key<C: LedgerAccessor + ?Sized>(ctx: &C, property_id: &PropertyId) -> CompositeKey {
    ctx.create_composite_key(KeyKind::Property.tag(), &[property_id.as_str()])
}

/// Whether a record is stored at `key`.
pub fn exists<C: LedgerAccessor + ?Sized>(ctx: &mut C, key: &CompositeKey) -> Result<bool> {
    Ok(!ctx.get_state(key)?.is_empty())
}

/// Load and decode the record at `key`, or `None` if the key is empty.
pub fn load<T, C>(ctx: &mut C, key: &CompositeKey) -> Result<Option<T>>
where
    T: LedgerRecord,
    C: LedgerAccessor + ?Sized,
{
    let bytes = ctx.get_state(key)?;
    if bytes.is_empty() {
        debug!(%key, kind = %T::KIND, "record absent");
        return Ok(None);
    }
    Ok(Some(codec::decode(&bytes)?))
}

/// Encode and stage `record` at `key`.
pub fn save<T, C>(ctx: &mut C, key: &CompositeKey, record: &T) -> Result<()>
where
    T: LedgerRecord,
    C: LedgerAccessor + ?Sized,
{
    ctx.put_state(key, codec::encode(record))?;
    Ok(())
}

pub fn load_account<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    user: &UserId,
) -> Result<Option<UserAccount>> {
    let key = account_key(ctx, user);
    load(ctx, &key)
}

/// Resolve an account from a stored owner reference.
pub fn load_account_by_key<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    key: &CompositeKey,
) -> Result<Option<UserAccount>> {
    load(ctx, key)
}

/// Load the account of `user`, requiring it to be approved.
pub fn require_approved<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    user: &UserId,
) -> Result<UserAccount> {
    load_account(ctx, user)?
        .filter(UserAccount::is_approved)
        .ok_or_else(|| RegistryError::OwnerNotApproved(user.clone()))
}

pub fn load_request<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    user: &UserId,
) -> Result<Option<RegistrationRequest>> {
    let key = request_key(ctx, user);
    load(ctx, &key)
}

pub fn load_property<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    property_id: &PropertyId,
) -> Result<Option<PropertyRecord>> {
    let key = property_key(ctx, property_id);
    load(ctx, &key)
}
