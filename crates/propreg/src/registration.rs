//! User onboarding: account creation, approval requests, registrar approval.

use propreg_core::{RegistrationRequest, RegistrationStatus, UserAccount, UserId};
use propreg_store::LedgerAccessor;
use tracing::info;

use crate::error::{RegistryError, Result};
use crate::registry;

/// Create an account for `user`. The account has no balance until approved.
pub fn create_account<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    user: &UserId,
    email: &str,
    phone: &str,
) -> Result<UserAccount> {
    let key = registry::account_key(ctx, user);
    if registry::exists(ctx, &key)? {
        return Err(RegistryError::AccountExists(user.clone()));
    }

    let account = UserAccount::new(user, email, phone, ctx.tx_timestamp());
    registry::save(ctx, &key, &account)?;

    info!(user = %user, "account created");
    Ok(account)
}

/// File a request for the registrar to approve `user`.
pub fn request_approval<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    user: &UserId,
    email: &str,
    phone: &str,
) -> Result<RegistrationRequest> {
    let account_key = registry::account_key(ctx, user);
    if !registry::exists(ctx, &account_key)? {
        return Err(RegistryError::AccountNotFound(user.clone()));
    }

    let key = registry::request_key(ctx, user);
    if registry::exists(ctx, &key)? {
        return Err(RegistryError::AlreadyRequested(user.clone()));
    }

    let request = RegistrationRequest::new(user, email, phone, ctx.tx_timestamp());
    registry::save(ctx, &key, &request)?;

    info!(user = %user, "registration requested");
    Ok(request)
}

/// Registrar approval: initialise the balance to zero on both the account
/// and the request.
pub fn approve_user<C: LedgerAccessor + ?Sized>(ctx: &mut C, user: &UserId) -> Result<UserAccount> {
    let mut account = registry::load_account(ctx, user)?
        .ok_or_else(|| RegistryError::AccountNotFound(user.clone()))?;
    let mut request = registry::load_request(ctx, user)?
        .ok_or_else(|| RegistryError::RequestNotFound(user.clone()))?;

    // Re-approving would wipe the balance
    if account.is_approved() {
        return Err(RegistryError::UserAlreadyApproved(user.clone()));
    }

    let now = ctx.tx_timestamp();
    account.balance = Some(0);
    account.updated_at = now;
    request.balance = Some(0);
    request.updated_at = now;

    let account_key = registry::account_key(ctx, user);
    let request_key = registry::request_key(ctx, user);
    registry::save(ctx, &account_key, &account)?;
    registry::save(ctx, &request_key, &request)?;

    info!(user = %user, "user approved");
    Ok(account)
}

/// Return the account of `user`.
pub fn view_user<C: LedgerAccessor + ?Sized>(ctx: &mut C, user: &UserId) -> Result<UserAccount> {
    registry::load_account(ctx, user)?.ok_or_else(|| RegistryError::AccountNotFound(user.clone()))
}

/// Where `user` stands in the onboarding flow.
pub fn registration_status<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    user: &UserId,
) -> Result<RegistrationStatus> {
    let account = view_user(ctx, user)?;
    if account.is_approved() {
        return Ok(RegistrationStatus::Approved);
    }
    let request_key = registry::request_key(ctx, user);
    if registry::exists(ctx, &request_key)? {
        Ok(RegistrationStatus::Requested)
    } else {
        Ok(RegistrationStatus::Unregistered)
    }
}
