//! Coin top-ups against external payment references.

use std::collections::BTreeMap;

use propreg_core::{UserAccount, UserId};
use propreg_store::LedgerAccessor;
use tracing::info;

use crate::error::{RegistryError, Result};
use crate::registry;

/// Immutable payment reference to coin amount table.
///
/// Built once from configuration; never stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopUpTable {
    amounts: BTreeMap<String, u64>,
}

impl TopUpTable {
    pub fn new(amounts: BTreeMap<String, u64>) -> Self {
        Self { amounts }
    }

    /// Coins credited for `reference`, if it is known.
    pub fn amount(&self, reference: &str) -> Option<u64> {
        self.amounts.get(reference).copied()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Credit an approved user's balance with the amount bought by `reference`.
pub fn recharge<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    table: &TopUpTable,
    user: &UserId,
    reference: &str,
) -> Result<UserAccount> {
    let mut account = registry::load_account(ctx, user)?
        .filter(UserAccount::is_approved)
        .ok_or_else(|| RegistryError::Unregistered(user.clone()))?;

    let amount = table
        .amount(reference)
        .ok_or_else(|| RegistryError::InvalidReference(reference.to_string()))?;

    let balance = account.balance.unwrap_or_default();
    account.balance = Some(
        balance
            .checked_add(amount)
            .ok_or_else(|| RegistryError::BalanceOverflow(user.clone()))?,
    );
    account.updated_at = ctx.tx_timestamp();

    let key = registry::account_key(ctx, user);
    registry::save(ctx, &key, &account)?;
    info!(user = %user, amount, reference, "account recharged");
    Ok(account)
}
