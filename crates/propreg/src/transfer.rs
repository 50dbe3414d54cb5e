//! Property purchase.

use std::fmt;

use propreg_core::{CompositeKey, PropertyId, PropertyStatus, UserId};
use propreg_store::LedgerAccessor;
use tracing::info;

use crate::error::{RegistryError, Result};
use crate::registry;

/// Outcome of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub property: PropertyId,
    pub buyer: UserId,
    pub seller: UserId,
    pub price: u64,
    /// Buyer balance after the transfer.
    pub buyer_balance: u64,
    /// Seller balance after the transfer.
    pub seller_balance: u64,
}

impl fmt::Display for PurchaseReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "property {} sold by {} to {} for {} coins",
            self.property, self.seller, self.buyer, self.price
        )
    }
}

/// Buy an on-sale property.
///
/// Every check runs before the first write, so a failed purchase leaves
/// the buyer, the seller and the property untouched.
pub fn purchase<C: LedgerAccessor + ?Sized>(
    ctx: &mut C,
    property_id: &PropertyId,
    buyer_id: &UserId,
) -> Result<PurchaseReceipt> {
    let mut buyer = registry::require_approved(ctx, buyer_id)?;

    let mut property = registry::load_property(ctx, property_id)?
        .ok_or_else(|| RegistryError::PropertyNotFound(property_id.clone()))?;
    if property.status != PropertyStatus::OnSale {
        return Err(RegistryError::NotForSale(property_id.clone()));
    }

    let price = property.price;
    let buyer_balance = buyer.balance.unwrap_or_default();
    if buyer_balance < price {
        return Err(RegistryError::InsufficientFunds {
            price,
            balance: buyer_balance,
        });
    }

    let buyer_key = registry::account_key(ctx, buyer_id);
    if property.owner == buyer_key {
        return Err(RegistryError::BuyerIsOwner {
            property: property_id.clone(),
            user: buyer_id.clone(),
        });
    }

    let seller_key: CompositeKey = property.owner.clone();
    let mut seller = registry::load_account_by_key(ctx, &seller_key)?
        .filter(|seller| seller.is_approved())
        .ok_or_else(|| RegistryError::SellerNotFound {
            property: property_id.clone(),
            owner: seller_key.clone(),
        })?;
    let seller_id = seller.user_id();
    let seller_balance = seller
        .balance
        .unwrap_or_default()
        .checked_add(price)
        .ok_or_else(|| RegistryError::BalanceOverflow(seller_id.clone()))?;

    let now = ctx.tx_timestamp();
    let buyer_balance = buyer_balance - price;
    buyer.balance = Some(buyer_balance);
    buyer.updated_at = now;
    seller.balance = Some(seller_balance);
    seller.updated_at = now;
    property.status = PropertyStatus::Registered;
    property.owner = buyer_key.clone();
    property.updated_at = now;

    let property_key = registry::property_key(ctx, property_id);
    registry::save(ctx, &property_key, &property)?;
    registry::save(ctx, &buyer_key, &buyer)?;
    registry::save(ctx, &seller_key, &seller)?;

    let receipt = PurchaseReceipt {
        property: property_id.clone(),
        buyer: buyer_id.clone(),
        seller: seller_id,
        price,
        buyer_balance,
        seller_balance,
    };
    info!(
        property = %receipt.property,
        buyer = %receipt.buyer,
        seller = %receipt.seller,
        price,
        "property sold"
    );
    Ok(receipt)
}
