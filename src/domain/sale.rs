//! Sale carts, receipts, and the central category-sales aggregate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{MemberId, ProductId, ShardId, TransactionId};

/// One line of a sale cart.
///
/// Carries the shard id the caller obtained from the product fragment; the
/// coordinator looks the product up on that declared shard and surfaces a
/// not-found error when the id is stale rather than silently re-routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub shard_id: ShardId,
    pub quantity: u32,
}

/// A receipt line item, denormalized at the moment of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub product_id: ProductId,
    /// Shard the product lived on, kept for auditing.
    pub shard_id: ShardId,
    pub name: String,
    pub category: String,
    pub price_at_sale: Decimal,
    pub quantity_sold: u32,
}

/// A completed sale receipt. Created exactly once per sale and immutable
/// after creation. Stored on the shard of the cart's first item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: TransactionId,
    pub timestamp: DateTime<Utc>,
    pub subtotal: Decimal,
    pub discount_applied: Decimal,
    pub total_amount: Decimal,
    pub member_id: Option<MemberId>,
    pub items: Vec<ReceiptLine>,
}

/// Per-product counter inside a category aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSales {
    pub name: String,
    pub quantity_sold: u64,
}

/// Central running summary of units sold for one category.
///
/// Mutated transactionally alongside every sale: an existing per-product
/// entry is incremented in place, and only when none matches is a new entry
/// appended (upserting the whole document if the category is new).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySales {
    pub category: String,
    pub total_sold: u64,
    pub products_sold: Vec<ProductSales>,
}
