//! Denormalized product fragments produced by scatter-gather queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, ShardId};

/// Supplier name shown when a product's supplier document is missing.
pub const SUPPLIER_FALLBACK: &str = "N/A";

/// A disposable, read-optimized view of one product, assembled per shard from
/// the product, stock, and supplier collections.
///
/// Fragments live in a TTL'd cache that is fully replaced on every query;
/// callers must treat the returned list, not the cache, as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFragment {
    pub product_id: ProductId,
    pub name: String,
    /// Price coerced to a number (legacy string prices coerce best-effort).
    pub price: Decimal,
    pub category: String,
    pub quantity_in_stock: u32,
    pub supplier_name: String,
    /// Shard the product lives on; carried into cart lines on sale.
    pub shard_id: ShardId,
    /// Insertion time, used by the cache for expiry.
    pub created_at: DateTime<Utc>,
}
