//! Product, stock, and supplier documents.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, SupplierId};

/// Category assigned when a product is created with a blank category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Trim a raw category, falling back to [`UNCATEGORIZED`] when blank.
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// A product's stored price.
///
/// Legacy data stores prices both as numbers and as free-form strings, so the
/// field keeps both shapes and coerces on read. Unparsable text coerces to
/// zero; that is long-standing documented policy, not an accident, because
/// changing it would change query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    /// A properly typed numeric price.
    Numeric(Decimal),
    /// A legacy string-typed price, coerced best-effort on read.
    Text(String),
}

impl PriceField {
    /// Best-effort numeric value of the price. Unparsable text yields zero.
    #[must_use]
    pub fn coerce(&self) -> Decimal {
        match self {
            PriceField::Numeric(value) => *value,
            PriceField::Text(raw) => raw.trim().parse().unwrap_or(Decimal::ZERO),
        }
    }
}

impl From<Decimal> for PriceField {
    fn from(value: Decimal) -> Self {
        PriceField::Numeric(value)
    }
}

/// A product document. Owned by exactly one shard, chosen at creation time by
/// hashing its (normalized) category. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: PriceField,
    pub category: String,
    pub supplier_id: SupplierId,
    pub created_at: DateTime<Utc>,
}

/// Stock record paired with a product, living on the product's shard.
///
/// Quantity is unsigned by construction; decrements only go through the
/// conditional update on the owning shard, so it can never go negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub location: String,
    pub last_updated: DateTime<Utc>,
}

/// A supplier, created lazily (find-or-insert) when a product names it.
/// Name is unique per shard, case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact_email: String,
}
