//! Product query filters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Optional criteria for a scatter-gather product query.
///
/// All fields are conjunctive. A `category` filter enables partition pruning:
/// the query engine skips every shard the category does not hash to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub name: Option<String>,
    /// Exact, case-insensitive category match.
    pub category: Option<String>,
    /// Inclusive lower bound on the coerced numeric price.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on the coerced numeric price.
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring match on the supplier name.
    pub brand: Option<String>,
}

impl ProductFilter {
    /// Filter matching every in-stock product on every shard.
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter on an exact category.
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }
}
