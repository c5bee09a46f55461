//! Error types for the crate.
//!
//! The taxonomy mirrors how callers react: configuration problems are fatal
//! at startup, an unreachable shard is fatal to the current operation only,
//! and duplicates, missing documents, out-of-stock lines, and invalid input
//! are expected business failures returned as typed values.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{MemberId, ProductId, ShardId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// A unique-key collision on a single shard.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DuplicateError {
    #[error("product '{name}' from '{supplier}' already exists on shard {shard}")]
    Product {
        name: String,
        supplier: String,
        shard: ShardId,
    },

    #[error("member with email '{email}' already exists on shard {shard}")]
    MemberEmail { email: String, shard: ShardId },

    #[error("member with phone '{phone}' already exists on shard {shard}")]
    MemberPhone { phone: String, shard: ShardId },
}

/// A referenced document is absent from the shard it should live on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("supplier '{name}' not found on shard {shard}")]
    Supplier { name: String, shard: ShardId },

    #[error("product '{name}' from '{supplier}' not found on shard {shard}")]
    ProductByName {
        name: String,
        supplier: String,
        shard: ShardId,
    },

    #[error("product {id} not found on shard {shard}")]
    Product { id: ProductId, shard: ShardId },

    #[error("member {id} not found on shard {shard}")]
    Member { id: MemberId, shard: ShardId },

    #[error("no member with phone '{phone}' on any shard")]
    MemberByPhone { phone: String },

    #[error("no member with email '{email}' on shard {shard}")]
    MemberByEmail { email: String, shard: ShardId },
}

/// Input rejected at the boundary, before any write occurs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("cart line quantity must be positive")]
    ZeroQuantity { product_id: ProductId },

    #[error("stock amount must be positive")]
    ZeroStockAmount,

    #[error("discount cannot be negative, got {discount}")]
    NegativeDiscount { discount: Decimal },

    #[error("product name cannot be blank")]
    BlankProductName,

    #[error("price cannot be negative, got {price}")]
    NegativePrice { price: Decimal },
}

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A shard database is unreachable. Fatal to the in-progress operation;
    /// callers must abort rather than partially proceed.
    #[error("shard {shard} unreachable: {reason}")]
    Connection { shard: ShardId, reason: String },

    #[error(transparent)]
    Duplicate(#[from] DuplicateError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A conditional stock decrement matched nothing: the requested quantity
    /// exceeds what the shard holds. Aborts the whole sale.
    #[error(
        "insufficient stock for '{product}' on shard {shard}: requested {requested}, available {available}"
    )]
    OutOfStock {
        product: String,
        shard: ShardId,
        requested: u32,
        available: u32,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the failure is an expected business condition the caller can
    /// recover from by adjusting input (as opposed to a connection or
    /// configuration problem).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Duplicate(_) | Error::NotFound(_) | Error::OutOfStock { .. } | Error::Validation(_)
        )
    }
}
