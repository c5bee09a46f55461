//! Identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// The inner [`Uuid`] is private so all construction goes through the
        /// defined constructors.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id!(
    /// Product identifier - unique within its owning shard by construction.
    ProductId
);
uuid_id!(
    /// Supplier identifier, scoped to one shard.
    SupplierId
);
uuid_id!(
    /// Member identifier.
    MemberId
);
uuid_id!(
    /// Sale receipt identifier.
    TransactionId
);

/// Identifier of one logical database shard.
///
/// Always in `[0, shard_count)` when produced by the
/// [`ShardRouter`](crate::routing::ShardRouter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShardId(u16);

impl ShardId {
    /// Create a shard id from its numeric value.
    pub fn new(id: u16) -> Self {
        Self(id)
    }

    /// The shard's position, usable as a vector index.
    #[must_use]
    pub fn index(&self) -> usize {
        usize::from(self.0)
    }

    /// The raw numeric value.
    #[must_use]
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(ProductId::generate(), ProductId::generate());
    }

    #[test]
    fn shard_id_roundtrips_index() {
        let id = ShardId::new(2);
        assert_eq!(id.index(), 2);
        assert_eq!(id.to_string(), "2");
    }
}
