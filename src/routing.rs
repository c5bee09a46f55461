//! Deterministic shard routing for categories and member emails.
//!
//! Placement is pure arithmetic over fixed tables: the same category or email
//! always maps to the same shard, which is what makes single-shard commands
//! and partition pruning possible. Changing the shard count invalidates every
//! existing placement and requires a full data migration.

use crate::domain::{normalize_category, ShardId};

/// Number of shards the default deployment runs with.
pub const DEFAULT_SHARD_COUNT: u16 = 3;

/// Fixed category hash table. Unknown or blank categories take the
/// `Uncategorized` bucket (0).
const CATEGORY_HASH: &[(&str, u16)] = &[
    ("Electronics", 1),
    ("Self Care", 2),
    ("Dairy Products", 3),
    ("Bakery", 4),
    ("Other", 5),
    ("Uncategorized", 0),
];

/// Ordered email-domain rules. First suffix match wins; everything else,
/// including an empty email, lands on [`DEFAULT_EMAIL_SHARD`].
const EMAIL_RULES: &[(&str, u16)] = &[("@gmail.com", 0), ("@yahoo.com", 1)];

/// Bucket for emails matching no rule, reduced modulo the shard count.
const DEFAULT_EMAIL_SHARD: u16 = 2;

fn category_bucket(category: &str) -> u16 {
    CATEGORY_HASH
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(0, |(_, bucket)| *bucket)
}

/// Maps categories and emails to shard ids.
///
/// Stateless and cheap to copy; services hold their own instance.
#[derive(Debug, Clone, Copy)]
pub struct ShardRouter {
    shard_count: u16,
}

impl ShardRouter {
    /// Create a router over `shard_count` shards. The count comes from
    /// validated configuration and is at least 1.
    pub fn new(shard_count: u16) -> Self {
        Self { shard_count }
    }

    /// Number of shards this router distributes over.
    #[must_use]
    pub fn shard_count(&self) -> u16 {
        self.shard_count
    }

    /// All shard ids, in shard order.
    pub fn all(&self) -> impl Iterator<Item = ShardId> {
        (0..self.shard_count).map(ShardId::new)
    }

    /// Shard owning a product category.
    ///
    /// The category is normalized (trimmed, blank becomes `Uncategorized`)
    /// before the table lookup, then the bucket is reduced modulo the shard
    /// count. Total: every input maps to a shard in `[0, shard_count)`.
    #[must_use]
    pub fn shard_for_category(&self, category: &str) -> ShardId {
        let normalized = normalize_category(category);
        ShardId::new(category_bucket(&normalized) % self.shard_count)
    }

    /// Shard owning a member, by the email's domain suffix.
    #[must_use]
    pub fn shard_for_email(&self, email: &str) -> ShardId {
        let lowered = email.trim().to_lowercase();
        let bucket = EMAIL_RULES
            .iter()
            .find(|(suffix, _)| lowered.ends_with(suffix))
            .map_or(DEFAULT_EMAIL_SHARD, |(_, bucket)| *bucket);
        ShardId::new(bucket % self.shard_count)
    }
}

impl Default for ShardRouter {
    fn default() -> Self {
        Self::new(DEFAULT_SHARD_COUNT)
    }
}
