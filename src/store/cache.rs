//! Disposable TTL cache for scatter-gather product fragments.

use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::ProductFragment;

/// In-process stand-in for the `FragmentedData` collection: entries expire a
/// fixed interval after their `created_at` timestamp and the whole cache is
/// replaced on every query.
///
/// Shared and unguarded by design. Concurrent queries clobber each other's
/// cached view, which is acceptable because nothing treats the cache as a
/// source of truth; each caller keeps its own returned list.
#[derive(Debug)]
pub struct FragmentCache {
    ttl: Duration,
    entries: RwLock<Vec<ProductFragment>>,
}

impl FragmentCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Expiry applied to cached fragments.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Clear the cache, then insert the given fragments.
    ///
    /// Deliberately two steps, not one atomic swap: this mirrors the
    /// clear-then-bulk-insert the gather phase performs against the real
    /// collection, and carries the same interleaving caveat.
    pub fn replace_all(&self, fragments: &[ProductFragment]) {
        self.entries.write().clear();
        if !fragments.is_empty() {
            self.entries.write().extend_from_slice(fragments);
        }
    }

    /// Current unexpired entries. Expired fragments are pruned on access.
    pub fn entries(&self) -> Vec<ProductFragment> {
        let now = Utc::now();
        let mut entries = self.entries.write();
        entries.retain(|fragment| {
            now.signed_duration_since(fragment.created_at)
                .to_std()
                // A future timestamp means clock skew; keep the entry.
                .map_or(true, |age| age < self.ttl)
        });
        entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
