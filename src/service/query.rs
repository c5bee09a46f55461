//! Scatter-gather product queries.
//!
//! A query fans out over every shard that can hold a match, joins each
//! shard's products with stock and suppliers, merges the per-shard results in
//! shard order, and replaces the disposable fragment cache with the merged
//! list. The caller gets the in-memory list back whatever happens to the
//! cache.

use std::sync::{Arc, Once};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::{ProductFilter, ProductFragment, ShardId, SUPPLIER_FALLBACK};
use crate::error::Result;
use crate::routing::ShardRouter;
use crate::store::{MemoryCluster, Shard};

/// Scatter-gather query engine over the cluster's product data.
#[derive(Clone)]
pub struct ProductQueryService {
    cluster: Arc<MemoryCluster>,
    router: ShardRouter,
    ttl_init: Arc<Once>,
}

impl ProductQueryService {
    pub fn new(cluster: Arc<MemoryCluster>, router: ShardRouter) -> Self {
        Self {
            cluster,
            router,
            ttl_init: Arc::new(Once::new()),
        }
    }

    /// Query products across all shards and materialize the results into the
    /// fragment cache.
    ///
    /// When a category filter is present, shards the category does not hash
    /// to are skipped without a read: a category lives on exactly one shard,
    /// so the router prunes the scatter down to it. A shard that cannot be
    /// reached contributes zero results instead of failing the whole query;
    /// the cache is disposable and the caller's list is what counts.
    pub fn query_products(&self, filter: &ProductFilter) -> Result<Vec<ProductFragment>> {
        self.ensure_fragment_ttl();

        let mut gathered: Vec<ProductFragment> = Vec::new();

        // Scatter phase, in shard order.
        for shard_id in self.router.all() {
            if let Some(category) = &filter.category {
                if self.router.shard_for_category(category) != shard_id {
                    debug!(%shard_id, %category, "skipping shard: category lives elsewhere");
                    continue;
                }
            }

            let shard = match self.cluster.shard(shard_id) {
                Ok(shard) => shard,
                Err(err) => {
                    warn!(%shard_id, error = %err, "shard unreachable, contributing zero results");
                    continue;
                }
            };

            let shard_fragments = collect_fragments(shard, shard_id, filter);
            debug!(%shard_id, matches = shard_fragments.len(), "scatter results");
            gathered.extend(shard_fragments);
        }

        // Gather phase: clear-then-insert into the cache. Not atomic with the
        // scatter; the returned list, not the cache, is authoritative.
        self.cluster.fragments().replace_all(&gathered);

        Ok(gathered)
    }

    /// Arm the fragment cache's expiry once per process lifetime. Idempotent;
    /// repeated calls are ignored, matching the create-if-absent index setup
    /// this stands in for.
    fn ensure_fragment_ttl(&self) {
        let ttl = self.cluster.fragments().ttl();
        self.ttl_init.call_once(|| {
            info!(ttl_secs = ttl.as_secs(), "fragment cache expiry armed");
        });
    }
}

/// Run the per-shard match-join-project pipeline.
fn collect_fragments(
    shard: &Shard,
    shard_id: ShardId,
    filter: &ProductFilter,
) -> Vec<ProductFragment> {
    let name_needle = filter.name.as_ref().map(|n| n.to_lowercase());
    let brand_needle = filter.brand.as_ref().map(|b| b.to_lowercase());

    let mut fragments = Vec::new();
    for product in shard.products() {
        if let Some(needle) = &name_needle {
            if !product.name.to_lowercase().contains(needle) {
                continue;
            }
        }
        if let Some(category) = &filter.category {
            if !product.category.eq_ignore_ascii_case(category.trim()) {
                continue;
            }
        }

        // Coerce before the price bounds: legacy string prices compare as
        // their parsed value, unparsable ones as zero.
        let price = product.price.coerce();
        if let Some(min) = filter.min_price {
            if price < min {
                continue;
            }
        }
        if let Some(max) = filter.max_price {
            if price > max {
                continue;
            }
        }

        let supplier = shard.supplier_by_id(product.supplier_id);
        if let Some(needle) = &brand_needle {
            let brand = supplier.as_ref().map(|s| s.name.to_lowercase());
            if !brand.is_some_and(|b| b.contains(needle)) {
                continue;
            }
        }

        // Join with stock; out-of-stock products are never returned.
        let Some(stock) = shard.stock_for(product.id) else {
            continue;
        };
        if stock.quantity == 0 {
            continue;
        }

        fragments.push(ProductFragment {
            product_id: product.id,
            name: product.name,
            price,
            category: product.category,
            quantity_in_stock: stock.quantity,
            supplier_name: supplier.map_or_else(|| SUPPLIER_FALLBACK.to_string(), |s| s.name),
            shard_id,
            created_at: Utc::now(),
        });
    }
    fragments
}
