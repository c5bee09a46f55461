//! A wired-up cluster plus services, the canonical test setup.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::routing::ShardRouter;
use crate::service::{InventoryService, MemberDirectory, ProductQueryService, SaleCoordinator};
use crate::store::MemoryCluster;

/// Everything a test needs: one cluster and the four services over it.
pub struct Fixture {
    pub cluster: Arc<MemoryCluster>,
    pub router: ShardRouter,
    pub inventory: InventoryService,
    pub query: ProductQueryService,
    pub members: MemberDirectory,
    pub sales: SaleCoordinator,
}

impl Fixture {
    /// Default three-shard cluster.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let cluster = Arc::new(MemoryCluster::new(&config));
        let router = ShardRouter::new(config.shard_count);
        Self {
            inventory: InventoryService::new(Arc::clone(&cluster), router),
            query: ProductQueryService::new(Arc::clone(&cluster), router),
            members: MemberDirectory::new(Arc::clone(&cluster), router),
            sales: SaleCoordinator::new(Arc::clone(&cluster)),
            cluster,
            router,
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
