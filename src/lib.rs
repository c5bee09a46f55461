//! Shardtill - sharded point-of-sale inventory core.
//!
//! This crate implements the consistency layer of a small retail system whose
//! inventory, members, and sales are fragmented across a fixed set of logical
//! database shards.
//!
//! # Architecture
//!
//! Three concerns build on top of a deterministic shard router:
//!
//! - **Routing** - a product's category (or a member's email domain) hashes to
//!   exactly one shard, so single-entity commands touch one shard only.
//! - **Scatter-gather** - product queries fan out to every shard that can hold
//!   a match, join products with stock and suppliers per shard, and merge the
//!   results into a disposable TTL'd fragment cache.
//! - **Cross-shard sales** - recording a sale decrements stock on each item's
//!   shard, updates a central per-category aggregate, writes a receipt, and
//!   credits loyalty points, all-or-nothing via a compensating undo log.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Plain types: products, stock, members, receipts, fragments
//! - [`error`] - Error taxonomy for the crate
//! - [`routing`] - Category and email shard routing
//! - [`store`] - The in-process shard cluster and fragment cache
//! - [`service`] - Inventory commands, queries, member directory, sales
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rust_decimal_macros::dec;
//! use shardtill::config::StoreConfig;
//! use shardtill::routing::ShardRouter;
//! use shardtill::service::{InventoryService, NewProduct};
//! use shardtill::store::MemoryCluster;
//!
//! let config = StoreConfig::default();
//! let cluster = Arc::new(MemoryCluster::new(&config));
//! let router = ShardRouter::new(config.shard_count);
//!
//! let inventory = InventoryService::new(Arc::clone(&cluster), router);
//! let id = inventory
//!     .add_product(NewProduct {
//!         name: "Milk".into(),
//!         price: dec!(50),
//!         category: "Dairy Products".into(),
//!         supplier_name: "Pran".into(),
//!         initial_stock: 20,
//!     })
//!     .unwrap();
//!
//! let shard = router.shard_for_category("Dairy Products");
//! assert_eq!(cluster.stock_quantity(shard, id).unwrap(), 20);
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod routing;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{Error, Result};
