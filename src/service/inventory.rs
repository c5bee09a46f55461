//! Inventory commands: add-product and add-stock.
//!
//! Both commands touch exactly one shard, chosen by the product's category.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{normalize_category, PriceField, Product, ProductId, Stock};
use crate::error::{DuplicateError, NotFoundError, Result, ValidationError};
use crate::routing::ShardRouter;
use crate::store::MemoryCluster;

/// Input for [`InventoryService::add_product`].
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub supplier_name: String,
    pub initial_stock: u32,
}

/// Single-shard inventory command service.
#[derive(Clone)]
pub struct InventoryService {
    cluster: Arc<MemoryCluster>,
    router: ShardRouter,
}

impl InventoryService {
    pub fn new(cluster: Arc<MemoryCluster>, router: ShardRouter) -> Self {
        Self { cluster, router }
    }

    /// Add a product, its supplier (lazily), and its initial stock record to
    /// the shard its category hashes to.
    ///
    /// The supplier is found-or-created atomically; the duplicate check on
    /// (name, supplier) and the product+stock insert run as one unit on the
    /// shard, so a rejected duplicate writes nothing and no product can exist
    /// without its stock record.
    pub fn add_product(&self, new: NewProduct) -> Result<ProductId> {
        if new.name.trim().is_empty() {
            return Err(ValidationError::BlankProductName.into());
        }
        if new.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice { price: new.price }.into());
        }

        let category = normalize_category(&new.category);
        let shard_id = self.router.shard_for_category(&category);
        let shard = self.cluster.shard(shard_id)?;

        let supplier = shard.find_or_create_supplier(&new.supplier_name);

        let product = Product {
            id: ProductId::generate(),
            name: new.name.clone(),
            price: PriceField::from(new.price),
            category: category.clone(),
            supplier_id: supplier.id,
            created_at: Utc::now(),
        };
        let product_id = product.id;

        if !shard.insert_product_with_stock(product, new.initial_stock) {
            return Err(DuplicateError::Product {
                name: new.name,
                supplier: supplier.name,
                shard: shard_id,
            }
            .into());
        }

        info!(
            %product_id,
            shard = %shard_id,
            %category,
            stock = new.initial_stock,
            "added product"
        );
        Ok(product_id)
    }

    /// Add units to an existing product's stock on its category's shard,
    /// returning the post-update stock document.
    pub fn add_stock(
        &self,
        product_name: &str,
        supplier_name: &str,
        category: &str,
        amount: u32,
    ) -> Result<Stock> {
        if amount == 0 {
            return Err(ValidationError::ZeroStockAmount.into());
        }

        let shard_id = self.router.shard_for_category(category);
        let shard = self.cluster.shard(shard_id)?;

        let supplier = shard
            .find_supplier(supplier_name)
            .ok_or_else(|| NotFoundError::Supplier {
                name: supplier_name.to_string(),
                shard: shard_id,
            })?;
        let product = shard
            .find_product_by_name_and_supplier(product_name, supplier.id)
            .ok_or_else(|| NotFoundError::ProductByName {
                name: product_name.to_string(),
                supplier: supplier.name,
                shard: shard_id,
            })?;

        let stock = shard
            .increment_stock(product.id, amount)
            .ok_or(NotFoundError::Product {
                id: product.id,
                shard: shard_id,
            })?;

        info!(
            product_id = %product.id,
            shard = %shard_id,
            amount,
            quantity = stock.quantity,
            "added stock"
        );
        Ok(stock)
    }
}
