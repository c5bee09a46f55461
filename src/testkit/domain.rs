//! Builders for domain primitives used across tests.
//!
//! Concise factory functions so tests focus on assertions rather than
//! construction boilerplate.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{CartLine, PriceField, Product, ProductId, ShardId, SupplierId};
use crate::service::NewProduct;
use crate::store::MemoryCluster;

/// Build a [`NewProduct`] command.
pub fn new_product(
    name: &str,
    price: Decimal,
    category: &str,
    supplier: &str,
    initial_stock: u32,
) -> NewProduct {
    NewProduct {
        name: name.into(),
        price,
        category: category.into(),
        supplier_name: supplier.into(),
        initial_stock,
    }
}

/// Build a cart line.
pub fn line(product_id: ProductId, shard_id: ShardId, quantity: u32) -> CartLine {
    CartLine {
        product_id,
        shard_id,
        quantity,
    }
}

/// Seed a product with a legacy string-typed price directly onto a shard,
/// bypassing the inventory service. For exercising the price-coercion policy.
pub fn seed_legacy_product(
    cluster: &MemoryCluster,
    shard_id: ShardId,
    name: &str,
    raw_price: &str,
    category: &str,
    quantity: u32,
) -> ProductId {
    let shard = cluster
        .shard(shard_id)
        .expect("seeding requires a reachable shard");
    let supplier = shard.find_or_create_supplier("Legacy Imports");
    let product = Product {
        id: ProductId::generate(),
        name: name.into(),
        price: PriceField::Text(raw_price.into()),
        category: category.into(),
        supplier_id: supplier.id,
        created_at: Utc::now(),
    };
    let id = product.id;
    assert!(
        shard.insert_product_with_stock(product, quantity),
        "legacy seed collided with an existing product"
    );
    id
}

/// Seed a product whose supplier document is missing, for exercising the
/// supplier-name fallback in fragments.
pub fn seed_orphan_product(
    cluster: &MemoryCluster,
    shard_id: ShardId,
    name: &str,
    price: Decimal,
    category: &str,
    quantity: u32,
) -> ProductId {
    let shard = cluster
        .shard(shard_id)
        .expect("seeding requires a reachable shard");
    let product = Product {
        id: ProductId::generate(),
        name: name.into(),
        price: PriceField::from(price),
        category: category.into(),
        // Dangling reference: no supplier document with this id exists.
        supplier_id: SupplierId::generate(),
        created_at: Utc::now(),
    };
    let id = product.id;
    assert!(
        shard.insert_product_with_stock(product, quantity),
        "orphan seed collided with an existing product"
    );
    id
}
