//! In-process shard cluster.
//!
//! One [`MemoryCluster`] plays the role of the whole database deployment: a
//! fixed set of inventory/member shards, the central `Sold_Items` category
//! aggregate, and the disposable fragment cache. Every collection sits behind
//! its own lock, and every read-then-write the services need is exposed as a
//! single locked primitive so concurrent callers cannot lose updates.
//!
//! All shards living in one process is exactly the "single cluster"
//! deployment the cross-shard sale commit requires; the transaction latch in
//! this module is the multi-document commit primitive the sale coordinator
//! builds on.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::config::StoreConfig;
use crate::domain::{
    CategorySales, Member, MemberId, Product, ProductId, ProductSales, Receipt, ShardId, Stock,
    Supplier, SupplierId, TransactionId,
};
use crate::error::{Error, Result};

use super::cache::FragmentCache;

/// Warehouse location stamped on new stock records.
const DEFAULT_STOCK_LOCATION: &str = "main_warehouse";

/// Contact stamped on suppliers created lazily by product ingestion.
const DEFAULT_SUPPLIER_CONTACT: &str = "default@supplier.com";

/// Outcome of a conditional stock decrement.
#[derive(Debug, Clone)]
pub(crate) enum StockUpdate {
    /// The decrement applied; carries the post-update document.
    Applied(Stock),
    /// Nothing matched: fewer units on hand than requested (missing stock
    /// rows count as zero on hand).
    Insufficient { available: u32 },
}

/// Which unique key an attempted member insert collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemberConflict {
    Email,
    Phone,
}

/// How a sold-item aggregate write changed the central collection, recorded
/// so a rollback can undo exactly what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AggregateWrite {
    /// An existing per-product counter was incremented.
    Incremented,
    /// The category existed; a new product entry was appended.
    AppendedProduct,
    /// The category document itself was created.
    CreatedCategory,
}

/// One logical shard: its five collections plus instrumentation.
#[derive(Debug, Default)]
pub struct Shard {
    products: RwLock<HashMap<ProductId, Product>>,
    stock: RwLock<HashMap<ProductId, Stock>>,
    suppliers: RwLock<HashMap<SupplierId, Supplier>>,
    members: RwLock<HashMap<MemberId, Member>>,
    transactions: RwLock<HashMap<TransactionId, Receipt>>,
    /// Times this shard was resolved for an operation; lets tests verify
    /// partition pruning.
    accesses: AtomicU64,
    /// Fault injection: an offline shard fails resolution with a connection
    /// error.
    offline: AtomicBool,
}

impl Shard {
    // --- suppliers ---

    /// Case-insensitive supplier lookup by name.
    pub(crate) fn find_supplier(&self, name: &str) -> Option<Supplier> {
        self.suppliers
            .read()
            .values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Find a supplier by name or insert one, atomically under the write
    /// lock. The insert keeps the caller's casing.
    pub(crate) fn find_or_create_supplier(&self, name: &str) -> Supplier {
        let mut suppliers = self.suppliers.write();
        if let Some(existing) = suppliers
            .values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
        {
            return existing.clone();
        }
        let supplier = Supplier {
            id: SupplierId::generate(),
            name: name.to_string(),
            contact_email: DEFAULT_SUPPLIER_CONTACT.to_string(),
        };
        suppliers.insert(supplier.id, supplier.clone());
        supplier
    }

    pub(crate) fn supplier_by_id(&self, id: SupplierId) -> Option<Supplier> {
        self.suppliers.read().get(&id).cloned()
    }

    // --- products & stock ---

    pub(crate) fn get_product(&self, id: ProductId) -> Option<Product> {
        self.products.read().get(&id).cloned()
    }

    /// Case-insensitive product lookup by name within one supplier.
    pub(crate) fn find_product_by_name_and_supplier(
        &self,
        name: &str,
        supplier_id: SupplierId,
    ) -> Option<Product> {
        self.products
            .read()
            .values()
            .find(|p| p.supplier_id == supplier_id && p.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Insert a product and its paired stock record as one unit, after a
    /// duplicate check on (name, supplier). Holds both collection locks for
    /// the whole check-then-insert so a concurrent identical insert cannot
    /// slip between the steps, and a failed check writes nothing.
    ///
    /// Returns `false` on duplicate.
    pub(crate) fn insert_product_with_stock(&self, product: Product, initial_stock: u32) -> bool {
        let mut products = self.products.write();
        let mut stock = self.stock.write();
        let duplicate = products.values().any(|p| {
            p.supplier_id == product.supplier_id && p.name.eq_ignore_ascii_case(&product.name)
        });
        if duplicate {
            return false;
        }
        stock.insert(
            product.id,
            Stock {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity: initial_stock,
                location: DEFAULT_STOCK_LOCATION.to_string(),
                last_updated: Utc::now(),
            },
        );
        products.insert(product.id, product);
        true
    }

    /// Snapshot of every product on the shard, in creation order.
    pub(crate) fn products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.read().values().cloned().collect();
        products.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        products
    }

    pub(crate) fn stock_for(&self, product_id: ProductId) -> Option<Stock> {
        self.stock.read().get(&product_id).cloned()
    }

    /// Unconditionally add units to a product's stock and bump its
    /// `last_updated`. Returns the post-update document, or `None` when the
    /// product has no stock record on this shard.
    pub(crate) fn increment_stock(&self, product_id: ProductId, amount: u32) -> Option<Stock> {
        let mut stock = self.stock.write();
        let record = stock.get_mut(&product_id)?;
        record.quantity += amount;
        record.last_updated = Utc::now();
        Some(record.clone())
    }

    /// Decrement stock only if at least `quantity` units are on hand: one
    /// conditional update under the write lock, the primitive that keeps the
    /// quantity invariant under concurrent sales.
    pub(crate) fn decrement_stock_if_available(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> StockUpdate {
        let mut stock = self.stock.write();
        match stock.get_mut(&product_id) {
            Some(record) if record.quantity >= quantity => {
                record.quantity -= quantity;
                record.last_updated = Utc::now();
                StockUpdate::Applied(record.clone())
            }
            Some(record) => StockUpdate::Insufficient {
                available: record.quantity,
            },
            None => StockUpdate::Insufficient { available: 0 },
        }
    }

    // --- members ---

    /// Insert a member after checking email and phone uniqueness on this
    /// shard, all under the write lock.
    pub(crate) fn insert_member(
        &self,
        member: Member,
    ) -> std::result::Result<(), MemberConflict> {
        let mut members = self.members.write();
        for existing in members.values() {
            if existing.email.eq_ignore_ascii_case(&member.email) {
                return Err(MemberConflict::Email);
            }
            if existing.phone == member.phone {
                return Err(MemberConflict::Phone);
            }
        }
        members.insert(member.id, member);
        Ok(())
    }

    pub(crate) fn find_member_by_email(&self, email: &str) -> Option<Member> {
        self.members
            .read()
            .values()
            .find(|m| m.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub(crate) fn find_member_by_phone(&self, phone: &str) -> Option<Member> {
        self.members
            .read()
            .values()
            .find(|m| m.phone == phone)
            .cloned()
    }

    /// Add loyalty points to a member. Returns the post-update document.
    pub(crate) fn credit_points(&self, member_id: MemberId, points: u64) -> Option<Member> {
        let mut members = self.members.write();
        let member = members.get_mut(&member_id)?;
        member.points += points;
        Some(member.clone())
    }

    /// Remove loyalty points; the compensating action for a rolled-back sale.
    pub(crate) fn debit_points(&self, member_id: MemberId, points: u64) {
        if let Some(member) = self.members.write().get_mut(&member_id) {
            member.points = member.points.saturating_sub(points);
        }
    }

    // --- receipts ---

    pub(crate) fn insert_receipt(&self, receipt: Receipt) {
        self.transactions.write().insert(receipt.id, receipt);
    }

    pub(crate) fn delete_receipt(&self, id: TransactionId) -> bool {
        self.transactions.write().remove(&id).is_some()
    }

    pub(crate) fn get_receipt(&self, id: TransactionId) -> Option<Receipt> {
        self.transactions.read().get(&id).cloned()
    }

    fn receipt_count(&self) -> usize {
        self.transactions.read().len()
    }
}

/// The whole sharded deployment, in process.
#[derive(Debug)]
pub struct MemoryCluster {
    shards: Vec<Shard>,
    /// Central `Sold_Items` collection: one document per category.
    sold_items: RwLock<Vec<CategorySales>>,
    fragments: FragmentCache,
    /// Serializes multi-shard sale transactions; held for the whole
    /// write-or-rollback span.
    txn_latch: Mutex<()>,
}

impl MemoryCluster {
    pub fn new(config: &StoreConfig) -> Self {
        let shards = (0..config.shard_count).map(|_| Shard::default()).collect();
        Self {
            shards,
            sold_items: RwLock::new(Vec::new()),
            fragments: FragmentCache::new(Duration::from_secs(config.fragment_ttl_secs)),
            txn_latch: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn shard_count(&self) -> u16 {
        self.shards.len() as u16
    }

    /// Resolve a shard id to its collection set.
    ///
    /// Fails with a connection error when the id is out of range or the shard
    /// is offline; the caller must abort its in-progress operation. Each
    /// successful resolution counts one access against the shard.
    pub(crate) fn shard(&self, id: ShardId) -> Result<&Shard> {
        let shard = self.shards.get(id.index()).ok_or_else(|| Error::Connection {
            shard: id,
            reason: format!("no such shard (cluster has {})", self.shards.len()),
        })?;
        if shard.offline.load(Ordering::Acquire) {
            return Err(Error::Connection {
                shard: id,
                reason: "shard is offline".into(),
            });
        }
        shard.accesses.fetch_add(1, Ordering::Relaxed);
        Ok(shard)
    }

    /// Shard access for compensating actions only: a rollback must land even
    /// on a shard flagged offline after its forward write succeeded.
    pub(crate) fn shard_for_rollback(&self, id: ShardId) -> Option<&Shard> {
        self.shards.get(id.index())
    }

    /// The disposable fragment cache.
    #[must_use]
    pub fn fragments(&self) -> &FragmentCache {
        &self.fragments
    }

    /// Acquire the cluster-wide transaction latch.
    pub(crate) fn begin_txn(&self) -> MutexGuard<'_, ()> {
        self.txn_latch.lock()
    }

    // --- central Sold_Items aggregate ---

    /// Record units sold into the central aggregate with
    /// increment-existing-or-append semantics: an existing per-product entry
    /// is incremented in place; only when none matches is a new entry
    /// appended, upserting the category document itself if absent. A blind
    /// upsert here would duplicate product entries within a category.
    pub(crate) fn record_sold_item(
        &self,
        category: &str,
        product_name: &str,
        quantity: u64,
    ) -> AggregateWrite {
        let mut docs = self.sold_items.write();
        match docs.iter_mut().find(|d| d.category == category) {
            Some(doc) => {
                doc.total_sold += quantity;
                match doc.products_sold.iter_mut().find(|p| p.name == product_name) {
                    Some(entry) => {
                        entry.quantity_sold += quantity;
                        AggregateWrite::Incremented
                    }
                    None => {
                        doc.products_sold.push(ProductSales {
                            name: product_name.to_string(),
                            quantity_sold: quantity,
                        });
                        AggregateWrite::AppendedProduct
                    }
                }
            }
            None => {
                docs.push(CategorySales {
                    category: category.to_string(),
                    total_sold: quantity,
                    products_sold: vec![ProductSales {
                        name: product_name.to_string(),
                        quantity_sold: quantity,
                    }],
                });
                AggregateWrite::CreatedCategory
            }
        }
    }

    /// Undo one [`record_sold_item`](Self::record_sold_item) call, given what
    /// that call changed.
    pub(crate) fn rollback_sold_item(
        &self,
        category: &str,
        product_name: &str,
        quantity: u64,
        write: AggregateWrite,
    ) {
        let mut docs = self.sold_items.write();
        match write {
            AggregateWrite::CreatedCategory => {
                docs.retain(|d| d.category != category);
            }
            AggregateWrite::AppendedProduct => {
                if let Some(doc) = docs.iter_mut().find(|d| d.category == category) {
                    doc.total_sold = doc.total_sold.saturating_sub(quantity);
                    doc.products_sold.retain(|p| p.name != product_name);
                }
            }
            AggregateWrite::Incremented => {
                if let Some(doc) = docs.iter_mut().find(|d| d.category == category) {
                    doc.total_sold = doc.total_sold.saturating_sub(quantity);
                    if let Some(entry) =
                        doc.products_sold.iter_mut().find(|p| p.name == product_name)
                    {
                        entry.quantity_sold = entry.quantity_sold.saturating_sub(quantity);
                    }
                }
            }
        }
    }

    /// The aggregate document for one category, if any sales recorded it.
    pub fn category_sales(&self, category: &str) -> Option<CategorySales> {
        self.sold_items
            .read()
            .iter()
            .find(|d| d.category == category)
            .cloned()
    }

    // --- cluster-wide lookups & instrumentation ---

    /// Locate a receipt by scanning shards in shard order.
    pub fn find_receipt(&self, id: TransactionId) -> Option<(Receipt, ShardId)> {
        self.shards.iter().enumerate().find_map(|(index, shard)| {
            shard
                .get_receipt(id)
                .map(|receipt| (receipt, ShardId::new(index as u16)))
        })
    }

    /// Total receipts across all shards.
    pub fn receipt_count(&self) -> usize {
        self.shards.iter().map(Shard::receipt_count).sum()
    }

    /// On-hand quantity for a product on a given shard (missing stock rows
    /// count as zero).
    pub fn stock_quantity(&self, shard_id: ShardId, product_id: ProductId) -> Result<u32> {
        Ok(self
            .shard(shard_id)?
            .stock_for(product_id)
            .map_or(0, |s| s.quantity))
    }

    /// How many operations resolved the given shard. Out-of-range ids report
    /// zero.
    pub fn access_count(&self, id: ShardId) -> u64 {
        self.shards
            .get(id.index())
            .map_or(0, |s| s.accesses.load(Ordering::Relaxed))
    }

    /// Fault injection: mark a shard unreachable (or reachable again).
    pub fn set_offline(&self, id: ShardId, offline: bool) {
        if let Some(shard) = self.shards.get(id.index()) {
            shard.offline.store(offline, Ordering::Release);
        }
    }
}
