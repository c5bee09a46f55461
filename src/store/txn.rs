//! Compensating undo log for multi-shard sale transactions.
//!
//! The sale coordinator serializes on the cluster's transaction latch and
//! records a compensation for every forward write. On failure the log runs in
//! reverse before the latch releases, restoring every shard and the central
//! aggregate. Stock and loyalty compensations are plain increments and
//! decrements, so they stay correct even if a non-transactional command
//! (say, an `add_stock`) lands between a write and its undo.

use tracing::warn;

use crate::domain::{MemberId, ProductId, ShardId, TransactionId};

use super::memory::{AggregateWrite, MemoryCluster};

/// One recorded compensation.
#[derive(Debug)]
pub(crate) enum Undo {
    /// Re-add units removed by a conditional stock decrement.
    Restock {
        shard: ShardId,
        product_id: ProductId,
        quantity: u32,
    },
    /// Reverse one central aggregate write.
    UnrecordSoldItem {
        category: String,
        product_name: String,
        quantity: u64,
        write: AggregateWrite,
    },
    /// Remove an inserted receipt.
    DeleteReceipt { shard: ShardId, id: TransactionId },
    /// Take back credited loyalty points.
    DebitPoints {
        shard: ShardId,
        member_id: MemberId,
        points: u64,
    },
}

/// Ordered record of everything a transaction has written so far.
#[derive(Debug, Default)]
pub(crate) struct UndoLog {
    entries: Vec<Undo>,
}

impl UndoLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, undo: Undo) {
        self.entries.push(undo);
    }

    /// Forget the recorded compensations; the transaction committed.
    pub(crate) fn commit(mut self) {
        self.entries.clear();
    }

    /// Apply every compensation in reverse order. Shard resolution bypasses
    /// the offline flag: a write that landed must be reversible even if its
    /// shard went dark afterwards.
    pub(crate) fn rollback(self, cluster: &MemoryCluster) {
        for undo in self.entries.into_iter().rev() {
            match undo {
                Undo::Restock {
                    shard,
                    product_id,
                    quantity,
                } => match cluster.shard_for_rollback(shard) {
                    Some(s) => {
                        s.increment_stock(product_id, quantity);
                    }
                    None => warn!(%shard, %product_id, "restock compensation lost: shard gone"),
                },
                Undo::UnrecordSoldItem {
                    category,
                    product_name,
                    quantity,
                    write,
                } => {
                    cluster.rollback_sold_item(&category, &product_name, quantity, write);
                }
                Undo::DeleteReceipt { shard, id } => match cluster.shard_for_rollback(shard) {
                    Some(s) => {
                        s.delete_receipt(id);
                    }
                    None => warn!(%shard, %id, "receipt compensation lost: shard gone"),
                },
                Undo::DebitPoints {
                    shard,
                    member_id,
                    points,
                } => match cluster.shard_for_rollback(shard) {
                    Some(s) => s.debit_points(member_id, points),
                    None => warn!(%shard, %member_id, "loyalty compensation lost: shard gone"),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::domain::{PriceField, Product, SupplierId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn rollback_reverses_stock_and_aggregate() {
        let cluster = MemoryCluster::new(&StoreConfig::default());
        let shard_id = ShardId::new(0);
        let shard = cluster.shard(shard_id).unwrap();
        let product = Product {
            id: ProductId::generate(),
            name: "Bread".into(),
            price: PriceField::from(dec!(30)),
            category: "Bakery".into(),
            supplier_id: SupplierId::generate(),
            created_at: Utc::now(),
        };
        shard.insert_product_with_stock(product.clone(), 10);

        let mut log = UndoLog::new();
        shard.decrement_stock_if_available(product.id, 4);
        log.push(Undo::Restock {
            shard: shard_id,
            product_id: product.id,
            quantity: 4,
        });
        let write = cluster.record_sold_item("Bakery", "Bread", 4);
        log.push(Undo::UnrecordSoldItem {
            category: "Bakery".into(),
            product_name: "Bread".into(),
            quantity: 4,
            write,
        });

        log.rollback(&cluster);

        assert_eq!(cluster.stock_quantity(shard_id, product.id).unwrap(), 10);
        assert!(cluster.category_sales("Bakery").is_none());
    }

    #[test]
    fn rollback_lands_on_offline_shards() {
        let cluster = MemoryCluster::new(&StoreConfig::default());
        let shard_id = ShardId::new(0);
        let shard = cluster.shard(shard_id).unwrap();
        let product = Product {
            id: ProductId::generate(),
            name: "Bread".into(),
            price: PriceField::from(dec!(30)),
            category: "Bakery".into(),
            supplier_id: SupplierId::generate(),
            created_at: Utc::now(),
        };
        shard.insert_product_with_stock(product.clone(), 10);
        shard.decrement_stock_if_available(product.id, 4);

        let mut log = UndoLog::new();
        log.push(Undo::Restock {
            shard: shard_id,
            product_id: product.id,
            quantity: 4,
        });

        cluster.set_offline(shard_id, true);
        log.rollback(&cluster);
        cluster.set_offline(shard_id, false);

        assert_eq!(cluster.stock_quantity(shard_id, product.id).unwrap(), 10);
    }
}
