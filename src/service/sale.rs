//! The sale transaction coordinator.
//!
//! Recording a sale is the one operation that writes to several shards at
//! once: stock decrements on each item's shard, the central category
//! aggregate, the receipt on the first item's shard, and loyalty points on
//! the member's shard. All of it commits or none of it does. The coordinator
//! serializes on the cluster transaction latch and records a compensation for
//! every forward write; any failure rolls the log back before the latch
//! releases, so no partial sale is ever left behind.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::{
    normalize_category, CartLine, MemberRef, Receipt, ReceiptLine, TransactionId,
};
use crate::error::{Error, NotFoundError, Result, ValidationError};
use crate::store::txn::{Undo, UndoLog};
use crate::store::{MemoryCluster, StockUpdate};

#[derive(Clone)]
pub struct SaleCoordinator {
    cluster: Arc<MemoryCluster>,
}

impl SaleCoordinator {
    pub fn new(cluster: Arc<MemoryCluster>) -> Self {
        Self { cluster }
    }

    /// Record a sale as one atomic unit across every shard it touches.
    ///
    /// The cart's shard ids come from product fragments; a stale or forged id
    /// surfaces as a not-found error rather than being silently re-routed.
    /// The discount is caller-supplied and trusted (the loyalty-threshold
    /// rule lives in the calling layer). The receipt lands on the shard of
    /// the cart's first item.
    ///
    /// Returns the receipt id on success. On any failure every write already
    /// performed - stock decrements, aggregate updates, the receipt, loyalty
    /// points - is rolled back before this method returns.
    pub fn record_sale(
        &self,
        member: Option<MemberRef>,
        cart: &[CartLine],
        discount: Decimal,
    ) -> Result<TransactionId> {
        // Boundary validation: reject before any write.
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        if let Some(line) = cart.iter().find(|line| line.quantity == 0) {
            return Err(ValidationError::ZeroQuantity {
                product_id: line.product_id,
            }
            .into());
        }
        if discount < Decimal::ZERO {
            return Err(ValidationError::NegativeDiscount { discount }.into());
        }

        let _latch = self.cluster.begin_txn();
        let mut undo = UndoLog::new();

        match self.apply(member, cart, discount, &mut undo) {
            Ok(receipt_id) => {
                undo.commit();
                info!(%receipt_id, lines = cart.len(), "sale committed");
                Ok(receipt_id)
            }
            Err(err) => {
                warn!(error = %err, "sale aborted, rolling back");
                undo.rollback(&self.cluster);
                Err(err)
            }
        }
    }

    fn apply(
        &self,
        member: Option<MemberRef>,
        cart: &[CartLine],
        discount: Decimal,
        undo: &mut UndoLog,
    ) -> Result<TransactionId> {
        let mut subtotal = Decimal::ZERO;
        let mut items = Vec::with_capacity(cart.len());

        for line in cart {
            let shard = self.cluster.shard(line.shard_id)?;

            let product =
                shard
                    .get_product(line.product_id)
                    .ok_or(NotFoundError::Product {
                        id: line.product_id,
                        shard: line.shard_id,
                    })?;
            let price = product.price.coerce();
            let category = normalize_category(&product.category);

            subtotal += price * Decimal::from(line.quantity);

            match shard.decrement_stock_if_available(line.product_id, line.quantity) {
                StockUpdate::Applied(_) => undo.push(Undo::Restock {
                    shard: line.shard_id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                }),
                StockUpdate::Insufficient { available } => {
                    return Err(Error::OutOfStock {
                        product: product.name,
                        shard: line.shard_id,
                        requested: line.quantity,
                        available,
                    });
                }
            }

            let write =
                self.cluster
                    .record_sold_item(&category, &product.name, u64::from(line.quantity));
            undo.push(Undo::UnrecordSoldItem {
                category: category.clone(),
                product_name: product.name.clone(),
                quantity: u64::from(line.quantity),
                write,
            });

            items.push(ReceiptLine {
                product_id: line.product_id,
                shard_id: line.shard_id,
                name: product.name,
                category,
                price_at_sale: price,
                quantity_sold: line.quantity,
            });
        }

        let total = subtotal - discount;

        let receipt = Receipt {
            id: TransactionId::generate(),
            timestamp: Utc::now(),
            subtotal,
            discount_applied: discount,
            total_amount: total,
            member_id: member.map(|m| m.member_id),
            items,
        };
        let receipt_id = receipt.id;

        // Receipt placement rule: the shard of the cart's first item.
        let receipt_shard = cart[0].shard_id;
        self.cluster.shard(receipt_shard)?.insert_receipt(receipt);
        undo.push(Undo::DeleteReceipt {
            shard: receipt_shard,
            id: receipt_id,
        });

        if let Some(member) = member {
            let points = points_for_total(total);
            if points > 0 {
                let shard = self.cluster.shard(member.shard_id)?;
                shard
                    .credit_points(member.member_id, points)
                    .ok_or(NotFoundError::Member {
                        id: member.member_id,
                        shard: member.shard_id,
                    })?;
                undo.push(Undo::DebitPoints {
                    shard: member.shard_id,
                    member_id: member.member_id,
                    points,
                });
            }
        }

        Ok(receipt_id)
    }
}

/// Loyalty points earned on a sale: the final total rounded down, never
/// negative.
fn points_for_total(total: Decimal) -> u64 {
    total
        .floor()
        .to_i64()
        .unwrap_or(0)
        .max(0)
        .unsigned_abs()
}
