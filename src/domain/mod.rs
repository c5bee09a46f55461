//! Store-agnostic domain types.

mod filter;
mod fragment;
mod id;
mod member;
mod product;
mod sale;

pub use filter::ProductFilter;
pub use fragment::{ProductFragment, SUPPLIER_FALLBACK};
pub use id::{MemberId, ProductId, ShardId, SupplierId, TransactionId};
pub use member::{Member, MemberHit, MemberRef};
pub use product::{normalize_category, PriceField, Product, Stock, Supplier, UNCATEGORIZED};
pub use sale::{CartLine, CategorySales, ProductSales, Receipt, ReceiptLine};
