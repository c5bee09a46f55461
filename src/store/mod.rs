//! Storage: the in-process shard cluster, its fragment cache, and the
//! transaction undo log.

mod cache;
mod memory;
pub(crate) mod txn;

pub use cache::FragmentCache;
pub use memory::{MemoryCluster, Shard};

pub(crate) use memory::{AggregateWrite, MemberConflict, StockUpdate};
