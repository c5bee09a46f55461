//! Application services: the operations the UI layer calls.

mod inventory;
mod member;
mod query;
mod sale;

pub use inventory::{InventoryService, NewProduct};
pub use member::MemberDirectory;
pub use query::ProductQueryService;
pub use sale::SaleCoordinator;
