mod chaining;
mod open;
mod traits;

pub use chaining::ChainingTable;
pub use open::{OpenAddressingTable, Slot};
pub use traits::CollisionTable;
