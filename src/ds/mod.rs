pub mod recency_list;
pub(crate) mod slot_arena;

pub use recency_list::{RecencyIter, RecencyList};
pub use slot_arena::SlotId;
