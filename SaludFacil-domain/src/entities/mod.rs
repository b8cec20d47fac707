pub mod history;
pub mod slot;

pub use history::HistoryEvent;
pub use slot::{DoseSlot, SlotId};
