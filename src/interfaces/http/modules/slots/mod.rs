pub mod dto;
pub mod handlers;

pub use dto::SlotDto;
pub use handlers::{get_slot, list_available_slots, list_slots, SlotAppState};
