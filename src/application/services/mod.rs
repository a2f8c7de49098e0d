//! Application services
//!
//! Orchestrate domain entities against storage and the event bus.

pub mod booking;
pub mod payment;
pub mod slot_release;
pub mod slots;

pub use booking::BookingService;
pub use payment::PaymentService;
pub use slot_release::{release_no_shows, start_slot_release_task};
pub use slots::{seed_default_slots, SlotService};
