pub mod services;

pub use services::{BookingService, PaymentService, SlotService};
