//! Booking aggregate
//!
//! The booking entity with its dual-track state machine and the embedded
//! payment record.

pub mod model;

pub use model::{Booking, BookingStatus, ParkingStatus, Payment, PaymentMethod, PaymentStatus};
