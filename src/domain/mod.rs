pub mod booking;
pub mod error;
pub mod pricing;
pub mod slot;

// Re-export commonly used types
pub use booking::{
    Booking, BookingStatus, ParkingStatus, Payment, PaymentMethod, PaymentStatus,
};
pub use error::{DomainError, DomainResult};
pub use pricing::{FeeCalculator, FeeDetails, PricingInfo};
pub use slot::{PlaceType, Slot};
