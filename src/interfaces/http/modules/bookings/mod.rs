pub mod dto;
pub mod handlers;

pub use dto::{BookingDto, CheckOutResponse, CreateBookingRequest, FeeDto, PaymentDto};
pub use handlers::{
    cancel_booking, check_in, check_out, create_booking, get_booking, list_bookings,
    BookingAppState,
};
