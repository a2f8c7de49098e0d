pub mod dto;
pub mod handlers;

pub use dto::{PricingInfoDto, RecordPaymentRequest};
pub use handlers::{get_pricing_info, record_payment, PaymentAppState};
