//! Payment DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::PricingInfo;

/// Request to record a payment against a checked-out booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    /// Amount in cents; must equal the fee computed at check-out
    #[validate(range(min = 0))]
    pub amount_cents: i64,
    /// One of "credit_card", "paypal", "upi", "none"
    #[validate(length(min = 1, max = 16))]
    pub method: String,
}

/// Static pricing schedule
#[derive(Debug, Serialize, ToSchema)]
pub struct PricingInfoDto {
    pub rate_per_hour_cents: i64,
    pub rate_per_15_min_cents: i64,
    pub minimum_charge_cents: i64,
    pub billing_interval: String,
}

impl From<PricingInfo> for PricingInfoDto {
    fn from(p: PricingInfo) -> Self {
        Self {
            rate_per_hour_cents: p.rate_per_hour_cents,
            rate_per_15_min_cents: p.rate_per_15_min_cents,
            minimum_charge_cents: p.minimum_charge_cents,
            billing_interval: p.billing_interval.to_string(),
        }
    }
}
