//! Booking DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Booking, FeeDetails, Payment};

/// Request to create a booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,
    /// Slot number to reserve, e.g. "A1"
    #[validate(length(min = 1, max = 16))]
    pub slot_id: String,
    #[validate(length(min = 1, max = 20))]
    pub vehicle_number: String,
    /// Requested window start (ISO 8601)
    pub start_time: String,
    /// Requested window end (ISO 8601)
    pub end_time: String,
}

/// Payment details embedded in a booking
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDto {
    pub amount_cents: i64,
    /// Amount in major units, e.g. "20.00"
    pub amount: String,
    pub method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub paid_at: Option<String>,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            amount_cents: p.amount_cents,
            amount: format!("{}.{:02}", p.amount_cents / 100, p.amount_cents % 100),
            method: p.method.as_str().to_string(),
            status: p.status.as_str().to_string(),
            transaction_id: p.transaction_id,
            paid_at: p.paid_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Booking details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub user_id: String,
    pub slot_id: String,
    pub vehicle_number: String,
    pub start_time: String,
    pub end_time: String,
    pub actual_entry_time: Option<String>,
    pub actual_exit_time: Option<String>,
    pub actual_duration_minutes: Option<i64>,
    pub parking_status: String,
    pub status: String,
    pub payment: PaymentDto,
    pub created_at: String,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            slot_id: b.slot_id,
            vehicle_number: b.vehicle_number,
            start_time: b.start_time.to_rfc3339(),
            end_time: b.end_time.to_rfc3339(),
            actual_entry_time: b.actual_entry_time.map(|t| t.to_rfc3339()),
            actual_exit_time: b.actual_exit_time.map(|t| t.to_rfc3339()),
            actual_duration_minutes: b.actual_duration_minutes,
            parking_status: b.parking_status.as_str().to_string(),
            status: b.status.as_str().to_string(),
            payment: PaymentDto::from(b.payment),
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

/// Fee breakdown returned at check-out
#[derive(Debug, Serialize, ToSchema)]
pub struct FeeDto {
    pub actual_duration_minutes: i64,
    pub rounded_duration_minutes: i64,
    pub fee_cents: i64,
    /// Fee in major units, e.g. "20.00"
    pub fee: String,
}

impl From<FeeDetails> for FeeDto {
    fn from(d: FeeDetails) -> Self {
        let fee = d.format_fee();
        Self {
            actual_duration_minutes: d.actual_duration_minutes,
            rounded_duration_minutes: d.rounded_duration_minutes,
            fee_cents: d.fee_cents,
            fee,
        }
    }
}

/// Response from checking a vehicle out
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckOutResponse {
    pub booking: BookingDto,
    pub fee: FeeDto,
}
