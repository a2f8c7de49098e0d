//! Payment HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::PaymentService;
use crate::domain::{FeeCalculator, PaymentMethod};
use crate::interfaces::http::common::{domain_error, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::bookings::BookingDto;

use super::dto::*;

/// Application state for payment handlers.
#[derive(Clone)]
pub struct PaymentAppState {
    pub payment_service: Arc<PaymentService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/payment",
    tag = "Payments",
    params(("booking_id" = String, Path, description = "Booking ID")),
    request_body = RecordPaymentRequest,
    responses(
        (status = 200, description = "Payment recorded, booking completed", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking closed or not checked out"),
        (status = 422, description = "Amount does not match the computed fee")
    )
)]
pub async fn record_payment(
    State(state): State<PaymentAppState>,
    Path(booking_id): Path<String>,
    ValidatedJson(request): ValidatedJson<RecordPaymentRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let Some(method) = PaymentMethod::from_str(&request.method) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!(
                "Unknown payment method '{}'",
                request.method
            ))),
        ));
    };

    let booking = state
        .payment_service
        .record_payment(&booking_id, request.amount_cents, method)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

#[utoipa::path(
    get,
    path = "/api/v1/pricing",
    tag = "Payments",
    responses(
        (status = 200, description = "Pricing schedule", body = ApiResponse<PricingInfoDto>)
    )
)]
pub async fn get_pricing_info() -> Json<ApiResponse<PricingInfoDto>> {
    Json(ApiResponse::success(PricingInfoDto::from(
        FeeCalculator::pricing_info(),
    )))
}
