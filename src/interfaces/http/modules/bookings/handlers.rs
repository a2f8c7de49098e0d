//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::application::BookingService;
use crate::interfaces::http::common::{domain_error, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub booking_service: Arc<BookingService>,
}

/// Query filter for the booking list
#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub user_id: Option<String>,
}

fn parse_rfc3339(
    field: &str,
    value: &str,
) -> Result<DateTime<Utc>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!("Invalid {}: {}", field, e))),
            )
        })
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created, slot reserved", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Slot already reserved")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let start_time = parse_rfc3339("start_time", &request.start_time)?;
    let end_time = parse_rfc3339("end_time", &request.end_time)?;

    let booking = state
        .booking_service
        .create(
            &request.user_id,
            &request.slot_id,
            &request.vehicle_number,
            start_time,
            end_time,
        )
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(("user_id" = Option<String>, Query, description = "Filter by user")),
    responses(
        (status = 200, description = "Bookings", body = ApiResponse<Vec<BookingDto>>)
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, (StatusCode, Json<ApiResponse<Vec<BookingDto>>>)>
{
    let bookings = match query.user_id {
        Some(user_id) => state.booking_service.list_for_user(&user_id).await,
        None => state.booking_service.list().await,
    }
    .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .booking_service
        .get(&booking_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/check-in",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Vehicle checked in", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking closed or not scheduled")
    )
)]
pub async fn check_in(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .booking_service
        .check_in(&booking_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/check-out",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Vehicle checked out, fee computed", body = ApiResponse<CheckOutResponse>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Vehicle was never checked in")
    )
)]
pub async fn check_out(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<CheckOutResponse>>, (StatusCode, Json<ApiResponse<CheckOutResponse>>)>
{
    let (booking, fee) = state
        .booking_service
        .check_out(&booking_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(CheckOutResponse {
        booking: BookingDto::from(booking),
        fee: FeeDto::from(fee),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/cancel",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled, slot released", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already closed or checked in")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .booking_service
        .cancel(&booking_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}
