//! Slot HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::SlotService;
use crate::interfaces::http::common::{domain_error, ApiResponse};

use super::dto::SlotDto;

/// Application state for slot handlers.
#[derive(Clone)]
pub struct SlotAppState {
    pub slot_service: Arc<SlotService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/slots",
    tag = "Slots",
    responses(
        (status = 200, description = "All slots", body = ApiResponse<Vec<SlotDto>>)
    )
)]
pub async fn list_slots(
    State(state): State<SlotAppState>,
) -> Result<Json<ApiResponse<Vec<SlotDto>>>, (StatusCode, Json<ApiResponse<Vec<SlotDto>>>)> {
    let slots = state.slot_service.list_slots().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        slots.into_iter().map(SlotDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/slots/available",
    tag = "Slots",
    responses(
        (status = 200, description = "Slots free to reserve", body = ApiResponse<Vec<SlotDto>>)
    )
)]
pub async fn list_available_slots(
    State(state): State<SlotAppState>,
) -> Result<Json<ApiResponse<Vec<SlotDto>>>, (StatusCode, Json<ApiResponse<Vec<SlotDto>>>)> {
    let slots = state
        .slot_service
        .list_available()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        slots.into_iter().map(SlotDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/slots/{slot_id}",
    tag = "Slots",
    params(("slot_id" = String, Path, description = "Slot number")),
    responses(
        (status = 200, description = "Slot details", body = ApiResponse<SlotDto>),
        (status = 404, description = "Slot not found")
    )
)]
pub async fn get_slot(
    State(state): State<SlotAppState>,
    Path(slot_id): Path<String>,
) -> Result<Json<ApiResponse<SlotDto>>, (StatusCode, Json<ApiResponse<SlotDto>>)> {
    let slot = state
        .slot_service
        .get_slot(&slot_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(SlotDto::from(slot))))
}
