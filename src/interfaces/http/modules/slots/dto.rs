//! Slot DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Slot;

/// Slot details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotDto {
    /// Slot number, e.g. "A1"
    pub id: String,
    pub is_available: bool,
    pub city: String,
    pub area: String,
    pub address: String,
    pub place_type: String,
    pub section: String,
    pub created_at: String,
}

impl From<Slot> for SlotDto {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id,
            is_available: slot.is_available,
            city: slot.city,
            area: slot.area,
            address: slot.address,
            place_type: slot.place_type.as_str().to_string(),
            section: slot.section,
            created_at: slot.created_at.to_rfc3339(),
        }
    }
}
