//! Parking slot domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of place the slot belongs to (display metadata, not core)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceType {
    ShoppingMall,
    Cinema,
    Hospital,
    MetroStation,
    Market,
    OfficeComplex,
    Restaurant,
    Airport,
    RailwayStation,
}

impl PlaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShoppingMall => "Shopping Mall",
            Self::Cinema => "Cinema",
            Self::Hospital => "Hospital",
            Self::MetroStation => "Metro Station",
            Self::Market => "Market",
            Self::OfficeComplex => "Office Complex",
            Self::Restaurant => "Restaurant",
            Self::Airport => "Airport",
            Self::RailwayStation => "Railway Station",
        }
    }
}

impl std::fmt::Display for PlaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical parking slot
///
/// `is_available` is the single reservation flag: it is `false` exactly
/// while one non-terminal booking holds the slot. It is mutated only via
/// the storage reserve/release operations; the location metadata is an
/// admin concern outside the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Unique slot number, e.g. "A1"
    pub id: String,
    /// Whether the slot is free to reserve
    pub is_available: bool,
    pub city: String,
    pub area: String,
    pub address: String,
    pub place_type: PlaceType,
    /// Section within the lot, e.g. "General"
    pub section: String,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_available: true,
            city: "Hyderabad".to_string(),
            area: "Madhapur".to_string(),
            address: "Smart Parking Complex".to_string(),
            place_type: PlaceType::ShoppingMall,
            section: "General".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn with_location(
        mut self,
        city: impl Into<String>,
        area: impl Into<String>,
        place_type: PlaceType,
    ) -> Self {
        self.city = city.into();
        self.area = area.into();
        self.place_type = place_type;
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slot_is_available() {
        let slot = Slot::new("A1");
        assert_eq!(slot.id, "A1");
        assert!(slot.is_available);
        assert_eq!(slot.section, "General");
    }

    #[test]
    fn with_location_overrides_defaults() {
        let slot = Slot::new("B2").with_location("Pune", "Hinjewadi", PlaceType::OfficeComplex);
        assert_eq!(slot.city, "Pune");
        assert_eq!(slot.area, "Hinjewadi");
        assert_eq!(slot.place_type, PlaceType::OfficeComplex);
    }

    #[test]
    fn place_type_display() {
        assert_eq!(PlaceType::ShoppingMall.to_string(), "Shopping Mall");
        assert_eq!(PlaceType::MetroStation.to_string(), "Metro Station");
    }
}
