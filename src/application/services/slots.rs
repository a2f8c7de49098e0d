//! Slot registry queries and seeding

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, PlaceType, Slot};
use crate::infrastructure::Storage;

/// Read-side service over the slot registry
pub struct SlotService {
    storage: Arc<dyn Storage>,
}

impl SlotService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn get_slot(&self, slot_id: &str) -> DomainResult<Slot> {
        self.storage
            .get_slot(slot_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Slot",
                id: slot_id.to_string(),
            })
    }

    pub async fn list_slots(&self) -> DomainResult<Vec<Slot>> {
        let mut slots = self.storage.list_slots().await?;
        slots.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(slots)
    }

    pub async fn list_available(&self) -> DomainResult<Vec<Slot>> {
        let mut slots = self.storage.list_slots().await?;
        slots.retain(|s| s.is_available);
        slots.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(slots)
    }
}

/// Populate the registry with the default slot layout on first boot.
///
/// A non-empty registry is left untouched, so restarting never resets
/// availability. Returns the number of slots created.
pub async fn seed_default_slots(storage: &Arc<dyn Storage>) -> DomainResult<usize> {
    if !storage.list_slots().await?.is_empty() {
        info!("Slot registry already populated, skipping seed");
        return Ok(0);
    }

    let sections: &[(&str, PlaceType)] = &[
        ("A", PlaceType::ShoppingMall),
        ("B", PlaceType::OfficeComplex),
    ];

    let mut created = 0usize;
    for (section, place_type) in sections {
        for number in 1..=5 {
            let slot = Slot::new(format!("{section}{number}"))
                .with_location("Hyderabad", "Madhapur", place_type.clone())
                .with_section(*section);
            storage.save_slot(slot).await?;
            created += 1;
        }
    }

    info!(created, "🌱 Seeded default slot registry");
    Ok(created)
}

// ── Tests ──────────────────────────────────────────────────────
