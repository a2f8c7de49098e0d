//! In-memory storage implementation
//!
//! Backs the storage trait with `DashMap`s. Per-entity atomicity comes
//! from the map's entry guards: `reserve_slot` checks and flips the
//! availability flag under one guard, and `update_booking` compares the
//! version and writes under one guard. No lock spans more than a single
//! entry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::Storage;
use crate::domain::{Booking, DomainError, DomainResult, Slot};

/// In-memory storage for development and testing
pub struct InMemoryStorage {
    slots: DashMap<String, Slot>,
    bookings: DashMap<String, Booking>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            bookings: DashMap::new(),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_slot(&self, slot: Slot) -> DomainResult<()> {
        self.slots.insert(slot.id.clone(), slot);
        Ok(())
    }

    async fn get_slot(&self, id: &str) -> DomainResult<Option<Slot>> {
        Ok(self.slots.get(id).map(|s| s.clone()))
    }

    async fn list_slots(&self) -> DomainResult<Vec<Slot>> {
        let mut slots: Vec<Slot> = self.slots.iter().map(|e| e.value().clone()).collect();
        slots.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(slots)
    }

    async fn reserve_slot(&self, id: &str) -> DomainResult<()> {
        // get_mut holds the entry guard, making check-then-set indivisible
        let mut slot = self.slots.get_mut(id).ok_or_else(|| DomainError::NotFound {
            entity: "Slot",
            id: id.to_string(),
        })?;

        if !slot.is_available {
            return Err(DomainError::SlotUnavailable(id.to_string()));
        }
        slot.is_available = false;
        Ok(())
    }

    async fn release_slot(&self, id: &str) -> DomainResult<bool> {
        let mut slot = self.slots.get_mut(id).ok_or_else(|| DomainError::NotFound {
            entity: "Slot",
            id: id.to_string(),
        })?;

        if slot.is_available {
            return Ok(false);
        }
        slot.is_available = true;
        Ok(true)
    }

    async fn save_booking(&self, booking: Booking) -> DomainResult<()> {
        self.bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn get_booking(&self, id: &str) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(id).map(|b| b.clone()))
    }

    async fn update_booking(&self, booking: Booking) -> DomainResult<Booking> {
        let mut entry =
            self.bookings
                .get_mut(&booking.id)
                .ok_or_else(|| DomainError::NotFound {
                    entity: "Booking",
                    id: booking.id.clone(),
                })?;

        if entry.version != booking.version {
            return Err(DomainError::Conflict {
                entity: "Booking",
                id: booking.id.clone(),
            });
        }

        let mut updated = booking;
        updated.version += 1;
        *entry = updated.clone();
        Ok(updated)
    }

    async fn list_bookings(&self) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self.bookings.iter().map(|e| e.value().clone()).collect();
        bookings.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(bookings)
    }

    async fn list_bookings_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| b.clone())
            .collect())
    }

    async fn find_no_shows(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.is_no_show(now))
            .map(|b| b.clone())
            .collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────
