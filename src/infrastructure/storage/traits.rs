//! Storage trait definitions
//!
//! Persistence sits behind this trait so the core can be backed by an
//! in-memory store in tests and development, or a database in
//! production. The two concurrency-sensitive contracts live here:
//!
//! - `reserve_slot` is an indivisible check-and-set on the availability
//!   flag; two racing reservations for one slot see exactly one success.
//! - `update_booking` is conditional on `booking.version` matching the
//!   stored version; the loser of a race gets `Conflict` and must
//!   re-read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Booking, DomainResult, Slot};

/// Storage trait for persistence operations
#[async_trait]
pub trait Storage: Send + Sync {
    // Slot operations
    async fn save_slot(&self, slot: Slot) -> DomainResult<()>;
    async fn get_slot(&self, id: &str) -> DomainResult<Option<Slot>>;
    async fn list_slots(&self) -> DomainResult<Vec<Slot>>;

    /// Atomically reserve a slot.
    ///
    /// Fails with `SlotUnavailable` if the flag is already false, or
    /// `NotFound` for an unknown slot. The check and the set are
    /// indivisible.
    async fn reserve_slot(&self, id: &str) -> DomainResult<()>;

    /// Release a slot back to available.
    ///
    /// Idempotent: releasing an already-available slot is a no-op.
    /// Returns whether the flag actually flipped, so callers emit
    /// availability events only on real transitions.
    async fn release_slot(&self, id: &str) -> DomainResult<bool>;

    // Booking operations
    async fn save_booking(&self, booking: Booking) -> DomainResult<()>;
    async fn get_booking(&self, id: &str) -> DomainResult<Option<Booking>>;

    /// Conditionally update a booking.
    ///
    /// Succeeds only if `booking.version` matches the stored version,
    /// then bumps it; returns the stored result. A mismatch yields
    /// `Conflict` without touching the record.
    async fn update_booking(&self, booking: Booking) -> DomainResult<Booking>;

    async fn list_bookings(&self) -> DomainResult<Vec<Booking>>;
    async fn list_bookings_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>>;

    /// Bookings whose window elapsed with no check-in recorded
    /// (status=BOOKED, parking=SCHEDULED, end_time < now).
    async fn find_no_shows(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>>;
}
