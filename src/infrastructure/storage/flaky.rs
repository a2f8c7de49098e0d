//! Fault-injecting storage wrapper for tests
//!
//! Wraps `InMemoryStorage` and fails a configurable number of calls to
//! selected operations with a transient error, so retry behavior can be
//! exercised deterministically.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{InMemoryStorage, Storage};
use crate::domain::{Booking, DomainError, DomainResult, Slot};

pub(crate) struct FlakyStorage {
    inner: InMemoryStorage,
    get_booking_failures: AtomicU32,
    release_slot_failures: AtomicU32,
}

impl FlakyStorage {
    pub(crate) fn new() -> Self {
        Self {
            inner: InMemoryStorage::new(),
            get_booking_failures: AtomicU32::new(0),
            release_slot_failures: AtomicU32::new(0),
        }
    }

    /// Fail the next `n` calls to `get_booking`.
    pub(crate) fn fail_next_get_booking(&self, n: u32) {
        self.get_booking_failures.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` calls to `release_slot`.
    pub(crate) fn fail_next_release_slot(&self, n: u32) {
        self.release_slot_failures.store(n, Ordering::SeqCst);
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn save_slot(&self, slot: Slot) -> DomainResult<()> {
        self.inner.save_slot(slot).await
    }

    async fn get_slot(&self, id: &str) -> DomainResult<Option<Slot>> {
        self.inner.get_slot(id).await
    }

    async fn list_slots(&self) -> DomainResult<Vec<Slot>> {
        self.inner.list_slots().await
    }

    async fn reserve_slot(&self, id: &str) -> DomainResult<()> {
        self.inner.reserve_slot(id).await
    }

    async fn release_slot(&self, id: &str) -> DomainResult<bool> {
        if Self::take_failure(&self.release_slot_failures) {
            return Err(DomainError::Storage("injected outage".into()));
        }
        self.inner.release_slot(id).await
    }

    async fn save_booking(&self, booking: Booking) -> DomainResult<()> {
        self.inner.save_booking(booking).await
    }

    async fn get_booking(&self, id: &str) -> DomainResult<Option<Booking>> {
        if Self::take_failure(&self.get_booking_failures) {
            return Err(DomainError::Storage("injected outage".into()));
        }
        self.inner.get_booking(id).await
    }

    async fn update_booking(&self, booking: Booking) -> DomainResult<Booking> {
        self.inner.update_booking(booking).await
    }

    async fn list_bookings(&self) -> DomainResult<Vec<Booking>> {
        self.inner.list_bookings().await
    }

    async fn list_bookings_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        self.inner.list_bookings_for_user(user_id).await
    }

    async fn find_no_shows(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        self.inner.find_no_shows(now).await
    }
}
