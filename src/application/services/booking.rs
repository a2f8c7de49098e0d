//! Booking lifecycle service
//!
//! Drives bookings through the dual-track state machine. Every
//! transition is a read-modify-conditional-write: load the booking,
//! apply the entity transition, and write back with the version check.
//! A lost version race triggers a bounded re-read, so a transition that
//! raced (e.g. a check-in against the no-show scheduler) is re-validated
//! against fresh state and fails with the proper business error.
//! Transient storage failures are retried with backoff at every
//! operation boundary; business errors surface immediately.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{Booking, DomainError, DomainResult, FeeCalculator, FeeDetails};
use crate::infrastructure::Storage;
use crate::notifications::{
    BookingCancelledEvent, BookingCheckedInEvent, BookingCheckedOutEvent, BookingCreatedEvent,
    Event, SharedEventBus, SlotAvailabilityChangedEvent,
};
use crate::shared::{retry_with_backoff, RetryConfig, SharedClock};

/// Bounded re-reads when a conditional update loses a version race.
const MAX_TRANSITION_ATTEMPTS: u32 = 3;

/// Service for booking operations
pub struct BookingService {
    storage: Arc<dyn Storage>,
    clock: SharedClock,
    fees: FeeCalculator,
    event_bus: SharedEventBus,
    retry_config: RetryConfig,
}

impl BookingService {
    pub fn new(storage: Arc<dyn Storage>, clock: SharedClock, event_bus: SharedEventBus) -> Self {
        Self {
            storage,
            clock,
            fees: FeeCalculator::new(),
            event_bus,
            retry_config: RetryConfig::default(),
        }
    }

    /// Create a booking: reserve the slot, then persist the booking.
    ///
    /// The slot reservation happens first; if it fails no booking object
    /// exists at all. If persisting the booking fails afterwards the
    /// reservation is rolled back, so there is no partial state on any
    /// path, including between retry attempts.
    pub async fn create(
        &self,
        user_id: &str,
        slot_id: &str,
        vehicle_number: &str,
        start_time: chrono::DateTime<Utc>,
        end_time: chrono::DateTime<Utc>,
    ) -> DomainResult<Booking> {
        retry_with_backoff(
            self.retry_config.clone(),
            || self.try_create(user_id, slot_id, vehicle_number, start_time, end_time),
            |e: &DomainError| e.is_transient(),
            "create_booking",
        )
        .await
    }

    async fn try_create(
        &self,
        user_id: &str,
        slot_id: &str,
        vehicle_number: &str,
        start_time: chrono::DateTime<Utc>,
        end_time: chrono::DateTime<Utc>,
    ) -> DomainResult<Booking> {
        if end_time <= start_time {
            return Err(DomainError::Validation(
                "end_time must be after start_time".to_string(),
            ));
        }
        if vehicle_number.trim().is_empty() {
            return Err(DomainError::Validation(
                "vehicle_number must not be empty".to_string(),
            ));
        }
        if user_id.trim().is_empty() {
            return Err(DomainError::Validation(
                "user_id must not be empty".to_string(),
            ));
        }

        self.storage.reserve_slot(slot_id).await?;

        let booking = Booking::new(
            uuid::Uuid::new_v4().to_string(),
            user_id,
            slot_id,
            vehicle_number,
            start_time,
            end_time,
        );

        if let Err(e) = self.storage.save_booking(booking.clone()).await {
            // roll the reservation back so the slot is not orphaned
            self.release_slot_logged(slot_id).await;
            return Err(e);
        }

        info!(
            booking_id = %booking.id,
            slot_id,
            user_id,
            "🅿️ Booking created, slot reserved"
        );

        self.event_bus.publish(Event::BookingCreated(BookingCreatedEvent {
            booking_id: booking.id.clone(),
            slot_id: slot_id.to_string(),
            user_id: user_id.to_string(),
            start_time,
            end_time,
            timestamp: self.clock.now(),
        }));
        self.event_bus
            .publish(Event::SlotAvailabilityChanged(SlotAvailabilityChangedEvent {
                slot_id: slot_id.to_string(),
                is_available: false,
                timestamp: self.clock.now(),
            }));

        Ok(booking)
    }

    /// Record vehicle entry for a booking.
    pub async fn check_in(&self, booking_id: &str) -> DomainResult<Booking> {
        let now = self.clock.now();
        let (booking, _) = self
            .transition(booking_id, "check_in", |b| b.check_in(now))
            .await?;

        info!(booking_id, slot_id = %booking.slot_id, "🚗 Vehicle checked in");

        self.event_bus
            .publish(Event::BookingCheckedIn(BookingCheckedInEvent {
                booking_id: booking.id.clone(),
                slot_id: booking.slot_id.clone(),
                entry_time: now,
            }));

        Ok(booking)
    }

    /// Record vehicle exit, compute the fee and store it on the pending
    /// payment. The slot stays reserved until the payment settles.
    pub async fn check_out(&self, booking_id: &str) -> DomainResult<(Booking, FeeDetails)> {
        let now = self.clock.now();
        let fees = self.fees;
        let (booking, fee_details) = self
            .transition(booking_id, "check_out", |b| {
                let minutes = b.check_out(now)?;
                let details = fees.calculate_fee(minutes);
                b.payment.amount_cents = details.fee_cents;
                Ok(details)
            })
            .await?;

        info!(
            booking_id,
            slot_id = %booking.slot_id,
            duration_minutes = fee_details.actual_duration_minutes,
            rounded_minutes = fee_details.rounded_duration_minutes,
            fee = %fee_details.format_fee(),
            "🚙 Vehicle checked out, fee computed"
        );

        self.event_bus
            .publish(Event::BookingCheckedOut(BookingCheckedOutEvent {
                booking_id: booking.id.clone(),
                slot_id: booking.slot_id.clone(),
                exit_time: now,
                duration_minutes: fee_details.actual_duration_minutes,
                fee_cents: fee_details.fee_cents,
            }));

        Ok((booking, fee_details))
    }

    /// Cancel a booking before check-in and release its slot.
    pub async fn cancel(&self, booking_id: &str) -> DomainResult<Booking> {
        let (booking, _) = self
            .transition(booking_id, "cancel_booking", |b| b.cancel())
            .await?;

        let changed = self.release_slot_logged(&booking.slot_id).await;

        info!(booking_id, slot_id = %booking.slot_id, "❌ Booking cancelled, slot released");

        self.event_bus
            .publish(Event::BookingCancelled(BookingCancelledEvent {
                booking_id: booking.id.clone(),
                slot_id: booking.slot_id.clone(),
                timestamp: self.clock.now(),
            }));
        if changed {
            self.event_bus
                .publish(Event::SlotAvailabilityChanged(SlotAvailabilityChangedEvent {
                    slot_id: booking.slot_id.clone(),
                    is_available: true,
                    timestamp: self.clock.now(),
                }));
        }

        Ok(booking)
    }

    pub async fn get(&self, booking_id: &str) -> DomainResult<Booking> {
        self.storage
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                id: booking_id.to_string(),
            })
    }

    pub async fn list(&self) -> DomainResult<Vec<Booking>> {
        self.storage.list_bookings().await
    }

    pub async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        self.storage.list_bookings_for_user(user_id).await
    }

    /// Release a slot, retrying transient failures and logging the final
    /// outcome instead of failing: by this point the booking transition
    /// is already committed.
    async fn release_slot_logged(&self, slot_id: &str) -> bool {
        let released = retry_with_backoff(
            self.retry_config.clone(),
            || self.storage.release_slot(slot_id),
            |e: &DomainError| e.is_transient(),
            "release_slot",
        )
        .await;

        match released {
            Ok(changed) => changed,
            Err(e) => {
                warn!(slot_id, error = %e, "Failed to release slot");
                false
            }
        }
    }

    /// Load-apply-store with bounded re-reads on version conflicts,
    /// wrapped in backoff retry for transient storage failures.
    async fn transition<T>(
        &self,
        booking_id: &str,
        op: &'static str,
        apply: impl Fn(&mut Booking) -> DomainResult<T>,
    ) -> DomainResult<(Booking, T)> {
        retry_with_backoff(
            self.retry_config.clone(),
            || self.try_transition(booking_id, &apply),
            |e: &DomainError| e.is_transient(),
            op,
        )
        .await
    }

    async fn try_transition<T>(
        &self,
        booking_id: &str,
        apply: impl Fn(&mut Booking) -> DomainResult<T>,
    ) -> DomainResult<(Booking, T)> {
        for _ in 0..MAX_TRANSITION_ATTEMPTS {
            let mut booking =
                self.storage
                    .get_booking(booking_id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound {
                        entity: "Booking",
                        id: booking_id.to_string(),
                    })?;

            let value = apply(&mut booking)?;

            match self.storage.update_booking(booking).await {
                Ok(stored) => return Ok((stored, value)),
                Err(DomainError::Conflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::Conflict {
            entity: "Booking",
            id: booking_id.to_string(),
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────
