//! Payment recording
//!
//! Settles the fee computed at check-out. The submitted amount must
//! match the stored amount exactly; a mismatch marks the payment failed
//! and the caller may retry with the correct amount. A successful
//! payment completes the booking and releases the slot in one
//! conditional write, so observers never see a paid booking that is
//! still open.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{Booking, DomainError, DomainResult, ParkingStatus, PaymentMethod, PaymentStatus};
use crate::infrastructure::Storage;
use crate::notifications::{
    BookingCompletedEvent, Event, PaymentRecordedEvent, SharedEventBus,
    SlotAvailabilityChangedEvent,
};
use crate::shared::{retry_with_backoff, RetryConfig, SharedClock};

const MAX_TRANSITION_ATTEMPTS: u32 = 3;

/// Service for settling booking payments
pub struct PaymentService {
    storage: Arc<dyn Storage>,
    clock: SharedClock,
    event_bus: SharedEventBus,
    retry_config: RetryConfig,
}

impl PaymentService {
    pub fn new(storage: Arc<dyn Storage>, clock: SharedClock, event_bus: SharedEventBus) -> Self {
        Self {
            storage,
            clock,
            event_bus,
            retry_config: RetryConfig::default(),
        }
    }

    /// Record a payment against a checked-out booking.
    ///
    /// Transient storage failures are retried with backoff; business
    /// errors (mismatch, closed booking, wrong phase) surface
    /// immediately.
    pub async fn record_payment(
        &self,
        booking_id: &str,
        amount_cents: i64,
        method: PaymentMethod,
    ) -> DomainResult<Booking> {
        retry_with_backoff(
            self.retry_config.clone(),
            || self.try_record(booking_id, amount_cents, method),
            |e: &DomainError| e.is_transient(),
            "record_payment",
        )
        .await
    }

    async fn try_record(
        &self,
        booking_id: &str,
        amount_cents: i64,
        method: PaymentMethod,
    ) -> DomainResult<Booking> {
        if amount_cents < 0 {
            return Err(DomainError::Validation(
                "amount must not be negative".to_string(),
            ));
        }

        for _ in 0..MAX_TRANSITION_ATTEMPTS {
            let mut booking = self
                .storage
                .get_booking(booking_id)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    entity: "Booking",
                    id: booking_id.to_string(),
                })?;

            booking.ensure_open()?;
            if booking.payment.status == PaymentStatus::Completed {
                return Err(DomainError::InvalidTransition(
                    "payment already settled".to_string(),
                ));
            }
            if booking.parking_status != ParkingStatus::CheckedOut {
                return Err(DomainError::InvalidTransition(
                    "payment requires a checked-out booking".to_string(),
                ));
            }

            let expected = booking.payment.amount_cents;
            if amount_cents != expected {
                booking.payment.method = method;
                booking.payment.status = PaymentStatus::Failed;
                match self.storage.update_booking(booking).await {
                    Ok(stored) => {
                        warn!(
                            booking_id,
                            expected_cents = expected,
                            actual_cents = amount_cents,
                            "💳 Payment amount mismatch, marked failed"
                        );
                        self.publish_payment_event(&stored, amount_cents);
                        return Err(DomainError::AmountMismatch {
                            expected,
                            actual: amount_cents,
                        });
                    }
                    Err(DomainError::Conflict { .. }) => continue,
                    Err(e) => return Err(e),
                }
            }

            let now = self.clock.now();
            booking.payment.method = method;
            booking.payment.status = PaymentStatus::Completed;
            booking.payment.transaction_id = Some(uuid::Uuid::new_v4().to_string());
            booking.payment.paid_at = Some(now);
            booking.complete()?;

            match self.storage.update_booking(booking).await {
                Ok(stored) => {
                    let changed = self.release_slot_logged(&stored.slot_id).await;

                    info!(
                        booking_id,
                        slot_id = %stored.slot_id,
                        amount_cents,
                        method = %method,
                        "💳 Payment recorded, booking completed"
                    );

                    self.publish_payment_event(&stored, amount_cents);
                    self.event_bus
                        .publish(Event::BookingCompleted(BookingCompletedEvent {
                            booking_id: stored.id.clone(),
                            slot_id: stored.slot_id.clone(),
                            timestamp: now,
                        }));
                    if changed {
                        self.event_bus.publish(Event::SlotAvailabilityChanged(
                            SlotAvailabilityChangedEvent {
                                slot_id: stored.slot_id.clone(),
                                is_available: true,
                                timestamp: now,
                            },
                        ));
                    }

                    return Ok(stored);
                }
                Err(DomainError::Conflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::Conflict {
            entity: "Booking",
            id: booking_id.to_string(),
        })
    }

    /// Release a slot, retrying transient failures and logging the final
    /// outcome: the settlement is already committed by this point.
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

    fn publish_payment_event(&self, booking: &Booking, amount_cents: i64) {
        self.event_bus
            .publish(Event::PaymentRecorded(PaymentRecordedEvent {
                booking_id: booking.id.clone(),
                transaction_id: booking.payment.transaction_id.clone(),
                amount_cents,
                method: booking.payment.method.as_str().to_string(),
                status: booking.payment.status.as_str().to_string(),
                timestamp: self.clock.now(),
            }));
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::BookingService;
    use crate::domain::{BookingStatus, Slot};
    use crate::infrastructure::storage::FlakyStorage;
    use crate::infrastructure::InMemoryStorage;
    use crate::notifications::create_event_bus;
    use crate::shared::{Clock, ManualClock};
    use chrono::{Duration, Utc};

    struct Fixture {
        bookings: BookingService,
        payments: PaymentService,
        storage: Arc<dyn Storage>,
        clock: Arc<ManualClock>,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let event_bus = create_event_bus();
        Fixture {
            bookings: BookingService::new(storage.clone(), clock.clone(), event_bus.clone()),
            payments: PaymentService::new(storage.clone(), clock.clone(), event_bus),
            storage,
            clock,
        }
    }

    /// Create, check in, park for `minutes`, check out. Returns the
    /// booking with the fee stored on its pending payment.
    async fn checked_out_booking(fx: &Fixture, minutes: i64) -> Booking {
        fx.storage.save_slot(Slot::new("A1")).await.unwrap();
        let now = fx.clock.now();
        let booking = fx
            .bookings
            .create("user-1", "A1", "KA01AB1234", now, now + Duration::hours(3))
            .await
            .unwrap();
        fx.bookings.check_in(&booking.id).await.unwrap();
        fx.clock.advance(Duration::minutes(minutes));
        let (booking, _) = fx.bookings.check_out(&booking.id).await.unwrap();
        booking
    }

    #[tokio::test]
    async fn exact_payment_completes_booking_and_frees_slot() {
        let fx = fixture();
        let booking = checked_out_booking(&fx, 30).await;
        assert_eq!(booking.payment.amount_cents, 1000);

        let paid = fx
            .payments
            .record_payment(&booking.id, 1000, PaymentMethod::Upi)
            .await
            .unwrap();

        assert_eq!(paid.status, BookingStatus::Completed);
        assert_eq!(paid.payment.status, PaymentStatus::Completed);
        assert!(paid.payment.transaction_id.is_some());
        assert!(paid.payment.paid_at.is_some());
        assert!(fx.storage.get_slot("A1").await.unwrap().unwrap().is_available);
    }

    #[tokio::test]
    async fn mismatched_amount_fails_and_keeps_booking_open() {
        let fx = fixture();
        let booking = checked_out_booking(&fx, 30).await;

        let err = fx
            .payments
            .record_payment(&booking.id, 900, PaymentMethod::CreditCard)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::AmountMismatch {
                expected: 1000,
                actual: 900
            }
        );

        let stored = fx.storage.get_booking(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Booked);
        assert_eq!(stored.payment.status, PaymentStatus::Failed);
        assert!(!fx.storage.get_slot("A1").await.unwrap().unwrap().is_available);
    }

    #[tokio::test]
    async fn failed_payment_can_be_retried_with_correct_amount() {
        let fx = fixture();
        let booking = checked_out_booking(&fx, 30).await;

        fx.payments
            .record_payment(&booking.id, 1, PaymentMethod::Paypal)
            .await
            .unwrap_err();

        let paid = fx
            .payments
            .record_payment(&booking.id, 1000, PaymentMethod::Paypal)
            .await
            .unwrap();
        assert_eq!(paid.status, BookingStatus::Completed);
        assert!(fx.storage.get_slot("A1").await.unwrap().unwrap().is_available);
    }

    #[tokio::test]
    async fn second_payment_against_settled_booking_is_rejected() {
        let fx = fixture();
        let booking = checked_out_booking(&fx, 30).await;

        fx.payments
            .record_payment(&booking.id, 1000, PaymentMethod::Upi)
            .await
            .unwrap();

        let err = fx
            .payments
            .record_payment(&booking.id, 1000, PaymentMethod::Upi)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BookingClosed(_)));
    }

    #[tokio::test]
    async fn payment_before_check_out_is_rejected() {
        let fx = fixture();
        fx.storage.save_slot(Slot::new("A1")).await.unwrap();
        let now = fx.clock.now();
        let booking = fx
            .bookings
            .create("user-1", "A1", "KA01AB1234", now, now + Duration::hours(1))
            .await
            .unwrap();
        fx.bookings.check_in(&booking.id).await.unwrap();

        let err = fx
            .payments
            .record_payment(&booking.id, 500, PaymentMethod::Upi)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let fx = fixture();
        let booking = checked_out_booking(&fx, 30).await;

        let err = fx
            .payments
            .record_payment(&booking.id, -1, PaymentMethod::Upi)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn fifty_minute_stay_bills_one_hour_end_to_end() {
        let fx = fixture();
        let booking = checked_out_booking(&fx, 50).await;

        // 50 min rounds up to 60, billed at the hourly rate
        assert_eq!(booking.actual_duration_minutes, Some(50));
        assert_eq!(booking.payment.amount_cents, 2000);
        assert!(!fx.storage.get_slot("A1").await.unwrap().unwrap().is_available);

        let paid = fx
            .payments
            .record_payment(&booking.id, 2000, PaymentMethod::CreditCard)
            .await
            .unwrap();

        assert_eq!(paid.status, BookingStatus::Completed);
        assert_eq!(paid.payment.status, PaymentStatus::Completed);
        assert!(fx.storage.get_slot("A1").await.unwrap().unwrap().is_available);
    }

    #[tokio::test]
    async fn settlement_retries_transient_slot_release() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let flaky = Arc::new(FlakyStorage::new());
        let storage: Arc<dyn Storage> = flaky.clone();
        let event_bus = create_event_bus();
        let bookings = BookingService::new(storage.clone(), clock.clone(), event_bus.clone());
        let payments = PaymentService::new(storage.clone(), clock.clone(), event_bus);

        storage.save_slot(Slot::new("A1")).await.unwrap();
        let now = clock.now();
        let booking = bookings
            .create("user-1", "A1", "KA01AB1234", now, now + Duration::hours(3))
            .await
            .unwrap();
        bookings.check_in(&booking.id).await.unwrap();
        clock.advance(Duration::minutes(30));
        let (booking, _) = bookings.check_out(&booking.id).await.unwrap();

        // the settlement commits, then the release must survive one blip
        // or the slot would stay reserved with no open booking
        flaky.fail_next_release_slot(1);
        let paid = payments
            .record_payment(&booking.id, 1000, PaymentMethod::Upi)
            .await
            .unwrap();
        assert_eq!(paid.status, BookingStatus::Completed);
        assert!(storage.get_slot("A1").await.unwrap().unwrap().is_available);
    }

    #[tokio::test]
    async fn zero_duration_checkout_settles_for_zero() {
        let fx = fixture();
        let booking = checked_out_booking(&fx, 0).await;
        assert_eq!(booking.payment.amount_cents, 0);

        let paid = fx
            .payments
            .record_payment(&booking.id, 0, PaymentMethod::None)
            .await
            .unwrap();
        assert_eq!(paid.status, BookingStatus::Completed);
    }
}
