//! No-show slot reclamation
//!
//! Background task that periodically cancels bookings whose reserved
//! window has elapsed without a check-in and returns their slots to the
//! pool. Each booking is handled through the same versioned write as
//! the interactive transitions, so a check-in that lands between the
//! scan and the cancellation wins and the scan moves on.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::Storage;
use crate::notifications::{
    BookingAutoCancelledEvent, Event, SharedEventBus, SlotAvailabilityChangedEvent,
};
use crate::shared::{retry_with_backoff, RetryConfig, SharedClock, ShutdownSignal};

/// Spawn the periodic no-show sweep.
///
/// Runs until the shutdown signal fires. A failing sweep is logged and
/// the next tick tries again.
pub fn start_slot_release_task(
    storage: Arc<dyn Storage>,
    event_bus: SharedEventBus,
    clock: SharedClock,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = check_interval_secs,
            "📅 Slot release task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match release_no_shows(&storage, &event_bus, &clock).await {
                        Ok(0) => {}
                        Ok(released) => {
                            info!(released, "📅 No-show bookings cancelled, slots released");
                        }
                        Err(e) => {
                            error!(error = %e, "Slot release sweep failed");
                        }
                    }
                }
                _ = shutdown.wait() => {
                    info!("🛑 Slot release task stopping");
                    break;
                }
            }
        }
    })
}

/// One sweep: cancel every eligible no-show and free its slot.
///
/// Returns the number of bookings cancelled. Per-booking failures are
/// logged and skipped so one bad record cannot stall the sweep.
pub async fn release_no_shows(
    storage: &Arc<dyn Storage>,
    event_bus: &SharedEventBus,
    clock: &SharedClock,
) -> DomainResult<usize> {
    let now = clock.now();
    let candidates = storage.find_no_shows(now).await?;
    let mut released = 0usize;

    for mut booking in candidates {
        if let Err(e) = booking.cancel_no_show() {
            // raced with an interactive transition between scan and apply
            debug!(booking_id = %booking.id, error = %e, "Skipping no-show candidate");
            continue;
        }

        match storage.update_booking(booking.clone()).await {
            Ok(_) => {}
            Err(DomainError::Conflict { .. }) => {
                // someone checked in or cancelled first; their transition stands
                debug!(booking_id = %booking.id, "No-show candidate changed under sweep, skipping");
                continue;
            }
            Err(e) => {
                warn!(booking_id = %booking.id, error = %e, "Failed to cancel no-show");
                continue;
            }
        }

        // the cancellation is committed; retry the release so a blip
        // cannot strand the slot, since this booking will never match
        // the no-show scan again
        let changed = match retry_with_backoff(
            RetryConfig::default(),
            || storage.release_slot(&booking.slot_id),
            |e: &DomainError| e.is_transient(),
            "release_slot",
        )
        .await
        {
            Ok(changed) => changed,
            Err(e) => {
                warn!(slot_id = %booking.slot_id, error = %e, "Failed to release slot");
                false
            }
        };

        info!(
            booking_id = %booking.id,
            slot_id = %booking.slot_id,
            window_end = %booking.end_time,
            "⏰ No-show booking auto-cancelled"
        );

        event_bus.publish(Event::BookingAutoCancelled(BookingAutoCancelledEvent {
            booking_id: booking.id.clone(),
            slot_id: booking.slot_id.clone(),
            window_end: booking.end_time,
            timestamp: now,
        }));
        if changed {
            event_bus.publish(Event::SlotAvailabilityChanged(SlotAvailabilityChangedEvent {
                slot_id: booking.slot_id.clone(),
                is_available: true,
                timestamp: now,
            }));
        }

        released += 1;
    }

    Ok(released)
}

// ── Tests ──────────────────────────────────────────────────────
