//! Notification events
//!
//! Defines the events the core emits for downstream real-time delivery.
//! Transport is a consumer concern; the core only publishes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    /// A slot's availability flag flipped
    SlotAvailabilityChanged(SlotAvailabilityChangedEvent),
    /// A booking was created and its slot reserved
    BookingCreated(BookingCreatedEvent),
    /// Vehicle checked in
    BookingCheckedIn(BookingCheckedInEvent),
    /// Vehicle checked out, fee computed
    BookingCheckedOut(BookingCheckedOutEvent),
    /// Booking cancelled by the user
    BookingCancelled(BookingCancelledEvent),
    /// Booking force-cancelled by the release scheduler (no-show)
    BookingAutoCancelled(BookingAutoCancelledEvent),
    /// Booking settled and closed
    BookingCompleted(BookingCompletedEvent),
    /// Payment outcome recorded
    PaymentRecorded(PaymentRecordedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::SlotAvailabilityChanged(_) => "slot_availability_changed",
            Event::BookingCreated(_) => "booking_created",
            Event::BookingCheckedIn(_) => "booking_checked_in",
            Event::BookingCheckedOut(_) => "booking_checked_out",
            Event::BookingCancelled(_) => "booking_cancelled",
            Event::BookingAutoCancelled(_) => "booking_auto_cancelled",
            Event::BookingCompleted(_) => "booking_completed",
            Event::PaymentRecorded(_) => "payment_recorded",
        }
    }

    /// Get the slot ID if applicable
    pub fn slot_id(&self) -> Option<&str> {
        match self {
            Event::SlotAvailabilityChanged(e) => Some(&e.slot_id),
            Event::BookingCreated(e) => Some(&e.slot_id),
            Event::BookingCheckedIn(e) => Some(&e.slot_id),
            Event::BookingCheckedOut(e) => Some(&e.slot_id),
            Event::BookingCancelled(e) => Some(&e.slot_id),
            Event::BookingAutoCancelled(e) => Some(&e.slot_id),
            Event::BookingCompleted(e) => Some(&e.slot_id),
            Event::PaymentRecorded(_) => None,
        }
    }

    /// Get the booking ID if applicable
    pub fn booking_id(&self) -> Option<&str> {
        match self {
            Event::SlotAvailabilityChanged(_) => None,
            Event::BookingCreated(e) => Some(&e.booking_id),
            Event::BookingCheckedIn(e) => Some(&e.booking_id),
            Event::BookingCheckedOut(e) => Some(&e.booking_id),
            Event::BookingCancelled(e) => Some(&e.booking_id),
            Event::BookingAutoCancelled(e) => Some(&e.booking_id),
            Event::BookingCompleted(e) => Some(&e.booking_id),
            Event::PaymentRecorded(e) => Some(&e.booking_id),
        }
    }
}

/// Slot availability changed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAvailabilityChangedEvent {
    pub slot_id: String,
    pub is_available: bool,
    pub timestamp: DateTime<Utc>,
}

/// Booking created event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreatedEvent {
    pub booking_id: String,
    pub slot_id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

/// Booking checked-in event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCheckedInEvent {
    pub booking_id: String,
    pub slot_id: String,
    pub entry_time: DateTime<Utc>,
}

/// Booking checked-out event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCheckedOutEvent {
    pub booking_id: String,
    pub slot_id: String,
    pub exit_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub fee_cents: i64,
}

/// Booking cancelled event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCancelledEvent {
    pub booking_id: String,
    pub slot_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Booking auto-cancelled (no-show) event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingAutoCancelledEvent {
    pub booking_id: String,
    pub slot_id: String,
    /// End of the lapsed window that triggered the release
    pub window_end: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

/// Booking completed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCompletedEvent {
    pub booking_id: String,
    pub slot_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Payment recorded event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecordedEvent {
    pub booking_id: String,
    pub transaction_id: Option<String>,
    pub amount_cents: i64,
    pub method: String,
    /// "completed" or "failed"
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_and_accessors() {
        let event = Event::BookingAutoCancelled(BookingAutoCancelledEvent {
            booking_id: "b-1".into(),
            slot_id: "A1".into(),
            window_end: Utc::now(),
            timestamp: Utc::now(),
        });
        assert_eq!(event.event_type(), "booking_auto_cancelled");
        assert_eq!(event.booking_id(), Some("b-1"));
        assert_eq!(event.slot_id(), Some("A1"));

        let event = Event::SlotAvailabilityChanged(SlotAvailabilityChangedEvent {
            slot_id: "A2".into(),
            is_available: true,
            timestamp: Utc::now(),
        });
        assert_eq!(event.event_type(), "slot_availability_changed");
        assert_eq!(event.booking_id(), None);
    }

    #[test]
    fn event_message_serializes_with_envelope() {
        let msg = EventMessage::new(Event::SlotAvailabilityChanged(
            SlotAvailabilityChangedEvent {
                slot_id: "A1".into(),
                is_available: false,
                timestamp: Utc::now(),
            },
        ));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "slot_availability_changed");
        assert_eq!(json["data"]["slot_id"], "A1");
        assert!(json["id"].is_string());
    }

    #[test]
    fn wire_tag_matches_event_type() {
        let now = Utc::now();
        let events = vec![
            Event::BookingCreated(BookingCreatedEvent {
                booking_id: "b-1".into(),
                slot_id: "A1".into(),
                user_id: "u-1".into(),
                start_time: now,
                end_time: now,
                timestamp: now,
            }),
            Event::BookingCheckedOut(BookingCheckedOutEvent {
                booking_id: "b-1".into(),
                slot_id: "A1".into(),
                exit_time: now,
                duration_minutes: 50,
                fee_cents: 2000,
            }),
            Event::PaymentRecorded(PaymentRecordedEvent {
                booking_id: "b-1".into(),
                transaction_id: None,
                amount_cents: 2000,
                method: "credit_card".into(),
                status: "completed".into(),
                timestamp: now,
            }),
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.event_type());
        }
    }
}
