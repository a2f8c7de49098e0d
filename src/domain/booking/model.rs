//! Booking domain entity
//!
//! A booking runs two orthogonal state tracks:
//!
//! - parking track: SCHEDULED → CHECKED_IN → CHECKED_OUT (forward only)
//! - booking track: BOOKED → COMPLETED | CANCELLED (terminal once reached)
//!
//! Transition methods validate the current state and mutate in place; a
//! rejected transition leaves the booking untouched. The `version` field
//! backs optimistic concurrency at the storage layer: a conditional
//! update that loses a race fails, and the caller re-reads so the stale
//! transition surfaces as `InvalidTransition`/`BookingClosed` instead of
//! corrupting state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Booking track status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Booking is live
    Booked,
    /// Parked, paid, settled
    Completed,
    /// Cancelled by user or auto-released as a no-show
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "BOOKED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "BOOKED" => Some(Self::Booked),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Terminal states accept no further operations.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parking track status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParkingStatus {
    /// Booked but not yet arrived
    Scheduled,
    /// Vehicle entered the slot
    CheckedIn,
    /// Vehicle exited; duration and fee are known
    CheckedOut,
}

impl ParkingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::CheckedIn => "CHECKED_IN",
            Self::CheckedOut => "CHECKED_OUT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SCHEDULED" => Some(Self::Scheduled),
            "CHECKED_IN" => Some(Self::CheckedIn),
            "CHECKED_OUT" => Some(Self::CheckedOut),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParkingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    Upi,
    None,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::Paypal => "paypal",
            Self::Upi => "upi",
            Self::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "credit_card" => Some(Self::CreditCard),
            "paypal" => Some(Self::Paypal),
            "upi" => Some(Self::Upi),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment record embedded in a booking
///
/// A value type owned exclusively by its booking, never addressed on its
/// own. Created pending with amount 0; the amount is set at check-out
/// and the status moves to a terminal `completed`/`failed` when the
/// payment is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Amount in cents
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Opaque generated id, set when the payment settles
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn pending() -> Self {
        Self {
            amount_cents: 0,
            method: PaymentMethod::None,
            status: PaymentStatus::Pending,
            transaction_id: None,
            paid_at: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

/// A slot reservation for a user over a time window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking ID
    pub id: String,
    /// Owning user (external identity)
    pub user_id: String,
    /// Reserved slot (external identity)
    pub slot_id: String,
    pub vehicle_number: String,
    /// Requested window start (inclusive)
    pub start_time: DateTime<Utc>,
    /// Requested window end (exclusive)
    pub end_time: DateTime<Utc>,
    /// Recorded real-world entry, set at check-in
    pub actual_entry_time: Option<DateTime<Utc>>,
    /// Recorded real-world exit, set at check-out
    pub actual_exit_time: Option<DateTime<Utc>>,
    /// Occupancy in minutes, derived at check-out
    pub actual_duration_minutes: Option<i64>,
    pub parking_status: ParkingStatus,
    pub status: BookingStatus,
    pub payment: Payment,
    pub created_at: DateTime<Utc>,
    /// Optimistic concurrency version, bumped by the storage layer
    pub version: u64,
}

impl Booking {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        slot_id: impl Into<String>,
        vehicle_number: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            slot_id: slot_id.into(),
            vehicle_number: vehicle_number.into(),
            start_time,
            end_time,
            actual_entry_time: None,
            actual_exit_time: None,
            actual_duration_minutes: None,
            parking_status: ParkingStatus::Scheduled,
            status: BookingStatus::Booked,
            payment: Payment::pending(),
            created_at: Utc::now(),
            version: 0,
        }
    }

    /// Whether this booking still holds its slot reservation.
    pub fn holds_slot(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Whether the requested window has elapsed without a check-in.
    pub fn is_no_show(&self, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::Booked
            && self.parking_status == ParkingStatus::Scheduled
            && self.end_time < now
    }

    /// Reject any mutation once the booking track is terminal.
    pub fn ensure_open(&self) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::BookingClosed(self.id.clone()));
        }
        Ok(())
    }

    /// Record vehicle entry.
    ///
    /// Requires (BOOKED, SCHEDULED).
    pub fn check_in(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_open()?;
        if self.parking_status != ParkingStatus::Scheduled {
            return Err(DomainError::InvalidTransition(format!(
                "cannot check in booking {} from parking status {}",
                self.id, self.parking_status
            )));
        }
        self.actual_entry_time = Some(now);
        self.parking_status = ParkingStatus::CheckedIn;
        Ok(())
    }

    /// Record vehicle exit and derive the occupancy duration.
    ///
    /// Requires CHECKED_IN. Duration is the occupancy rounded up to
    /// whole minutes, so any non-zero stay is billable. The slot stays
    /// reserved until the payment settles.
    pub fn check_out(&mut self, now: DateTime<Utc>) -> DomainResult<i64> {
        self.ensure_open()?;
        if self.parking_status != ParkingStatus::CheckedIn {
            return Err(DomainError::InvalidTransition(format!(
                "cannot check out booking {} from parking status {}",
                self.id, self.parking_status
            )));
        }
        // check_in guarantees the entry time is set
        let entry = self
            .actual_entry_time
            .ok_or_else(|| DomainError::InvalidTransition(format!(
                "booking {} is checked in without an entry time",
                self.id
            )))?;

        let occupancy_seconds = (now - entry).num_seconds().max(0);
        let duration_minutes = (occupancy_seconds + 59) / 60;

        self.actual_exit_time = Some(now);
        self.actual_duration_minutes = Some(duration_minutes);
        self.parking_status = ParkingStatus::CheckedOut;
        Ok(duration_minutes)
    }

    /// Cancel before arrival.
    ///
    /// Allowed only while SCHEDULED; a checked-in vehicle can no longer
    /// cancel.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.ensure_open()?;
        if self.parking_status != ParkingStatus::Scheduled {
            return Err(DomainError::InvalidTransition(format!(
                "cannot cancel booking {} after check-in",
                self.id
            )));
        }
        self.status = BookingStatus::Cancelled;
        Ok(())
    }

    /// Force-cancel a no-show from the release scheduler.
    ///
    /// Same guard as `cancel`; the parking track stays SCHEDULED because
    /// no parking ever occurred.
    pub fn cancel_no_show(&mut self) -> DomainResult<()> {
        self.cancel()
    }

    /// Close out a fully settled booking.
    ///
    /// Requires CHECKED_OUT with a completed payment; called after the
    /// payment is recorded. The caller releases the slot afterwards.
    pub fn complete(&mut self) -> DomainResult<()> {
        self.ensure_open()?;
        if self.parking_status != ParkingStatus::CheckedOut {
            return Err(DomainError::InvalidTransition(format!(
                "cannot complete booking {} before check-out",
                self.id
            )));
        }
        if !self.payment.is_settled() {
            return Err(DomainError::InvalidTransition(format!(
                "cannot complete booking {} with payment status {}",
                self.id, self.payment.status
            )));
        }
        self.status = BookingStatus::Completed;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_booking() -> Booking {
        let now = Utc::now();
        Booking::new(
            "b-1",
            "user-1",
            "A1",
            "KA01AB1234",
            now,
            now + Duration::hours(2),
        )
    }

    #[test]
    fn new_booking_starts_scheduled_and_booked() {
        let b = sample_booking();
        assert_eq!(b.status, BookingStatus::Booked);
        assert_eq!(b.parking_status, ParkingStatus::Scheduled);
        assert_eq!(b.payment.status, PaymentStatus::Pending);
        assert_eq!(b.payment.amount_cents, 0);
        assert_eq!(b.payment.method, PaymentMethod::None);
        assert_eq!(b.version, 0);
        assert!(b.holds_slot());
    }

    #[test]
    fn check_in_records_entry_time() {
        let mut b = sample_booking();
        let t0 = Utc::now();
        b.check_in(t0).unwrap();
        assert_eq!(b.parking_status, ParkingStatus::CheckedIn);
        assert_eq!(b.actual_entry_time, Some(t0));
        // booking track is untouched by the parking track
        assert_eq!(b.status, BookingStatus::Booked);
    }

    #[test]
    fn double_check_in_is_rejected() {
        let mut b = sample_booking();
        b.check_in(Utc::now()).unwrap();
        let err = b.check_in(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[test]
    fn check_out_without_check_in_is_rejected() {
        let mut b = sample_booking();
        let err = b.check_out(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert_eq!(b.parking_status, ParkingStatus::Scheduled);
    }

    #[test]
    fn check_out_derives_duration_in_minutes() {
        let mut b = sample_booking();
        let t0 = Utc::now();
        b.check_in(t0).unwrap();
        let minutes = b.check_out(t0 + Duration::minutes(50)).unwrap();
        assert_eq!(minutes, 50);
        assert_eq!(b.actual_duration_minutes, Some(50));
        assert_eq!(b.parking_status, ParkingStatus::CheckedOut);
        // slot is not released at check-out; the booking stays open
        assert!(b.holds_slot());
    }

    #[test]
    fn check_out_rounds_partial_minutes_up() {
        let mut b = sample_booking();
        let t0 = Utc::now();
        b.check_in(t0).unwrap();
        let minutes = b.check_out(t0 + Duration::seconds(90)).unwrap();
        assert_eq!(minutes, 2);
    }

    #[test]
    fn immediate_check_out_is_zero_minutes() {
        let mut b = sample_booking();
        let t0 = Utc::now();
        b.check_in(t0).unwrap();
        assert_eq!(b.check_out(t0).unwrap(), 0);
    }

    #[test]
    fn cancel_before_check_in() {
        let mut b = sample_booking();
        b.cancel().unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
        assert_eq!(b.parking_status, ParkingStatus::Scheduled);
        assert!(!b.holds_slot());
    }

    #[test]
    fn cancel_after_check_in_is_rejected() {
        let mut b = sample_booking();
        b.check_in(Utc::now()).unwrap();
        let err = b.cancel().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert_eq!(b.status, BookingStatus::Booked);
    }

    #[test]
    fn operations_on_cancelled_booking_fail_with_booking_closed() {
        let mut b = sample_booking();
        b.cancel().unwrap();

        assert!(matches!(
            b.check_in(Utc::now()).unwrap_err(),
            DomainError::BookingClosed(_)
        ));
        assert!(matches!(
            b.check_out(Utc::now()).unwrap_err(),
            DomainError::BookingClosed(_)
        ));
        assert!(matches!(
            b.cancel().unwrap_err(),
            DomainError::BookingClosed(_)
        ));
        assert!(matches!(
            b.complete().unwrap_err(),
            DomainError::BookingClosed(_)
        ));
    }

    #[test]
    fn complete_requires_checked_out() {
        let mut b = sample_booking();
        let err = b.complete().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));

        b.check_in(Utc::now()).unwrap();
        let err = b.complete().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[test]
    fn complete_requires_settled_payment() {
        let mut b = sample_booking();
        let t0 = Utc::now();
        b.check_in(t0).unwrap();
        b.check_out(t0 + Duration::minutes(30)).unwrap();

        let err = b.complete().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));

        b.payment.status = PaymentStatus::Completed;
        b.complete().unwrap();
        assert_eq!(b.status, BookingStatus::Completed);
        assert!(!b.holds_slot());
    }

    #[test]
    fn operations_on_completed_booking_fail_with_booking_closed() {
        let mut b = sample_booking();
        let t0 = Utc::now();
        b.check_in(t0).unwrap();
        b.check_out(t0 + Duration::minutes(30)).unwrap();
        b.payment.status = PaymentStatus::Completed;
        b.complete().unwrap();

        assert!(matches!(
            b.cancel().unwrap_err(),
            DomainError::BookingClosed(_)
        ));
        assert!(matches!(
            b.complete().unwrap_err(),
            DomainError::BookingClosed(_)
        ));
    }

    #[test]
    fn no_show_detection() {
        let now = Utc::now();
        let mut b = Booking::new(
            "b-2",
            "user-1",
            "A2",
            "KA01AB1234",
            now - Duration::hours(3),
            now - Duration::hours(1),
        );
        assert!(b.is_no_show(now));

        // a checked-in booking is never a no-show
        b.check_in(now - Duration::hours(2)).unwrap();
        assert!(!b.is_no_show(now));
    }

    #[test]
    fn no_show_cancel_keeps_parking_scheduled() {
        let now = Utc::now();
        let mut b = Booking::new(
            "b-3",
            "user-1",
            "A3",
            "KA01AB1234",
            now - Duration::hours(3),
            now - Duration::hours(1),
        );
        b.cancel_no_show().unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
        assert_eq!(b.parking_status, ParkingStatus::Scheduled);
    }

    #[test]
    fn status_string_roundtrips() {
        for s in &[
            BookingStatus::Booked,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::from_str(s.as_str()), Some(*s));
        }
        for s in &[
            ParkingStatus::Scheduled,
            ParkingStatus::CheckedIn,
            ParkingStatus::CheckedOut,
        ] {
            assert_eq!(ParkingStatus::from_str(s.as_str()), Some(*s));
        }
        for m in &[
            PaymentMethod::CreditCard,
            PaymentMethod::Paypal,
            PaymentMethod::Upi,
            PaymentMethod::None,
        ] {
            assert_eq!(PaymentMethod::from_str(m.as_str()), Some(*m));
        }
        assert_eq!(BookingStatus::from_str("UNKNOWN"), None);
        assert_eq!(PaymentMethod::from_str("cash"), None);
    }
}
