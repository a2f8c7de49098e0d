//! Domain errors

use thiserror::Error;

/// Domain-level error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Malformed input (e.g. end_time <= start_time)
    #[error("Validation: {0}")]
    Validation(String),

    /// Slot is already reserved by another booking
    #[error("Slot {0} is not available")]
    SlotUnavailable(String),

    /// State-machine violation (e.g. check-out before check-in)
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Operation on a booking in a terminal state
    #[error("Booking {0} is closed")]
    BookingClosed(String),

    /// Payment amount does not match the computed fee
    #[error("Payment amount mismatch: expected {expected} cents, got {actual} cents")]
    AmountMismatch { expected: i64, actual: i64 },

    /// Entity lookup failed
    #[error("Not found: {entity} with id={id}")]
    NotFound { entity: &'static str, id: String },

    /// Concurrent update lost a version race; callers re-read and re-validate
    #[error("Concurrent update conflict: {entity} {id}")]
    Conflict { entity: &'static str, id: String },

    /// Transient storage/infrastructure failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Whether this error is likely transient (e.g. storage contention)
    /// and the operation may succeed if retried.
    ///
    /// Business-rule failures are never transient: they are surfaced to
    /// the caller verbatim.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_storage_errors_are_transient() {
        assert!(DomainError::Storage("connection lost".into()).is_transient());
        assert!(!DomainError::Validation("bad window".into()).is_transient());
        assert!(!DomainError::SlotUnavailable("A1".into()).is_transient());
        assert!(!DomainError::InvalidTransition("no check-in".into()).is_transient());
        assert!(!DomainError::BookingClosed("b-1".into()).is_transient());
        assert!(!DomainError::AmountMismatch {
            expected: 2000,
            actual: 1500
        }
        .is_transient());
    }

    #[test]
    fn display_includes_context() {
        let err = DomainError::NotFound {
            entity: "Booking",
            id: "b-42".into(),
        };
        assert_eq!(err.to_string(), "Not found: Booking with id=b-42");

        let err = DomainError::AmountMismatch {
            expected: 2000,
            actual: 500,
        };
        assert!(err.to_string().contains("2000"));
        assert!(err.to_string().contains("500"));
    }
}
