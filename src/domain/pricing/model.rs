//! Parking fee calculation
//!
//! Pricing: 20.00 per hour (5.00 per 15 minutes), rounded up to the
//! nearest 15-minute interval. All amounts are in the smallest currency
//! unit (cents) so the arithmetic stays exact.

use serde::Serialize;

/// Rate per 15-minute billing interval, in cents.
pub const RATE_PER_15_MIN_CENTS: i64 = 500;

/// Rate per hour, in cents.
pub const RATE_PER_HOUR_CENTS: i64 = 2000;

/// Minimum charge for any billable stay (one interval), in cents.
pub const MINIMUM_CHARGE_CENTS: i64 = RATE_PER_15_MIN_CENTS;

/// Length of one billing interval in minutes.
pub const BILLING_INTERVAL_MINUTES: i64 = 15;

/// Result of a fee calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeDetails {
    /// Actual parking duration in minutes
    pub actual_duration_minutes: i64,
    /// Duration rounded up to the nearest 15-minute interval
    pub rounded_duration_minutes: i64,
    /// Fee in cents
    pub fee_cents: i64,
}

impl FeeDetails {
    /// All-zero result, returned for non-positive durations.
    pub fn zero() -> Self {
        Self {
            actual_duration_minutes: 0,
            rounded_duration_minutes: 0,
            fee_cents: 0,
        }
    }

    /// Format the fee as a major-unit string, e.g. "20.00".
    pub fn format_fee(&self) -> String {
        format!("{}.{:02}", self.fee_cents / 100, self.fee_cents % 100)
    }
}

/// Static pricing constants
#[derive(Debug, Clone, Serialize)]
pub struct PricingInfo {
    pub rate_per_hour_cents: i64,
    pub rate_per_15_min_cents: i64,
    pub minimum_charge_cents: i64,
    pub billing_interval: &'static str,
}

/// Pure fee calculator: elapsed duration in, billable amount out.
///
/// No state, no I/O. The fee schedule is fixed; per-location tariffs are
/// out of scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeCalculator;

impl FeeCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Calculate the parking fee for a duration in minutes.
    ///
    /// Non-positive durations yield an all-zero result.
    pub fn calculate_fee(&self, duration_minutes: i64) -> FeeDetails {
        if duration_minutes <= 0 {
            return FeeDetails::zero();
        }

        let rounded = Self::round_up_to_interval(duration_minutes);
        let fee_cents = (rounded / BILLING_INTERVAL_MINUTES) * RATE_PER_15_MIN_CENTS;

        FeeDetails {
            actual_duration_minutes: duration_minutes,
            rounded_duration_minutes: rounded,
            fee_cents,
        }
    }

    /// Round a duration up to the nearest 15-minute interval.
    ///
    /// 1-15 → 15, 16-30 → 30, 31-45 → 45, 46-60 → 60.
    pub fn round_up_to_interval(minutes: i64) -> i64 {
        if minutes <= 0 {
            return 0;
        }
        (minutes + BILLING_INTERVAL_MINUTES - 1) / BILLING_INTERVAL_MINUTES
            * BILLING_INTERVAL_MINUTES
    }

    /// Static pricing constants for display.
    pub fn pricing_info() -> PricingInfo {
        PricingInfo {
            rate_per_hour_cents: RATE_PER_HOUR_CENTS,
            rate_per_15_min_cents: RATE_PER_15_MIN_CENTS,
            minimum_charge_cents: MINIMUM_CHARGE_CENTS,
            billing_interval: "15 minutes",
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
