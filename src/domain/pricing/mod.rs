//! Fee calculation

pub mod model;

pub use model::{
    FeeCalculator, FeeDetails, PricingInfo, BILLING_INTERVAL_MINUTES, MINIMUM_CHARGE_CENTS,
    RATE_PER_15_MIN_CENTS, RATE_PER_HOUR_CENTS,
};
