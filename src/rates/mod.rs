//! Rate primitives: day counts and continuously-compounded carry.

pub mod day_count;

pub use day_count::{DayCountConvention, year_fraction};

/// Forward price `spot * exp(rate * t)` under continuous compounding and no carry.
#[inline]
pub fn continuous_forward(spot: f64, rate: f64, t: f64) -> f64 {
    spot * (rate * t).exp()
}

/// Discount factor `exp(-rate * t)`.
#[inline]
pub fn discount_factor(rate: f64, t: f64) -> f64 {
    (-rate * t).exp()
}
