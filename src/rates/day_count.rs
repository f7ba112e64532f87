//! Module `rates::day_count`.
//!
//! Implements day count workflows with concrete routines such as `year_fraction`.
//!
//! References: Hull (11th ed.) Ch. 4 and 6.
//!
//! Key types and purpose: `DayCountConvention` selects how the calibration engine turns a
//! quote's maturity date into a time to maturity measured from the collection date.
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Supported day-count conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCountConvention {
    /// Actual day count over a 360-day year.
    Act360,
    /// Actual day count over a 365-day year.
    #[default]
    Act365Fixed,
    /// ISDA actual/actual convention.
    ActActIsda,
}

/// Computes year fraction between two dates under a day-count convention.
///
/// Edge cases:
/// - If `start == end`, returns `0.0`.
/// - If `start > end`, the result is negative and antisymmetric.
///
/// # Examples
/// ```rust
/// use chrono::NaiveDate;
/// use ferric_sabr::rates::{DayCountConvention, year_fraction};
///
/// let s = NaiveDate::from_ymd_opt(2025, 1, 28).unwrap();
/// let e = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
/// let yf = year_fraction(s, e, DayCountConvention::Act365Fixed);
/// assert!((yf - 52.0 / 365.0).abs() < 1e-15);
/// ```
pub fn year_fraction(start: NaiveDate, end: NaiveDate, convention: DayCountConvention) -> f64 {
    if start == end {
        return 0.0;
    }
    if start > end {
        return -year_fraction(end, start, convention);
    }

    match convention {
        DayCountConvention::Act360 => (end - start).num_days() as f64 / 360.0,
        DayCountConvention::Act365Fixed => (end - start).num_days() as f64 / 365.0,
        DayCountConvention::ActActIsda => year_fraction_act_act_isda(start, end),
    }
}

fn year_fraction_act_act_isda(start: NaiveDate, end: NaiveDate) -> f64 {
    if start.year() == end.year() {
        return (end - start).num_days() as f64 / days_in_year(start.year()) as f64;
    }

    let first_stub = days_until_year_end(start) as f64 / days_in_year(start.year()) as f64;
    let whole_years = (end.year() - start.year() - 1) as f64;
    let last_stub = (end.ordinal0() as f64) / days_in_year(end.year()) as f64;
    first_stub + whole_years + last_stub
}

fn days_until_year_end(date: NaiveDate) -> i32 {
    days_in_year(date.year()) - date.ordinal0() as i32
}

fn days_in_year(year: i32) -> i32 {
    if is_leap_year(year) { 366 } else { 365 }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
