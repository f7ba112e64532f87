//! Module `market::market`.
//!
//! Scalar market context consumed by the calibration engine and the pricing pipeline.
//!
//! Key types and purpose: `MarketContext`, `MarketContextBuilder` carry spot, the flat
//! continuously-compounded rate, the quote collection date and the day-count convention.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{PricingError, Result};
use crate::rates::{DayCountConvention, continuous_forward, year_fraction};

/// Market snapshot that accompanies a set of option quotes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Spot price `S0`.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Date on which the quotes were observed.
    pub collection_date: NaiveDate,
    /// Convention turning maturity dates into year fractions.
    #[serde(default)]
    pub day_count: DayCountConvention,
}

impl MarketContext {
    /// Starts a market context builder.
    #[inline]
    pub fn builder() -> MarketContextBuilder {
        MarketContextBuilder::default()
    }

    /// Year fraction from the collection date to `maturity`.
    #[inline]
    pub fn time_to(&self, maturity: NaiveDate) -> f64 {
        year_fraction(self.collection_date, maturity, self.day_count)
    }

    /// Forward implied by spot carry, `S0 * exp(r * t)`.
    #[inline]
    pub fn implied_forward(&self, t: f64) -> f64 {
        continuous_forward(self.spot, self.rate, t)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "market spot must be positive and finite, got {}",
                self.spot
            )));
        }
        if !self.rate.is_finite() {
            return Err(PricingError::InvalidInput(format!(
                "market rate must be finite, got {}",
                self.rate
            )));
        }
        Ok(())
    }
}

/// Builder for [`MarketContext`].
#[derive(Debug, Clone, Default)]
pub struct MarketContextBuilder {
    spot: Option<f64>,
    rate: Option<f64>,
    collection_date: Option<NaiveDate>,
    day_count: Option<DayCountConvention>,
}

impl MarketContextBuilder {
    /// Sets the spot price.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the flat risk-free rate.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the quote collection date.
    #[inline]
    pub fn collection_date(mut self, date: NaiveDate) -> Self {
        self.collection_date = Some(date);
        self
    }

    #[inline]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = Some(day_count);
        self
    }

    /// Validates and builds a [`MarketContext`].
    pub fn build(self) -> Result<MarketContext> {
        let spot = self
            .spot
            .ok_or_else(|| PricingError::InvalidInput("market spot is required".to_string()))?;
        let collection_date = self.collection_date.ok_or_else(|| {
            PricingError::InvalidInput("market collection date is required".to_string())
        })?;

        let ctx = MarketContext {
            spot,
            rate: self.rate.unwrap_or(0.0),
            collection_date,
            day_count: self.day_count.unwrap_or_default(),
        };
        ctx.validate()?;
        Ok(ctx)
    }
}
