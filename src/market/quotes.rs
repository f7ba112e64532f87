//! Module `market::quotes`.
//!
//! Option implied-volatility quotes grouped by maturity.
//!
//! Key types and purpose: `MarketQuote` is one observed `(maturity, strike, vol)` point,
//! `QuoteBook` owns quotes keyed by maturity, and `MaturityGroup` is a resolved slice with
//! its time to maturity and forward.
//!
//! Numerical considerations: groups are resolved once per calibration rather than on every
//! objective evaluation; the result is identical, only cheaper.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{PricingError, Result};
use crate::market::MarketContext;

/// Single observed option data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Expiration date.
    pub maturity: NaiveDate,
    /// Strike in underlying price units.
    pub strike: f64,
    /// Implied volatility as a fraction (0.2 = 20%).
    pub implied_vol: f64,
    /// Market forward for this maturity, when supplied.
    #[serde(default)]
    pub forward: Option<f64>,
}

impl MarketQuote {
    pub fn new(maturity: NaiveDate, strike: f64, implied_vol: f64) -> Self {
        Self {
            maturity,
            strike,
            implied_vol,
            forward: None,
        }
    }

    /// Attaches a market forward to the quote.
    pub fn with_forward(mut self, forward: f64) -> Self {
        self.forward = Some(forward);
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "quote strike must be positive and finite, got {} ({})",
                self.strike, self.maturity
            )));
        }
        if !self.implied_vol.is_finite() || self.implied_vol <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "quote implied vol must be positive and finite, got {} (K={}, {})",
                self.implied_vol, self.strike, self.maturity
            )));
        }
        if let Some(fwd) = self.forward
            && (!fwd.is_finite() || fwd <= 0.0)
        {
            return Err(PricingError::InvalidInput(format!(
                "quote forward must be positive and finite, got {fwd} ({})",
                self.maturity
            )));
        }
        Ok(())
    }
}

/// All quotes sharing one maturity, with the derived time to maturity and forward.
#[derive(Debug, Clone, PartialEq)]
pub struct MaturityGroup {
    pub maturity: NaiveDate,
    /// Year fraction from the collection date.
    pub time_to_maturity: f64,
    /// First supplied forward in the group, else `S0 * exp(r * T)`.
    pub forward: f64,
    pub quotes: Vec<MarketQuote>,
}

impl MaturityGroup {
    /// Resolves the group's time to maturity and forward against a market context.
    pub fn resolve(maturity: NaiveDate, quotes: &[MarketQuote], ctx: &MarketContext) -> Result<Self> {
        if quotes.is_empty() {
            return Err(PricingError::MarketDataMissing(format!(
                "no quotes for maturity {maturity}"
            )));
        }

        let time_to_maturity = ctx.time_to(maturity);
        if time_to_maturity < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "maturity {maturity} precedes collection date {}",
                ctx.collection_date
            )));
        }

        let forward = quotes
            .iter()
            .find_map(|q| q.forward)
            .unwrap_or_else(|| ctx.implied_forward(time_to_maturity));

        Ok(Self {
            maturity,
            time_to_maturity,
            forward,
            quotes: quotes.to_vec(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Validated quote set keyed by maturity, in ascending date order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteBook {
    by_maturity: BTreeMap<NaiveDate, Vec<MarketQuote>>,
}

impl QuoteBook {
    /// Groups quotes by maturity, preserving input order within each group.
    ///
    /// Fails on an empty input or on any non-positive / non-finite strike, vol or forward.
    pub fn from_quotes<I>(quotes: I) -> Result<Self>
    where
        I: IntoIterator<Item = MarketQuote>,
    {
        let mut by_maturity: BTreeMap<NaiveDate, Vec<MarketQuote>> = BTreeMap::new();
        for quote in quotes {
            quote.validate()?;
            by_maturity.entry(quote.maturity).or_default().push(quote);
        }

        if by_maturity.is_empty() {
            return Err(PricingError::MarketDataMissing(
                "quote book requires at least one quote".to_string(),
            ));
        }

        Ok(Self { by_maturity })
    }

    /// Total number of quotes.
    pub fn len(&self) -> usize {
        self.by_maturity.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_maturity.is_empty()
    }

    pub fn maturities(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_maturity.keys().copied()
    }

    /// Quotes for one maturity.
    pub fn slice(&self, maturity: NaiveDate) -> Option<&[MarketQuote]> {
        self.by_maturity.get(&maturity).map(Vec::as_slice)
    }

    /// Flat iterator over every quote, maturity-major.
    pub fn quotes(&self) -> impl Iterator<Item = &MarketQuote> + '_ {
        self.by_maturity.values().flatten()
    }

    /// Resolves every maturity into a [`MaturityGroup`].
    pub fn resolve(&self, ctx: &MarketContext) -> Result<Vec<MaturityGroup>> {
        ctx.validate()?;
        self.by_maturity
            .iter()
            .map(|(maturity, quotes)| MaturityGroup::resolve(*maturity, quotes, ctx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx() -> MarketContext {
        MarketContext::builder()
            .spot(448.5)
            .rate(0.0435)
            .collection_date(date(2025, 1, 28))
            .build()
            .unwrap()
    }

    #[test]
    fn groups_are_ordered_by_maturity() {
        let book = QuoteBook::from_quotes([
            MarketQuote::new(date(2025, 6, 20), 450.0, 0.18),
            MarketQuote::new(date(2025, 3, 21), 440.0, 0.17),
            MarketQuote::new(date(2025, 3, 21), 460.0, 0.15),
        ])
        .unwrap();

        let maturities: Vec<_> = book.maturities().collect();
        assert_eq!(maturities, vec![date(2025, 3, 21), date(2025, 6, 20)]);
        assert_eq!(book.len(), 3);
        assert_eq!(book.slice(date(2025, 3, 21)).unwrap()[1].strike, 460.0);
    }

    #[test]
    fn supplied_forward_takes_precedence() {
        let m = date(2025, 3, 21);
        let book = QuoteBook::from_quotes([
            MarketQuote::new(m, 440.0, 0.17),
            MarketQuote::new(m, 450.0, 0.16).with_forward(449.42),
            MarketQuote::new(m, 460.0, 0.15).with_forward(999.0),
        ])
        .unwrap();

        let groups = book.resolve(&ctx()).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].forward, 449.42);
        assert_relative_eq!(groups[0].time_to_maturity, 52.0 / 365.0, epsilon = 1e-15);
    }

    #[test]
    fn missing_forward_falls_back_to_spot_carry() {
        let m = date(2026, 1, 28);
        let book = QuoteBook::from_quotes([MarketQuote::new(m, 450.0, 0.16)]).unwrap();
        let groups = book.resolve(&ctx()).unwrap();
        assert_relative_eq!(groups[0].forward, 448.5 * 0.0435_f64.exp(), epsilon = 1e-10);
    }

    #[test]
    fn empty_book_is_rejected() {
        let err = QuoteBook::from_quotes(Vec::new()).unwrap_err();
        assert!(matches!(err, PricingError::MarketDataMissing(_)));
    }

    #[test]
    fn invalid_quotes_are_rejected() {
        let m = date(2025, 3, 21);
        assert!(QuoteBook::from_quotes([MarketQuote::new(m, 0.0, 0.2)]).is_err());
        assert!(QuoteBook::from_quotes([MarketQuote::new(m, 100.0, f64::NAN)]).is_err());
        assert!(QuoteBook::from_quotes([MarketQuote::new(m, 100.0, 0.2).with_forward(-5.0)]).is_err());
    }

    #[test]
    fn expired_maturity_fails_resolution() {
        let book = QuoteBook::from_quotes([MarketQuote::new(date(2024, 12, 20), 450.0, 0.2)]).unwrap();
        let err = book.resolve(&ctx()).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }
}
