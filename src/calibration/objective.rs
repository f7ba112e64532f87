//! Sum-of-squares objective over maturity-grouped implied vols.

use chrono::NaiveDate;

use crate::calibration::core::QuoteError;
use crate::core::Result;
use crate::market::{MarketContext, MarketQuote, MaturityGroup, QuoteBook};
use crate::vol::{SabrParams, sabr_vol};

/// Sum over every quote of `(market_vol - model_vol)^2`.
///
/// Non-finite model vols propagate into the sum; callers decide how to treat them.
pub fn global_calibration_error(params: &SabrParams, groups: &[MaturityGroup]) -> f64 {
    groups
        .iter()
        .map(|group| {
            group
                .quotes
                .iter()
                .map(|q| {
                    let model = sabr_vol(
                        group.forward,
                        q.strike,
                        params.alpha,
                        params.beta,
                        params.rho,
                        params.nu,
                    );
                    let diff = q.implied_vol - model;
                    diff * diff
                })
                .sum::<f64>()
        })
        .sum()
}

/// Per-quote model vs market breakdown at `params`.
pub fn quote_errors(params: &SabrParams, groups: &[MaturityGroup]) -> Vec<QuoteError> {
    groups
        .iter()
        .flat_map(|group| {
            group.quotes.iter().map(move |q| {
                let model_vol = params.implied_vol(group.forward, q.strike);
                let signed_error = model_vol - q.implied_vol;
                QuoteError {
                    maturity: group.maturity,
                    strike: q.strike,
                    forward: group.forward,
                    market_vol: q.implied_vol,
                    model_vol,
                    signed_error,
                    abs_error: signed_error.abs(),
                }
            })
        })
        .collect()
}

/// Objective from a flat quote list, spot and rate, using Act/365F year fractions.
///
/// Groups the quotes on every call; hold a [`QuoteBook`] and resolved groups when the
/// objective is evaluated repeatedly.
pub fn calibration_error(
    params: &SabrParams,
    quotes: &[MarketQuote],
    collection_date: NaiveDate,
    spot: f64,
    rate: f64,
) -> Result<f64> {
    let ctx = MarketContext::builder()
        .spot(spot)
        .rate(rate)
        .collection_date(collection_date)
        .build()?;
    let groups = QuoteBook::from_quotes(quotes.iter().copied())?.resolve(&ctx)?;
    Ok(global_calibration_error(params, &groups))
}
