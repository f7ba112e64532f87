//! SABR calibration across all maturities with a single parameter set.
//!
//! References:
//! - Hagan et al. (2002), SABR implied-vol asymptotics.
//! - Kirkpatrick, Gelatt and Vecchi (1983), simulated annealing.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calibration::annealing::{AnnealingOptions, anneal_multi_start};
use crate::calibration::core::{CalibrationResult, Calibrator};
use crate::calibration::diagnostics::{fit_quality, warning_flags};
use crate::calibration::objective::{global_calibration_error, quote_errors};
use crate::core::{PricingError, Result};
use crate::market::{MarketContext, QuoteBook};
use crate::vol::SabrParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SabrCalibrator {
    pub initial_params: SabrParams,
    pub annealing: AnnealingOptions,
    /// Extra starting points, each annealed with its own derived seed.
    pub additional_starts: Vec<SabrParams>,
}

impl Default for SabrCalibrator {
    fn default() -> Self {
        Self {
            initial_params: SabrParams::default(),
            annealing: AnnealingOptions::default(),
            additional_starts: Vec::new(),
        }
    }
}

impl SabrCalibrator {
    pub fn new(initial_params: SabrParams, annealing: AnnealingOptions) -> Self {
        Self {
            initial_params,
            annealing,
            additional_starts: Vec::new(),
        }
    }

    pub fn with_additional_starts(mut self, starts: Vec<SabrParams>) -> Self {
        self.additional_starts = starts;
        self
    }

    fn starts(&self) -> Vec<SabrParams> {
        std::iter::once(self.initial_params)
            .chain(self.additional_starts.iter().copied())
            .collect()
    }
}

impl Calibrator<SabrParams> for SabrCalibrator {
    fn name(&self) -> &'static str {
        "sabr"
    }

    fn calibrate(
        &self,
        quotes: &QuoteBook,
        market: &MarketContext,
    ) -> Result<CalibrationResult<SabrParams>> {
        self.annealing.validate()?;
        let groups = quotes.resolve(market)?;
        let starts = self.starts();

        info!(
            quotes = quotes.len(),
            maturities = groups.len(),
            starts = starts.len(),
            iterations = self.annealing.iterations,
            "starting SABR calibration"
        );

        let run = anneal_multi_start(
            |p: &SabrParams| global_calibration_error(p, &groups),
            &starts,
            &self.annealing,
        )?;

        if !run.error.is_finite() {
            return Err(PricingError::ConvergenceFailure(format!(
                "annealing found no finite objective in {} evaluations",
                run.diagnostics.objective_evaluations
            )));
        }

        let per_quote_error = quote_errors(&run.params, &groups);
        let fit = fit_quality(&per_quote_error);
        let flags = warning_flags(&run.params, &fit, &run.diagnostics);

        info!(
            params = %run.params,
            error = run.error,
            rmse = fit.rmse,
            accepted = run.diagnostics.accepted,
            "SABR calibration finished"
        );
        if !flags.is_empty() {
            warn!(?flags, "calibration raised warnings");
        }

        Ok(CalibrationResult {
            params: run.params,
            objective: run.error,
            per_quote_error,
            fit_quality: fit,
            annealing: run.diagnostics,
            warning_flags: flags,
            trace: run.trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MarketQuote;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn market() -> MarketContext {
        MarketContext::builder()
            .spot(448.5)
            .rate(0.0435)
            .collection_date(date(2025, 1, 28))
            .build()
            .unwrap()
    }

    fn synthetic_book(truth: &SabrParams) -> QuoteBook {
        let ctx = market();
        let mut quotes = Vec::new();
        for maturity in [date(2025, 3, 21), date(2025, 6, 20), date(2025, 12, 19)] {
            let fwd = ctx.implied_forward(ctx.time_to(maturity));
            for m in [0.85, 0.95, 1.0, 1.05, 1.15] {
                let k = (fwd * m).round();
                quotes.push(MarketQuote::new(maturity, k, truth.implied_vol(fwd, k)));
            }
        }
        QuoteBook::from_quotes(quotes).unwrap()
    }

    #[test]
    fn calibration_reduces_objective_below_start() {
        let truth = SabrParams::new(2.0, 0.5, -0.4, 0.8).unwrap();
        let book = synthetic_book(&truth);
        let ctx = market();
        let groups = book.resolve(&ctx).unwrap();
        let start_err = global_calibration_error(&SabrParams::default(), &groups);

        let calibrator = SabrCalibrator::default();
        let res = calibrator.calibrate(&book, &ctx).unwrap();

        assert_eq!(calibrator.name(), "sabr");
        assert!(res.objective < start_err);
        assert!(res.params.is_admissible());
        assert_eq!(res.per_quote_error.len(), 15);
        let sse: f64 = res.per_quote_error.iter().map(|e| e.signed_error.powi(2)).sum();
        assert!((sse - res.objective).abs() <= 1e-12 * res.objective.max(1.0));
    }

    #[test]
    fn all_nan_objective_is_a_convergence_failure() {
        let book = QuoteBook::from_quotes([MarketQuote::new(date(2025, 6, 20), 450.0, 0.2)]).unwrap();
        // An infinite alpha makes every model vol infinite.
        let calibrator = SabrCalibrator {
            initial_params: SabrParams {
                alpha: f64::INFINITY,
                beta: 0.5,
                rho: 0.0,
                nu: 0.2,
            },
            annealing: AnnealingOptions {
                iterations: 0,
                ..AnnealingOptions::default()
            },
            additional_starts: Vec::new(),
        };
        let err = calibrator.calibrate(&book, &market()).unwrap_err();
        assert!(matches!(err, PricingError::ConvergenceFailure(_)));
    }
}
