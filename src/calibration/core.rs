//! Calibration core abstractions.
//!
//! References:
//! - Kirkpatrick, Gelatt and Vecchi (1983), simulated annealing.
//! - Hagan et al. (2002), SABR implied-vol asymptotics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::market::{MarketContext, QuoteBook};

/// Single quote-level calibration error record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteError {
    pub maturity: NaiveDate,
    pub strike: f64,
    pub forward: f64,
    pub market_vol: f64,
    pub model_vol: f64,
    /// `model_vol - market_vol`.
    pub signed_error: f64,
    pub abs_error: f64,
}

/// Bookkeeping gathered while annealing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealDiagnostics {
    pub iterations: usize,
    pub objective_evaluations: usize,
    /// Accepted proposals, downhill and uphill.
    pub accepted: usize,
    /// Proposals accepted through the Metropolis draw despite `delta >= 0`.
    pub uphill_accepted: usize,
    pub non_finite_rejections: usize,
    pub initial_error: f64,
    pub final_temperature: f64,
}

impl AnnealDiagnostics {
    /// Fraction of proposals accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted as f64 / self.iterations as f64
        }
    }
}

/// Aggregate fit-quality metrics over implied vols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub rmse: f64,
    pub mae: f64,
    pub max_abs_error: f64,
}

/// High-level warning flags derived from fit and search diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationWarningFlag {
    /// Best parameters sit on an edge of the admissible domain.
    HitBoundary,
    PoorFit,
    /// The starting point evaluated to a non-finite objective.
    NoFiniteObjective,
    LowAcceptance,
}

/// Standardized calibration output payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult<P> {
    pub params: P,
    /// Sum of squared vol errors at `params`.
    pub objective: f64,
    pub per_quote_error: Vec<QuoteError>,
    pub fit_quality: FitQuality,
    pub annealing: AnnealDiagnostics,
    pub warning_flags: Vec<CalibrationWarningFlag>,
    /// Best error after each iteration, when tracing was requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<f64>,
}

/// Model-specific calibrator interface.
pub trait Calibrator<P> {
    fn name(&self) -> &'static str;

    fn calibrate(&self, quotes: &QuoteBook, market: &MarketContext)
    -> Result<CalibrationResult<P>>;
}
