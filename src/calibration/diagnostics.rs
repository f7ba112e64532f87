//! Calibration diagnostics and warning synthesis.

use crate::calibration::core::{AnnealDiagnostics, CalibrationWarningFlag, FitQuality, QuoteError};
use crate::vol::SabrParams;
use crate::vol::sabr::{PARAM_FLOOR, RHO_LIMIT};

/// RMSE above which a fit is flagged as poor (vol points).
pub const POOR_FIT_RMSE: f64 = 0.005;
/// Acceptance rate below which the search is flagged as frozen.
pub const LOW_ACCEPTANCE_RATE: f64 = 0.01;

const BOUNDARY_EPS: f64 = 1e-6;

pub fn fit_quality(errors: &[QuoteError]) -> FitQuality {
    if errors.is_empty() {
        return FitQuality {
            rmse: 0.0,
            mae: 0.0,
            max_abs_error: 0.0,
        };
    }

    let n = errors.len() as f64;
    let rmse = (errors
        .iter()
        .map(|e| e.signed_error * e.signed_error)
        .sum::<f64>()
        / n)
        .sqrt();
    let mae = errors.iter().map(|e| e.abs_error).sum::<f64>() / n;
    let max_abs_error = errors.iter().map(|e| e.abs_error).fold(0.0_f64, f64::max);

    FitQuality {
        rmse,
        mae,
        max_abs_error,
    }
}

/// True when any component sits on an edge of the projected domain.
pub fn hits_boundary(params: &SabrParams) -> bool {
    params.alpha <= PARAM_FLOOR + BOUNDARY_EPS
        || params.nu <= PARAM_FLOOR + BOUNDARY_EPS
        || params.beta <= BOUNDARY_EPS
        || params.beta >= 1.0 - BOUNDARY_EPS
        || params.rho.abs() >= RHO_LIMIT - BOUNDARY_EPS
}

pub fn warning_flags(
    params: &SabrParams,
    fit: &FitQuality,
    annealing: &AnnealDiagnostics,
) -> Vec<CalibrationWarningFlag> {
    let mut out = Vec::new();

    if hits_boundary(params) {
        out.push(CalibrationWarningFlag::HitBoundary);
    }

    if !fit.rmse.is_finite() || fit.rmse > POOR_FIT_RMSE {
        out.push(CalibrationWarningFlag::PoorFit);
    }

    if !annealing.initial_error.is_finite() {
        out.push(CalibrationWarningFlag::NoFiniteObjective);
    }

    if annealing.iterations > 0 && annealing.acceptance_rate() < LOW_ACCEPTANCE_RATE {
        out.push(CalibrationWarningFlag::LowAcceptance);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn err(signed: f64) -> QuoteError {
        QuoteError {
            maturity: NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
            strike: 450.0,
            forward: 450.0,
            market_vol: 0.2,
            model_vol: 0.2 + signed,
            signed_error: signed,
            abs_error: signed.abs(),
        }
    }

    fn diag(accepted: usize, initial_error: f64) -> AnnealDiagnostics {
        AnnealDiagnostics {
            iterations: 1_000,
            objective_evaluations: 1_001,
            accepted,
            uphill_accepted: 0,
            non_finite_rejections: 0,
            initial_error,
            final_temperature: 0.0,
        }
    }

    #[test]
    fn fit_quality_aggregates_errors() {
        let fit = fit_quality(&[err(0.03), err(-0.04)]);
        assert!((fit.rmse - (0.0025_f64 / 2.0).sqrt()).abs() < 1e-15);
        assert!((fit.mae - 0.035).abs() < 1e-15);
        assert_eq!(fit.max_abs_error, 0.04);
    }

    #[test]
    fn clean_fit_raises_no_flags() {
        let p = SabrParams::new(0.3, 0.5, -0.3, 0.4).unwrap();
        let flags = warning_flags(&p, &fit_quality(&[err(0.001)]), &diag(400, 1.0));
        assert!(flags.is_empty());
    }

    #[test]
    fn flags_boundary_poor_fit_and_frozen_search() {
        let p = SabrParams::new(0.3, 1.0, -0.999, 0.4).unwrap();
        let flags = warning_flags(&p, &fit_quality(&[err(0.05)]), &diag(3, f64::NAN));
        assert_eq!(
            flags,
            vec![
                CalibrationWarningFlag::HitBoundary,
                CalibrationWarningFlag::PoorFit,
                CalibrationWarningFlag::NoFiniteObjective,
                CalibrationWarningFlag::LowAcceptance,
            ]
        );
    }
}
