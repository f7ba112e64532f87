//! End-to-end flow: calibrate SABR to the quote book, simulate from the forward and price an
//! arithmetic Asian call on the simulated paths.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calibration::{CalibrationResult, Calibrator, SabrCalibrator};
use crate::core::{OptionType, PricingError, Result};
use crate::market::{MarketContext, QuoteBook};
use crate::mc::{SabrSimulation, simulate_sabr_seeded};
use crate::models::VolScheme;
use crate::pricing::{McEstimate, asian_estimate};
use crate::rates::discount_factor;
use crate::vol::SabrParams;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub calibrator: SabrCalibrator,
    /// Option maturity in years.
    pub maturity: f64,
    pub steps: usize,
    pub paths: usize,
    pub seed: u64,
    pub vol_scheme: VolScheme,
    /// Asian strike; the forward at `maturity` when `None`.
    pub strike: Option<f64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            calibrator: SabrCalibrator::default(),
            maturity: 1.0,
            steps: 252,
            paths: 10_000,
            seed: 42,
            vol_scheme: VolScheme::Euler,
            strike: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub params: SabrParams,
    pub calibration_error: f64,
    /// `S0 * exp(r * T)`; also the simulation's starting price.
    pub forward: f64,
    pub strike: f64,
    pub maturity: f64,
    /// Undiscounted Asian call estimate.
    pub asian: McEstimate,
    pub discount_factor: f64,
    /// `discount_factor * asian.price`.
    pub discounted_price: f64,
    pub calibration: CalibrationResult<SabrParams>,
}

pub fn run_pipeline(
    quotes: &QuoteBook,
    market: &MarketContext,
    config: &PipelineConfig,
) -> Result<PipelineReport> {
    let calibration = config.calibrator.calibrate(quotes, market)?;
    let params = calibration.params;

    let forward = market.implied_forward(config.maturity);
    let strike = config.strike.unwrap_or(forward);

    let sim = SabrSimulation::from_params(&params, forward, config.maturity, config.steps, config.paths)
        .with_vol_scheme(config.vol_scheme);
    sim.validate()?;

    info!(
        paths = sim.paths,
        steps = sim.steps,
        forward,
        sigma0 = sim.sigma0,
        "simulating SABR paths"
    );
    let ensemble = simulate_sabr_seeded(&sim, config.seed);
    let asian = asian_estimate(&ensemble, OptionType::Call, strike);
    if !asian.price.is_finite() {
        return Err(PricingError::NumericalError(format!(
            "Asian estimate is not finite ({}) for params {params}",
            asian.price
        )));
    }

    let df = discount_factor(market.rate, config.maturity);
    info!(
        price = asian.price,
        stderr = asian.stderr,
        discounted = df * asian.price,
        strike,
        "Asian option priced"
    );

    Ok(PipelineReport {
        params,
        calibration_error: calibration.objective,
        forward,
        strike,
        maturity: config.maturity,
        asian,
        discount_factor: df,
        discounted_price: df * asian.price,
        calibration,
    })
}
