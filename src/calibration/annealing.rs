//! Simulated annealing over the SABR parameter vector.
//!
//! Each iteration perturbs the current point with independent `N(0, step_size)` noise per
//! component, projects the candidate back onto the SABR domain and applies the Metropolis
//! rule. The temperature cools geometrically on every iteration.
//!
//! Non-finite objective values count as infinitely bad: such a candidate is never accepted
//! and never becomes the best point.

use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calibration::core::AnnealDiagnostics;
use crate::core::{PricingError, Result};
use crate::vol::SabrParams;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingOptions {
    /// Starting temperature `T0`.
    pub initial_temperature: f64,
    /// Geometric cooling factor applied after every iteration.
    pub cooling_rate: f64,
    pub iterations: usize,
    /// Standard deviation of the per-component proposal noise.
    pub step_size: f64,
    pub seed: u64,
    /// Keep the best error after each iteration.
    pub record_trace: bool,
}

impl Default for AnnealingOptions {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            cooling_rate: 0.95,
            iterations: 2_000,
            step_size: 0.01,
            seed: 42,
            record_trace: false,
        }
    }
}

impl AnnealingOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "initial temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(PricingError::InvalidInput(format!(
                "cooling rate must lie in (0, 1], got {}",
                self.cooling_rate
            )));
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "proposal step size must be positive and finite, got {}",
                self.step_size
            )));
        }
        Ok(())
    }
}

/// Running state of one annealing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationState {
    pub current: SabrParams,
    pub current_error: f64,
    pub best: SabrParams,
    pub best_error: f64,
    pub temperature: f64,
}

impl CalibrationState {
    /// Starts at `init`; a non-finite initial error is stored as `+inf`.
    pub fn new(init: SabrParams, init_error: f64, temperature: f64) -> Self {
        let err = sanitize_error(init_error);
        Self {
            current: init,
            current_error: err,
            best: init,
            best_error: err,
            temperature,
        }
    }

    /// Moves to `candidate`, updating the best point on strict improvement.
    fn accept(&mut self, candidate: SabrParams, error: f64) {
        self.current = candidate;
        self.current_error = error;
        if error < self.best_error {
            self.best = candidate;
            self.best_error = error;
        }
    }

    #[inline]
    fn cool(&mut self, rate: f64) {
        self.temperature *= rate;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnealResult {
    pub params: SabrParams,
    /// Best objective value; `+inf` when no finite value was ever seen.
    pub error: f64,
    pub diagnostics: AnnealDiagnostics,
    pub trace: Vec<f64>,
}

#[inline]
fn sanitize_error(e: f64) -> f64 {
    if e.is_finite() { e } else { f64::INFINITY }
}

fn propose<R: Rng + ?Sized>(current: &SabrParams, noise: &Normal<f64>, rng: &mut R) -> SabrParams {
    let x = current.to_array();
    let mut candidate = [0.0; 4];
    for (c, v) in candidate.iter_mut().zip(x) {
        *c = v + noise.sample(rng);
    }
    SabrParams::from_array(candidate).project()
}

/// Runs one annealing search from `init` using `rng` for proposals and Metropolis draws.
pub fn anneal<F, R>(
    mut objective: F,
    init: SabrParams,
    options: &AnnealingOptions,
    rng: &mut R,
) -> Result<AnnealResult>
where
    F: FnMut(&SabrParams) -> f64,
    R: Rng + ?Sized,
{
    options.validate()?;
    let noise = Normal::new(0.0, options.step_size)
        .map_err(|e| PricingError::InvalidInput(format!("proposal distribution: {e}")))?;

    let initial_error = objective(&init);
    let mut state = CalibrationState::new(init, initial_error, options.initial_temperature);
    let mut diagnostics = AnnealDiagnostics {
        iterations: options.iterations,
        objective_evaluations: 1,
        accepted: 0,
        uphill_accepted: 0,
        non_finite_rejections: 0,
        initial_error,
        final_temperature: options.initial_temperature,
    };
    let mut trace = Vec::with_capacity(if options.record_trace {
        options.iterations
    } else {
        0
    });

    for _ in 0..options.iterations {
        let candidate = propose(&state.current, &noise, rng);
        let candidate_error = objective(&candidate);
        diagnostics.objective_evaluations += 1;

        if !candidate_error.is_finite() {
            diagnostics.non_finite_rejections += 1;
        } else {
            let delta = candidate_error - state.current_error;
            if delta < 0.0 {
                state.accept(candidate, candidate_error);
                diagnostics.accepted += 1;
            } else {
                let u: f64 = rng.random();
                if (-delta / state.temperature).exp() > u {
                    state.accept(candidate, candidate_error);
                    diagnostics.accepted += 1;
                    diagnostics.uphill_accepted += 1;
                }
            }
        }

        state.cool(options.cooling_rate);
        if options.record_trace {
            trace.push(state.best_error);
        }
    }

    diagnostics.final_temperature = state.temperature;
    Ok(AnnealResult {
        params: state.best,
        error: state.best_error,
        diagnostics,
        trace,
    })
}

/// [`anneal`] with a `StdRng` seeded from `options.seed`.
pub fn anneal_seeded<F>(objective: F, init: SabrParams, options: &AnnealingOptions) -> Result<AnnealResult>
where
    F: FnMut(&SabrParams) -> f64,
{
    let mut rng = StdRng::seed_from_u64(options.seed);
    anneal(objective, init, options, &mut rng)
}

/// Independent runs from each start, seeded `seed + i * 7919`, keeping the lowest error.
pub fn anneal_multi_start<F>(
    mut objective: F,
    starts: &[SabrParams],
    options: &AnnealingOptions,
) -> Result<AnnealResult>
where
    F: FnMut(&SabrParams) -> f64,
{
    let mut best: Option<AnnealResult> = None;
    for (i, start) in starts.iter().enumerate() {
        let run_options = AnnealingOptions {
            seed: options.seed.wrapping_add(i as u64 * 7_919),
            ..*options
        };
        let run = anneal_seeded(&mut objective, *start, &run_options)?;
        debug!(
            run = i,
            error = run.error,
            accepted = run.diagnostics.accepted,
            "annealing run finished"
        );

        best = match best {
            Some(b) if b.error <= run.error => Some(b),
            _ => Some(run),
        };
    }

    best.ok_or_else(|| PricingError::InvalidInput("multi-start requires at least one start".to_string()))
}
