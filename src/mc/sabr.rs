//! Module `mc::sabr`.
//!
//! Euler-Maruyama path ensembles for the SABR model.
//!
//! Key types and purpose: `SabrSimulation` describes one ensemble request, `PathEnsemble`
//! holds the simulated price and volatility grids, `simulate_sabr` fills them.
//!
//! Numerical considerations:
//! - Normals are consumed step-major: for step `t` and path `p`, `Z1` then `Z2`. The same
//!   seed therefore reproduces the ensemble bit for bit.
//! - Under `VolScheme::Euler` the volatility path may turn negative; that discretization
//!   artifact is left in place unless `VolScheme::Truncated` is selected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::core::{PricingError, Result};
use crate::models::{Sabr, VolScheme};
use crate::vol::SabrParams;

/// Inputs for one SABR path ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SabrSimulation {
    /// Initial price on every path.
    pub s0: f64,
    /// Initial volatility on every path.
    pub sigma0: f64,
    pub beta: f64,
    pub rho: f64,
    pub nu: f64,
    /// Horizon in years.
    pub maturity: f64,
    /// Number of time steps; grids carry `steps + 1` columns.
    pub steps: usize,
    pub paths: usize,
    #[serde(default)]
    pub vol_scheme: VolScheme,
}

impl SabrSimulation {
    /// Simulation started from `s0` with `sigma0 = alpha` and the remaining calibrated params.
    pub fn from_params(
        params: &SabrParams,
        s0: f64,
        maturity: f64,
        steps: usize,
        paths: usize,
    ) -> Self {
        Self {
            s0,
            sigma0: params.alpha,
            beta: params.beta,
            rho: params.rho,
            nu: params.nu,
            maturity,
            steps,
            paths,
            vol_scheme: VolScheme::default(),
        }
    }

    pub fn with_vol_scheme(mut self, vol_scheme: VolScheme) -> Self {
        self.vol_scheme = vol_scheme;
        self
    }

    #[inline]
    pub fn model(&self) -> Sabr {
        Sabr {
            beta: self.beta,
            rho: self.rho,
            nu: self.nu,
        }
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.maturity / self.steps as f64
    }

    pub fn validate(&self) -> Result<()> {
        if self.paths == 0 {
            return Err(PricingError::InvalidInput(
                "simulation paths must be > 0".to_string(),
            ));
        }
        if self.steps == 0 {
            return Err(PricingError::InvalidInput(
                "simulation steps must be > 0".to_string(),
            ));
        }
        if !self.maturity.is_finite() || self.maturity <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "simulation maturity must be positive and finite, got {}",
                self.maturity
            )));
        }
        if !self.s0.is_finite() || !self.sigma0.is_finite() {
            return Err(PricingError::InvalidInput(
                "simulation initial state must be finite".to_string(),
            ));
        }
        if !self.model().validate() {
            return Err(PricingError::InvalidInput(format!(
                "simulation requires beta in [0, 1], rho in [-1, 1], nu >= 0; got beta={}, rho={}, nu={}",
                self.beta, self.rho, self.nu
            )));
        }
        Ok(())
    }
}

/// Simulated price and volatility grids, `paths x (steps + 1)`, row-major by path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEnsemble {
    paths: usize,
    columns: usize,
    price: Vec<f64>,
    volatility: Vec<f64>,
}

impl PathEnsemble {
    fn filled(paths: usize, steps: usize, s0: f64, sigma0: f64) -> Self {
        let columns = steps + 1;
        Self {
            paths,
            columns,
            price: vec![s0; paths * columns],
            volatility: vec![sigma0; paths * columns],
        }
    }

    /// Builds an ensemble from explicit row-major grids.
    pub fn from_grids(
        paths: usize,
        columns: usize,
        price: Vec<f64>,
        volatility: Vec<f64>,
    ) -> Result<Self> {
        if price.len() != paths * columns || volatility.len() != paths * columns {
            return Err(PricingError::InvalidInput(format!(
                "grid length mismatch: expected {} values, got price={} volatility={}",
                paths * columns,
                price.len(),
                volatility.len()
            )));
        }
        Ok(Self {
            paths,
            columns,
            price,
            volatility,
        })
    }

    /// `(paths, steps + 1)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.paths, self.columns)
    }

    #[inline]
    pub fn num_paths(&self) -> usize {
        self.paths
    }

    #[inline]
    pub fn price(&self, path: usize, step: usize) -> f64 {
        self.price[path * self.columns + step]
    }

    #[inline]
    pub fn volatility(&self, path: usize, step: usize) -> f64 {
        self.volatility[path * self.columns + step]
    }

    /// Price trajectory of one path, step 0 included.
    #[inline]
    pub fn price_path(&self, path: usize) -> &[f64] {
        let start = path * self.columns;
        &self.price[start..start + self.columns]
    }

    #[inline]
    pub fn volatility_path(&self, path: usize) -> &[f64] {
        let start = path * self.columns;
        &self.volatility[start..start + self.columns]
    }

    pub fn price_paths(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.price.chunks_exact(self.columns.max(1))
    }
}

/// Simulates the ensemble described by `sim` with normals drawn from `rng`.
///
/// Inputs are not validated here; call [`SabrSimulation::validate`] first when they come
/// from outside the crate.
pub fn simulate_sabr<R: Rng + ?Sized>(sim: &SabrSimulation, rng: &mut R) -> PathEnsemble {
    let mut ensemble = PathEnsemble::filled(sim.paths, sim.steps, sim.s0, sim.sigma0);
    let model = sim.model();
    let dt = sim.dt();
    let cols = ensemble.columns;

    for t in 1..cols {
        for p in 0..sim.paths {
            let z1: f64 = StandardNormal.sample(rng);
            let z2: f64 = StandardNormal.sample(rng);

            let prev = p * cols + t - 1;
            let (s_next, sigma_next) = model.step(
                sim.vol_scheme,
                ensemble.price[prev],
                ensemble.volatility[prev],
                dt,
                z1,
                z2,
            );
            ensemble.price[prev + 1] = s_next;
            ensemble.volatility[prev + 1] = sigma_next;
        }
    }

    ensemble
}

/// Convenience wrapper seeding a `StdRng` from `seed`.
pub fn simulate_sabr_seeded(sim: &SabrSimulation, seed: u64) -> PathEnsemble {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate_sabr(sim, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_sim() -> SabrSimulation {
        SabrSimulation {
            s0: 100.0,
            sigma0: 0.2,
            beta: 0.5,
            rho: 0.0,
            nu: 0.3,
            maturity: 1.0,
            steps: 4,
            paths: 3,
            vol_scheme: VolScheme::Euler,
        }
    }

    #[test]
    fn ensemble_has_expected_shape_and_initial_column() {
        let ens = simulate_sabr_seeded(&reference_sim(), 7);
        assert_eq!(ens.shape(), (3, 5));
        for p in 0..3 {
            assert_eq!(ens.price(p, 0), 100.0);
            assert_eq!(ens.volatility(p, 0), 0.2);
            assert_eq!(ens.price_path(p).len(), 5);
        }
    }

    #[test]
    fn same_seed_is_bit_identical() {
        let a = simulate_sabr_seeded(&reference_sim(), 42);
        let b = simulate_sabr_seeded(&reference_sim(), 42);
        assert_eq!(a, b);
        let c = simulate_sabr_seeded(&reference_sim(), 43);
        assert_ne!(a, c);
    }

    #[test]
    fn draws_are_step_major() {
        let sim = reference_sim();
        let ens = simulate_sabr_seeded(&sim, 11);

        let mut rng = StdRng::seed_from_u64(11);
        let model = sim.model();
        let mut state = vec![(sim.s0, sim.sigma0); sim.paths];
        for t in 1..=sim.steps {
            for (p, st) in state.iter_mut().enumerate() {
                let z1: f64 = StandardNormal.sample(&mut rng);
                let z2: f64 = StandardNormal.sample(&mut rng);
                *st = model.step_euler(st.0, st.1, sim.dt(), z1, z2);
                assert_eq!(ens.price(p, t), st.0);
                assert_eq!(ens.volatility(p, t), st.1);
            }
        }
    }

    #[test]
    fn zero_vol_paths_stay_flat() {
        let sim = SabrSimulation {
            sigma0: 0.0,
            nu: 0.0,
            ..reference_sim()
        };
        let ens = simulate_sabr_seeded(&sim, 3);
        assert!(ens.price_paths().flatten().all(|&s| s == 100.0));
    }

    #[test]
    fn validation_rejects_degenerate_requests() {
        assert!(reference_sim().validate().is_ok());
        assert!(SabrSimulation { paths: 0, ..reference_sim() }.validate().is_err());
        assert!(SabrSimulation { steps: 0, ..reference_sim() }.validate().is_err());
        assert!(SabrSimulation { maturity: 0.0, ..reference_sim() }.validate().is_err());
        assert!(SabrSimulation { beta: 1.5, ..reference_sim() }.validate().is_err());
    }

    #[test]
    fn from_grids_checks_lengths() {
        assert!(PathEnsemble::from_grids(2, 3, vec![1.0; 6], vec![0.2; 6]).is_ok());
        assert!(PathEnsemble::from_grids(2, 3, vec![1.0; 5], vec![0.2; 6]).is_err());
    }
}
