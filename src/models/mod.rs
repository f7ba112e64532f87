//! Stochastic dynamics stepped by the Monte Carlo engine.
//!
//! `Sabr` carries the static SABR parameters; the evolving price and volatility are passed in
//! by the caller so the same model value can drive any number of paths.

use serde::{Deserialize, Serialize};

/// Floor applied to the price before raising it to the CEV power `beta`.
pub const PRICE_FLOOR: f64 = 1e-5;

/// Discretization applied to the volatility SDE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolScheme {
    /// Plain Euler step; volatility may cross zero.
    #[default]
    Euler,
    /// Euler step with volatility truncated at zero after every step.
    Truncated,
}

/// SABR dynamics `dS = sigma S^beta dW`, `dsigma = nu sigma dZ`, `<dW, dZ> = rho dt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sabr {
    pub beta: f64,
    pub rho: f64,
    pub nu: f64,
}

impl Sabr {
    pub fn validate(&self) -> bool {
        (0.0..=1.0).contains(&self.beta)
            && self.nu >= 0.0
            && self.rho >= -1.0
            && self.rho <= 1.0
            && self.nu.is_finite()
    }

    /// One Euler-Maruyama step from `(s, sigma)` given independent normals `z1`, `z2`.
    ///
    /// Returns `(s_next, sigma_next)`. Neither coordinate is floored.
    pub fn step_euler(&self, s: f64, sigma: f64, dt: f64, z1: f64, z2: f64) -> (f64, f64) {
        let sqrt_dt = dt.sqrt();

        // Correlated Brownian increments.
        let dw = sqrt_dt * z1;
        let dz = sqrt_dt * (self.rho * z1 + (1.0 - self.rho * self.rho).max(0.0).sqrt() * z2);

        let s_next = s + sigma * s.max(PRICE_FLOOR).powf(self.beta) * dw;
        let sigma_next = sigma + self.nu * sigma * dz;

        (s_next, sigma_next)
    }

    /// Step under the requested volatility scheme.
    #[inline]
    pub fn step(
        &self,
        scheme: VolScheme,
        s: f64,
        sigma: f64,
        dt: f64,
        z1: f64,
        z2: f64,
    ) -> (f64, f64) {
        let (s_next, sigma_next) = self.step_euler(s, sigma, dt, z1, z2);
        match scheme {
            VolScheme::Euler => (s_next, sigma_next),
            VolScheme::Truncated => (s_next, sigma_next.max(0.0)),
        }
    }
}
