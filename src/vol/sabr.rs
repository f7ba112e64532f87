//! Module `vol::sabr`.
//!
//! Implements the SABR implied-volatility approximation used as the building block of the
//! smile calibration objective, with concrete routines such as `sabr_vol`.
//!
//! References: Hagan et al. (2002), "Managing Smile Risk", leading-order expansion.
//!
//! Key types and purpose: `SabrParams` is the `(alpha, beta, rho, nu)` tuple shared by the
//! calibrator and the path simulator.
//!
//! Numerical considerations: the formula carries no time-correction term. Out-of-domain
//! inputs (non-positive forward or strike) yield NaN/inf rather than an error. The
//! `z / x(z)` ratio is singular at `z = 0`; near it the forward is bumped once and, if the
//! bumped point is still unstable, the ratio is replaced by its series expansion.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{PricingError, Result};

/// Correlation is clamped to `[-RHO_LIMIT, RHO_LIMIT]` to keep `x(z)` finite.
pub const RHO_LIMIT: f64 = 0.999;
/// Lower bound applied to `alpha` and `nu` when projecting onto the domain.
pub const PARAM_FLOOR: f64 = 1e-5;
/// `|z|` below this value is treated as numerically at-the-money.
pub const NEAR_ATM_THRESHOLD: f64 = 1e-8;
/// Additive forward bump applied once when `|z|` falls inside the unstable band.
pub const ATM_FORWARD_BUMP: f64 = 1e-5;

/// SABR parameter tuple `(alpha, beta, rho, nu)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SabrParams {
    /// Instantaneous volatility level, `alpha > 0`.
    pub alpha: f64,
    /// CEV elasticity, `beta` in `[0, 1]`.
    pub beta: f64,
    /// Price/vol correlation, `rho` in `(-1, 1)`.
    pub rho: f64,
    /// Volatility of volatility, `nu > 0`.
    pub nu: f64,
}

impl SabrParams {
    /// Builds a parameter set, rejecting values outside the model domain.
    pub fn new(alpha: f64, beta: f64, rho: f64, nu: f64) -> Result<Self> {
        let params = Self {
            alpha,
            beta,
            rho,
            nu,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks the open/closed domain of every component.
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "alpha must be positive and finite, got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(PricingError::InvalidInput(format!(
                "beta must be in [0, 1], got {}",
                self.beta
            )));
        }
        if self.rho.is_nan() || self.rho.abs() >= 1.0 {
            return Err(PricingError::InvalidInput(format!(
                "rho must be in (-1, 1), got {}",
                self.rho
            )));
        }
        if !self.nu.is_finite() || self.nu <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "nu must be positive and finite, got {}",
                self.nu
            )));
        }
        Ok(())
    }

    /// True when the tuple already lies inside the projected calibration domain.
    pub fn is_admissible(&self) -> bool {
        self.alpha >= PARAM_FLOOR
            && self.nu >= PARAM_FLOOR
            && (0.0..=1.0).contains(&self.beta)
            && (-RHO_LIMIT..=RHO_LIMIT).contains(&self.rho)
    }

    /// Projects onto the calibration domain: `beta` clamped to `[0, 1]`, `rho` to
    /// `[-0.999, 0.999]`, `alpha` and `nu` floored at `1e-5`.
    pub fn project(self) -> Self {
        Self {
            alpha: self.alpha.max(PARAM_FLOOR),
            beta: self.beta.clamp(0.0, 1.0),
            rho: self.rho.clamp(-RHO_LIMIT, RHO_LIMIT),
            nu: self.nu.max(PARAM_FLOOR),
        }
    }

    /// Implied volatility at `(forward, strike)`.
    #[inline]
    pub fn implied_vol(&self, forward: f64, strike: f64) -> f64 {
        sabr_vol(forward, strike, self.alpha, self.beta, self.rho, self.nu)
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.alpha, self.beta, self.rho, self.nu]
    }

    pub fn from_array(x: [f64; 4]) -> Self {
        Self {
            alpha: x[0],
            beta: x[1],
            rho: x[2],
            nu: x[3],
        }
    }
}

impl Default for SabrParams {
    fn default() -> Self {
        Self {
            alpha: 0.2,
            beta: 0.2,
            rho: -0.5,
            nu: 0.2,
        }
    }
}

impl fmt::Display for SabrParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[alpha={:.6}, beta={:.6}, rho={:.6}, nu={:.6}]",
            self.alpha, self.beta, self.rho, self.nu
        )
    }
}

/// SABR implied volatility for forward `f` and strike `k`.
///
/// At the money (`f == k`, exact equality) the closed-form expansion is used.
/// Elsewhere the value is `alpha / (f k)^((1 - beta) / 2) * z / x(z)`.
///
/// # Examples
/// ```rust
/// use ferric_sabr::vol::sabr::sabr_vol;
///
/// let atm = sabr_vol(100.0, 100.0, 0.2, 1.0, 0.0, 0.3);
/// let otm = sabr_vol(100.0, 120.0, 0.2, 1.0, 0.0, 0.3);
/// assert!(atm > 0.2 && otm > 0.2);
/// ```
pub fn sabr_vol(f: f64, k: f64, alpha: f64, beta: f64, rho: f64, nu: f64) -> f64 {
    if f == k {
        return atm_vol(f, alpha, beta, rho, nu);
    }
    if let Some(vol) = off_atm_vol(f, k, alpha, beta, rho, nu) {
        return vol;
    }

    // Single bump; never recurses further.
    let bumped = f + ATM_FORWARD_BUMP;
    if bumped == k {
        return atm_vol(bumped, alpha, beta, rho, nu);
    }
    off_atm_vol(bumped, k, alpha, beta, rho, nu)
        .unwrap_or_else(|| series_vol(bumped, k, alpha, beta, rho, nu))
}

fn atm_vol(f: f64, alpha: f64, beta: f64, rho: f64, nu: f64) -> f64 {
    let one_minus_beta = 1.0 - beta;
    let f_pow = f.powf(one_minus_beta);
    let f_pow2 = f.powf(2.0 - 2.0 * beta);

    let correction = 1.0
        + (one_minus_beta * one_minus_beta / 24.0) * (alpha * alpha / f_pow2)
        + (rho * beta * nu * alpha) / (4.0 * f_pow)
        + ((2.0 - 3.0 * rho * rho) / 24.0) * nu * nu;

    (alpha / f_pow) * correction
}

#[inline]
fn z_of(f: f64, k: f64, alpha: f64, beta: f64, nu: f64) -> (f64, f64) {
    let fk_pow_half = (f * k).powf(0.5 * (1.0 - beta));
    let z = (nu / alpha) * fk_pow_half * (f / k).ln();
    (z, fk_pow_half)
}

/// Returns `None` when `|z|` is inside the near-ATM band.
fn off_atm_vol(f: f64, k: f64, alpha: f64, beta: f64, rho: f64, nu: f64) -> Option<f64> {
    let (z, fk_pow_half) = z_of(f, k, alpha, beta, nu);
    if z.abs() < NEAR_ATM_THRESHOLD {
        return None;
    }

    let xz = ((1.0 - 2.0 * rho * z + z * z).sqrt() + z - rho) / (1.0 - rho);
    Some((alpha / fk_pow_half) * (z / xz.ln()))
}

fn series_vol(f: f64, k: f64, alpha: f64, beta: f64, rho: f64, nu: f64) -> f64 {
    let (z, fk_pow_half) = z_of(f, k, alpha, beta, nu);
    let ratio = 1.0 - 0.5 * rho * z + ((2.0 - 3.0 * rho * rho) / 12.0) * z * z;
    (alpha / fk_pow_half) * ratio
}
