//! Module `pricing::asian`.
//!
//! Arithmetic-average Asian payoffs estimated over a simulated [`PathEnsemble`].
//!
//! References: Glasserman (2004), Ch. 1.1.
//!
//! Numerical considerations: the estimator is plain Monte Carlo without variance reduction,
//! so the standard error decays as `O(1 / sqrt(paths))`. Payoffs are floored at zero through
//! `f64::max`, which also maps a NaN average to a zero payoff.

use serde::{Deserialize, Serialize};

use crate::core::OptionType;
use crate::mc::PathEnsemble;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AsianStrike {
    /// Average is compared to a fixed strike.
    Fixed(f64),
    /// Terminal price is compared to the average.
    Floating,
}

/// Monte Carlo estimate with its standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct McEstimate {
    pub price: f64,
    pub stderr: f64,
    pub paths: usize,
}

impl McEstimate {
    /// Scales price and standard error by a discount factor.
    pub fn discounted(self, discount_factor: f64) -> Self {
        Self {
            price: discount_factor * self.price,
            stderr: discount_factor * self.stderr,
            paths: self.paths,
        }
    }
}

/// Arithmetic mean of a path, every observation weighted equally.
#[inline]
pub fn arithmetic_average(path: &[f64]) -> f64 {
    path.iter().sum::<f64>() / path.len() as f64
}

fn asian_payoff(option_type: OptionType, strike: AsianStrike, avg: f64, s_t: f64) -> f64 {
    match strike {
        AsianStrike::Fixed(k) => option_type.intrinsic(avg, k),
        AsianStrike::Floating => option_type.intrinsic(s_t, avg),
    }
}

/// Undiscounted arithmetic-average Asian call price over the ensemble.
///
/// Each path is averaged over every column, step 0 included. The result is never negative.
pub fn price_asian_option(ensemble: &PathEnsemble, strike: f64) -> f64 {
    asian_estimate(ensemble, OptionType::Call, strike).price
}

/// Undiscounted fixed-strike Asian estimate with standard error.
pub fn asian_estimate(ensemble: &PathEnsemble, option_type: OptionType, strike: f64) -> McEstimate {
    asian_estimate_with(ensemble, option_type, AsianStrike::Fixed(strike))
}

/// Undiscounted Asian estimate for a fixed or floating strike.
pub fn asian_estimate_with(
    ensemble: &PathEnsemble,
    option_type: OptionType,
    strike: AsianStrike,
) -> McEstimate {
    let payoffs: Vec<f64> = ensemble
        .price_paths()
        .map(|path| {
            let avg = arithmetic_average(path);
            let s_t = path[path.len() - 1];
            asian_payoff(option_type, strike, avg, s_t)
        })
        .collect();

    if payoffs.is_empty() {
        return McEstimate {
            price: 0.0,
            stderr: 0.0,
            paths: 0,
        };
    }

    let n = payoffs.len() as f64;
    let mean = payoffs.iter().sum::<f64>() / n;
    let var = if payoffs.len() > 1 {
        payoffs.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
    } else {
        0.0
    };

    McEstimate {
        price: mean,
        stderr: (var / n).sqrt(),
        paths: payoffs.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ensemble(rows: &[&[f64]]) -> PathEnsemble {
        let cols = rows[0].len();
        let price: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        let vol = vec![0.2; price.len()];
        PathEnsemble::from_grids(rows.len(), cols, price, vol).unwrap()
    }

    #[test]
    fn average_includes_initial_observation() {
        let ens = ensemble(&[&[100.0, 110.0, 120.0]]);
        assert_relative_eq!(price_asian_option(&ens, 100.0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn call_price_is_mean_of_floored_payoffs() {
        let ens = ensemble(&[&[100.0, 104.0], &[100.0, 90.0], &[100.0, 120.0]]);
        // averages 102, 95, 110 against K = 100
        let est = asian_estimate(&ens, OptionType::Call, 100.0);
        assert_relative_eq!(est.price, (2.0 + 0.0 + 10.0) / 3.0, epsilon = 1e-12);
        assert_eq!(est.paths, 3);
        assert!(est.stderr > 0.0);
    }

    #[test]
    fn put_uses_reversed_intrinsic() {
        let ens = ensemble(&[&[100.0, 104.0], &[100.0, 90.0]]);
        let est = asian_estimate(&ens, OptionType::Put, 100.0);
        assert_relative_eq!(est.price, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn floating_strike_compares_terminal_to_average() {
        let ens = ensemble(&[&[100.0, 110.0, 120.0]]);
        let est = asian_estimate_with(&ens, OptionType::Call, AsianStrike::Floating);
        assert_relative_eq!(est.price, 10.0, epsilon = 1e-12);
        assert_eq!(est.stderr, 0.0);
    }

    #[test]
    fn nan_paths_do_not_produce_negative_prices() {
        let ens = ensemble(&[&[100.0, f64::NAN], &[100.0, 100.0]]);
        let px = price_asian_option(&ens, 50.0);
        assert!(px >= 0.0);
        assert_relative_eq!(px, 25.0, epsilon = 1e-12);
    }

    #[test]
    fn discounting_scales_both_moments() {
        let est = McEstimate {
            price: 10.0,
            stderr: 0.5,
            paths: 100,
        };
        let d = est.discounted(0.9);
        assert_relative_eq!(d.price, 9.0, epsilon = 1e-12);
        assert_relative_eq!(d.stderr, 0.45, epsilon = 1e-12);
    }
}
