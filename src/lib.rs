//! ferric-sabr calibrates a SABR stochastic-volatility model to market implied volatilities
//! and prices an arithmetic-average Asian option by Monte Carlo under the fitted dynamics.
//!
//! The pipeline has four numerical stages:
//! - the Hagan SABR implied-vol formula (`vol::sabr`),
//! - a simulated annealing search minimising squared vol errors across maturities
//!   (`calibration`),
//! - an Euler-Maruyama SABR path simulator (`mc::sabr`),
//! - an arithmetic Asian payoff estimator over the simulated paths (`pricing::asian`).
//!
//! References used across modules include:
//! - Hagan, Kumar, Lesniewski and Woodward (2002) for SABR asymptotics.
//! - Kirkpatrick, Gelatt and Vecchi (1983) for simulated annealing.
//! - Glasserman (2004) for Monte Carlo estimators.
//!
//! Numerical considerations:
//! - The calibrator projects every proposal onto the SABR domain and treats non-finite
//!   objective values as infinitely bad.
//! - Simulation and annealing are reproducible from a `u64` seed.
//! - The volatility SDE is stepped without a floor by default; `VolScheme::Truncated`
//!   clamps it at zero.
//!
//! # Quick Start
//! Evaluate the SABR smile:
//! ```rust
//! use ferric_sabr::vol::SabrParams;
//!
//! let p = SabrParams::new(0.3, 0.5, -0.4, 0.6).unwrap();
//! let atm = p.implied_vol(100.0, 100.0);
//! let otm_put = p.implied_vol(100.0, 80.0);
//! assert!(otm_put > atm);
//! ```
//!
//! Simulate paths and price an Asian call:
//! ```rust
//! use ferric_sabr::mc::{SabrSimulation, simulate_sabr_seeded};
//! use ferric_sabr::pricing::price_asian_option;
//! use ferric_sabr::vol::SabrParams;
//!
//! let params = SabrParams::new(0.2, 1.0, -0.3, 0.4).unwrap();
//! let sim = SabrSimulation::from_params(&params, 100.0, 1.0, 52, 2_000);
//! let paths = simulate_sabr_seeded(&sim, 7);
//! let px = price_asian_option(&paths, 100.0);
//! assert!(px > 0.0 && px < 20.0);
//! ```
//!
//! Calibrate to quotes:
//! ```rust
//! use chrono::NaiveDate;
//! use ferric_sabr::calibration::{Calibrator, SabrCalibrator};
//! use ferric_sabr::market::{MarketContext, MarketQuote, QuoteBook};
//!
//! let m = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
//! let book = QuoteBook::from_quotes([
//!     MarketQuote::new(m, 420.0, 0.21),
//!     MarketQuote::new(m, 450.0, 0.18),
//!     MarketQuote::new(m, 480.0, 0.16),
//! ])
//! .unwrap();
//! let market = MarketContext::builder()
//!     .spot(448.5)
//!     .rate(0.0435)
//!     .collection_date(NaiveDate::from_ymd_opt(2025, 1, 28).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let fit = SabrCalibrator::default().calibrate(&book, &market).unwrap();
//! assert!(fit.objective.is_finite());
//! ```

pub mod calibration;
pub mod config;
pub mod core;
pub mod market;
pub mod mc;
pub mod models;
pub mod pipeline;
pub mod pricing;
pub mod rates;
pub mod vol;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::calibration::{
        AnnealingOptions, CalibrationResult, Calibrator, SabrCalibrator, anneal, anneal_seeded,
    };
    pub use crate::core::{OptionType, PricingError};
    pub use crate::market::{
        MarketContext, MarketQuote, MaturityGroup, QuoteBook, load_quotes_csv,
    };
    pub use crate::mc::{PathEnsemble, SabrSimulation, simulate_sabr, simulate_sabr_seeded};
    pub use crate::pipeline::{PipelineConfig, PipelineReport, run_pipeline};
    pub use crate::pricing::{McEstimate, asian_estimate, price_asian_option};
    pub use crate::vol::{SabrParams, sabr_vol};
}
