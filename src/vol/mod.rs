//! Module `vol::mod`.
//!
//! Volatility smile parameterizations used by the calibration engine.
//!
//! References: Hagan et al. (2002).
//!
//! Primary API surface: module-level exports and submodule wiring.
pub mod sabr;

pub use sabr::{SabrParams, sabr_vol};
