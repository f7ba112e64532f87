//! SABR calibration framework.
//!
//! - `Calibrator` trait and serde-compatible `CalibrationResult` payload,
//! - sum-of-squares vol objective over maturity-grouped quotes,
//! - simulated annealing search with explicit per-run state,
//! - fit diagnostics and warning flags.

pub mod annealing;
pub mod core;
pub mod diagnostics;
pub mod objective;
pub mod sabr;

pub use annealing::{
    AnnealResult, AnnealingOptions, CalibrationState, anneal, anneal_multi_start, anneal_seeded,
};
pub use self::core::{
    AnnealDiagnostics, CalibrationResult, CalibrationWarningFlag, Calibrator, FitQuality,
    QuoteError,
};
pub use diagnostics::{fit_quality, hits_boundary, warning_flags};
pub use objective::{calibration_error, global_calibration_error, quote_errors};
pub use sabr::SabrCalibrator;
