//! Core domain types and the library-wide error structure.

pub mod types;

pub use types::*;

use thiserror::Error;

/// Convenience alias for fallible library operations.
pub type Result<T> = std::result::Result<T, PricingError>;

/// Engine and model errors surfaced by the API.
///
/// Numerical kernels (the SABR formula, the calibration objective, the path
/// simulator and the payoff estimator) never return this type; they let
/// non-finite values propagate. Only constructors and orchestration code fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PricingError {
    /// Input validation error.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Non-convergence in an iterative algorithm.
    #[error("convergence failure: {0}")]
    ConvergenceFailure(String),
    /// Required market datum is unavailable.
    #[error("market data missing: {0}")]
    MarketDataMissing(String),
    /// Numerical issue (overflow, invalid state, etc.).
    #[error("numerical error: {0}")]
    NumericalError(String),
    /// Filesystem failure while reading quotes or settings.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed quote file.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Settings could not be loaded or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_variant() {
        let err = PricingError::InvalidInput("strike must be positive".into());
        assert_eq!(err.to_string(), "invalid input: strike must be positive");

        let err = PricingError::ConvergenceFailure("no finite objective".into());
        assert!(err.to_string().starts_with("convergence failure"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "quotes.csv");
        let err: PricingError = io.into();
        assert!(matches!(err, PricingError::Io(_)));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PricingError>();
    }
}
