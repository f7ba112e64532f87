//! Payoff estimators evaluated over simulated path ensembles.

pub mod asian;

pub use crate::core::types::OptionType;
pub use asian::{
    AsianStrike, McEstimate, arithmetic_average, asian_estimate, asian_estimate_with,
    price_asian_option,
};
