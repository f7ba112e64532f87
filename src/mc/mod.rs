//! Monte Carlo path generation.

pub mod sabr;

pub use sabr::{PathEnsemble, SabrSimulation, simulate_sabr, simulate_sabr_seeded};
