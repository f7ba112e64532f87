//! Run settings loaded from an optional TOML file and `FERRIC_SABR__*` environment variables.
//!
//! Later sources override earlier ones:
//! 1. built-in defaults,
//! 2. the TOML file (explicit path, else `config/default.toml` when present),
//! 3. environment variables such as `FERRIC_SABR__SIMULATION__PATHS=50000`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::calibration::{AnnealingOptions, SabrCalibrator};
use crate::core::{PricingError, Result};
use crate::market::MarketContext;
use crate::models::VolScheme;
use crate::pipeline::PipelineConfig;
use crate::rates::DayCountConvention;
use crate::vol::SabrParams;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FERRIC_SABR";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub market: MarketSettings,
    #[serde(default)]
    pub calibration: CalibrationSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    pub spot: f64,
    pub rate: f64,
    pub collection_date: NaiveDate,
    pub day_count: DayCountConvention,
    /// CSV file with `maturity,strike,implied_vol,forward` rows.
    pub quotes: Option<PathBuf>,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            spot: 448.5,
            rate: 0.0435,
            collection_date: NaiveDate::from_ymd_opt(2025, 1, 28).unwrap_or_default(),
            day_count: DayCountConvention::Act365Fixed,
            quotes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    pub initial_params: SabrParams,
    pub annealing: AnnealingOptions,
    pub additional_starts: Vec<SabrParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Option maturity in years.
    pub maturity: f64,
    pub steps: usize,
    pub paths: usize,
    pub seed: u64,
    pub vol_scheme: VolScheme,
    /// Fixed Asian strike; the simulated forward when unset.
    pub strike: Option<f64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            maturity: 1.0,
            steps: 252,
            paths: 10_000,
            seed: 42,
            vol_scheme: VolScheme::Euler,
            strike: None,
        }
    }
}

impl Settings {
    /// Loads defaults, then the TOML file, then environment overrides, and validates.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name("config/default").required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.market_context()?;
        self.calibration.initial_params.validate()?;
        for start in &self.calibration.additional_starts {
            start.validate()?;
        }
        self.calibration.annealing.validate()?;

        let sim = &self.simulation;
        if sim.paths == 0 || sim.steps == 0 {
            return Err(PricingError::InvalidInput(
                "simulation paths and steps must be > 0".to_string(),
            ));
        }
        if !sim.maturity.is_finite() || sim.maturity <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "simulation maturity must be positive, got {}",
                sim.maturity
            )));
        }
        if let Some(k) = sim.strike
            && (!k.is_finite() || k <= 0.0)
        {
            return Err(PricingError::InvalidInput(format!(
                "strike must be positive, got {k}"
            )));
        }
        Ok(())
    }

    pub fn market_context(&self) -> Result<MarketContext> {
        MarketContext::builder()
            .spot(self.market.spot)
            .rate(self.market.rate)
            .collection_date(self.market.collection_date)
            .day_count(self.market.day_count)
            .build()
    }

    pub fn calibrator(&self) -> SabrCalibrator {
        SabrCalibrator::new(self.calibration.initial_params, self.calibration.annealing)
            .with_additional_starts(self.calibration.additional_starts.clone())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            calibrator: self.calibrator(),
            maturity: self.simulation.maturity,
            steps: self.simulation.steps,
            paths: self.simulation.paths,
            seed: self.simulation.seed,
            vol_scheme: self.simulation.vol_scheme,
            strike: self.simulation.strike,
        }
    }
}
