//! Simulation configuration.
//!
//! A [`SimulationConfig`] is built from defaults, optionally overlaid by a
//! TOML file, and finally by command-line flags. [`SimulationConfig::validate`]
//! keeps every value inside the ranges the demonstration is designed for.
//!
//! ```toml
//! population_size = 10000
//! sample_size = 30
//! num_samples = 1000
//! bins = 30
//! seed = 42
//!
//! [distribution]
//! type = "exponential"
//! scale = 2.0
//! ```

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distributions::{
    Distribution, DistributionError, DistributionKind, Exponential, Multinomial, Normal, Uniform,
};
use crate::error::{CltError, CltResult};
use crate::experiment::{Experiment, ExperimentParams};

pub const UNIFORM_LOW_RANGE: RangeInclusive<f64> = 0.0..=10.0;
pub const UNIFORM_HIGH_MAX: f64 = 20.0;
/// Smallest allowed gap between the uniform bounds.
pub const UNIFORM_MIN_WIDTH: f64 = 0.1;
pub const NORMAL_MEAN_RANGE: RangeInclusive<f64> = -10.0..=10.0;
pub const NORMAL_STD_DEV_RANGE: RangeInclusive<f64> = 0.1..=10.0;
pub const EXPONENTIAL_SCALE_RANGE: RangeInclusive<f64> = 0.1..=10.0;
pub const MULTINOMIAL_TRIALS_RANGE: RangeInclusive<u64> = 1..=100;
pub const MULTINOMIAL_PROBABILITY_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const POPULATION_SIZE_RANGE: RangeInclusive<usize> = 1_000..=1_000_000;
pub const SAMPLE_SIZE_RANGE: RangeInclusive<usize> = 1..=500;
pub const NUM_SAMPLES_RANGE: RangeInclusive<usize> = 100..=10_000;
pub const BINS_RANGE: RangeInclusive<usize> = 1..=500;

pub const DEFAULT_BINS: usize = 30;

/// Distribution choice plus its parameters, as written in config files.
///
/// Omitted parameters take the per-kind defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionSpec {
    Uniform {
        #[serde(default = "default_low")]
        low: f64,
        #[serde(default = "default_high")]
        high: f64,
    },
    Normal {
        #[serde(default)]
        mean: f64,
        #[serde(default = "default_one")]
        std_dev: f64,
    },
    Exponential {
        #[serde(default = "default_one")]
        scale: f64,
    },
    Multinomial {
        #[serde(default = "default_trials")]
        trials: u64,
        #[serde(default = "default_probability")]
        success_probability: f64,
    },
}

fn default_low() -> f64 {
    0.0
}

fn default_high() -> f64 {
    10.0
}

fn default_one() -> f64 {
    1.0
}

fn default_trials() -> u64 {
    10
}

fn default_probability() -> f64 {
    0.5
}

impl Default for DistributionSpec {
    fn default() -> Self {
        Self::defaults_for(DistributionKind::Uniform)
    }
}

impl DistributionSpec {
    /// Default parameters for `kind`.
    pub fn defaults_for(kind: DistributionKind) -> Self {
        match kind {
            DistributionKind::Uniform => DistributionSpec::Uniform {
                low: default_low(),
                high: default_high(),
            },
            DistributionKind::Normal => DistributionSpec::Normal {
                mean: 0.0,
                std_dev: default_one(),
            },
            DistributionKind::Exponential => DistributionSpec::Exponential {
                scale: default_one(),
            },
            DistributionKind::Multinomial => DistributionSpec::Multinomial {
                trials: default_trials(),
                success_probability: default_probability(),
            },
        }
    }

    pub fn kind(&self) -> DistributionKind {
        match self {
            DistributionSpec::Uniform { .. } => DistributionKind::Uniform,
            DistributionSpec::Normal { .. } => DistributionKind::Normal,
            DistributionSpec::Exponential { .. } => DistributionKind::Exponential,
            DistributionSpec::Multinomial { .. } => DistributionKind::Multinomial,
        }
    }

    /// Builds the distribution, checking mathematical validity only.
    pub fn build(&self) -> Result<Distribution, DistributionError> {
        Ok(match *self {
            DistributionSpec::Uniform { low, high } => Uniform::new(low, high)?.into(),
            DistributionSpec::Normal { mean, std_dev } => Normal::new(mean, std_dev)?.into(),
            DistributionSpec::Exponential { scale } => Exponential::new(scale)?.into(),
            DistributionSpec::Multinomial {
                trials,
                success_probability,
            } => Multinomial::new(trials, success_probability)?.into(),
        })
    }

    /// Checks the parameters against the demonstration ranges.
    pub fn validate(&self) -> CltResult<()> {
        match *self {
            DistributionSpec::Uniform { low, high } => {
                check_range("distribution.low", low, &UNIFORM_LOW_RANGE)?;
                check_range(
                    "distribution.high",
                    high,
                    &((low + UNIFORM_MIN_WIDTH)..=UNIFORM_HIGH_MAX),
                )
            }
            DistributionSpec::Normal { mean, std_dev } => {
                check_range("distribution.mean", mean, &NORMAL_MEAN_RANGE)?;
                check_range("distribution.std_dev", std_dev, &NORMAL_STD_DEV_RANGE)
            }
            DistributionSpec::Exponential { scale } => {
                check_range("distribution.scale", scale, &EXPONENTIAL_SCALE_RANGE)
            }
            DistributionSpec::Multinomial {
                trials,
                success_probability,
            } => {
                check_range("distribution.trials", trials, &MULTINOMIAL_TRIALS_RANGE)?;
                check_range(
                    "distribution.success_probability",
                    success_probability,
                    &MULTINOMIAL_PROBABILITY_RANGE,
                )
            }
        }
    }
}

/// Full configuration of one demonstration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub distribution: DistributionSpec,
    pub population_size: usize,
    pub sample_size: usize,
    pub num_samples: usize,
    /// Histogram bins per panel.
    pub bins: usize,
    /// Fixed RNG seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let params = ExperimentParams::default();
        Self {
            distribution: DistributionSpec::default(),
            population_size: params.population_size,
            sample_size: params.sample_size,
            num_samples: params.num_samples,
            bins: DEFAULT_BINS,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> CltResult<Self> {
        toml::from_str(toml_str).map_err(|e| CltError::ConfigParse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> CltResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CltError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> CltResult<()> {
        self.distribution.validate()?;
        check_range("population_size", self.population_size, &POPULATION_SIZE_RANGE)?;
        check_range("sample_size", self.sample_size, &SAMPLE_SIZE_RANGE)?;
        check_range("num_samples", self.num_samples, &NUM_SAMPLES_RANGE)?;
        check_range("bins", self.bins, &BINS_RANGE)
    }

    pub fn params(&self) -> ExperimentParams {
        ExperimentParams {
            population_size: self.population_size,
            sample_size: self.sample_size,
            num_samples: self.num_samples,
        }
    }

    /// Validates the configuration and assembles the experiment.
    pub fn build_experiment(&self) -> CltResult<Experiment> {
        self.validate()?;
        Experiment::new(self.distribution.build()?, self.params())
    }
}

fn check_range<T>(field: &str, value: T, range: &RangeInclusive<T>) -> CltResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(CltError::config(
            field,
            format!(
                "{value} is outside the allowed range {}..={}",
                range.start(),
                range.end()
            ),
        ))
    }
}
