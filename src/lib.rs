//! # clt-lab
//!
//! A hands-on demonstration of the Central Limit Theorem.
//!
//! Pick a distribution, draw a population from it, then draw many small
//! samples and look at the distribution of their means: whatever the shape
//! of the population, the means pile up into a bell curve centred on μ
//! with spread σ/√n.
//!
//! ## Modules
//!
//! - [`distributions`]: the supported distributions and their moments
//! - [`experiment`]: population draw, repeated sample means, sample-size sweep
//! - [`stats`]: descriptive statistics with numerical stability guarantees
//! - [`histogram`]: fixed-width, density-normalised histograms
//! - [`plot`]: two-panel SVG rendering
//! - [`report`]: summary lines, text histograms, JSON report
//! - [`config`]: TOML configuration and range validation
//!
//! ## Example
//!
//! ```
//! use clt_lab::config::SimulationConfig;
//! use clt_lab::random::create_rng;
//! use clt_lab::report::summary_lines;
//!
//! let config = SimulationConfig::default();
//! let outcome = config.build_experiment()?.run(&mut create_rng(42))?;
//! let [population, means] = summary_lines(&outcome);
//! assert!(population.starts_with("Original Distribution - Mean:"));
//! assert!(means.starts_with("Sample Means Distribution - Mean:"));
//! # Ok::<(), clt_lab::error::CltError>(())
//! ```

pub mod config;
pub mod distributions;
pub mod error;
pub mod experiment;
pub mod histogram;
pub mod plot;
pub mod random;
pub mod report;
pub mod special;
pub mod stats;

pub use config::{DistributionSpec, SimulationConfig};
pub use distributions::{Distribution, DistributionKind};
pub use error::{CltError, CltResult};
pub use experiment::{Experiment, ExperimentOutcome, ExperimentParams};
