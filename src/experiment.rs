//! The Central Limit Theorem experiment.
//!
//! One run draws a population from the chosen distribution, then draws
//! `num_samples` fresh samples of `sample_size` values and records each
//! sample's mean. The two data sets are summarised and compared against
//! the CLT prediction: the sample means should be approximately
//! `N(μ, σ/√n)` where μ and σ are the population moments.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::distributions::{Distribution, Normal};
use crate::error::{CltError, CltResult};
use crate::stats::{self, Summary};

/// Sizes controlling one experiment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExperimentParams {
    pub population_size: usize,
    pub sample_size: usize,
    pub num_samples: usize,
}

impl Default for ExperimentParams {
    fn default() -> Self {
        Self {
            population_size: 10_000,
            sample_size: 30,
            num_samples: 1_000,
        }
    }
}

/// Closed-form moments predicted by the CLT.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TheoreticalMoments {
    /// Population mean μ, also the expected mean of the sample means.
    pub mean: f64,
    /// Population standard deviation σ.
    pub std_dev: f64,
    /// σ/√n, the predicted standard deviation of the sample means.
    pub standard_error: f64,
}

impl TheoreticalMoments {
    pub fn new(distribution: &Distribution, sample_size: usize) -> Self {
        let std_dev = distribution.std_dev();
        Self {
            mean: distribution.mean(),
            std_dev,
            standard_error: std_dev / (sample_size as f64).sqrt(),
        }
    }

    /// The normal limit `N(μ, σ/√n)`, or `None` when σ is zero.
    pub fn limiting_normal(&self) -> Option<Normal> {
        Normal::new(self.mean, self.standard_error).ok()
    }
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    pub distribution: Distribution,
    pub params: ExperimentParams,
    pub population: Vec<f64>,
    pub sample_means: Vec<f64>,
    pub population_summary: Summary,
    pub means_summary: Summary,
    pub theory: TheoreticalMoments,
    /// Kolmogorov–Smirnov distance between the sample means and their
    /// limiting normal. `None` for a degenerate (zero-variance) population.
    pub normality: Option<f64>,
}

/// A distribution paired with its run sizes.
#[derive(Debug, Clone)]
pub struct Experiment {
    distribution: Distribution,
    params: ExperimentParams,
}

impl Experiment {
    /// # Errors
    /// Returns [`CltError::Config`] if any size is zero.
    pub fn new(distribution: Distribution, params: ExperimentParams) -> CltResult<Self> {
        for (field, value) in [
            ("population_size", params.population_size),
            ("sample_size", params.sample_size),
            ("num_samples", params.num_samples),
        ] {
            if value == 0 {
                return Err(CltError::config(field, "must be greater than 0"));
            }
        }
        Ok(Self {
            distribution,
            params,
        })
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn params(&self) -> &ExperimentParams {
        &self.params
    }

    pub fn run<R: Rng>(&self, rng: &mut R) -> CltResult<ExperimentOutcome> {
        let span = info_span!("experiment", distribution = self.distribution.name());
        let _guard = span.enter();
        let ExperimentParams {
            population_size,
            sample_size,
            num_samples,
        } = self.params;

        info!(
            params = %self.distribution.describe(),
            population_size,
            sample_size,
            num_samples,
            "running experiment"
        );

        let population = self.distribution.sample_n(rng, population_size);
        if population.iter().any(|x| !x.is_finite()) {
            return Err(CltError::NonFinite("population"));
        }
        debug!(values = population.len(), "population drawn");

        let sample_means = sample_means(&self.distribution, sample_size, num_samples, rng)?;
        debug!(values = sample_means.len(), "sample means drawn");

        let population_summary = Summary::from_data(&population)
            .ok_or(CltError::EmptyData("population has no finite values"))?;
        let means_summary = Summary::from_data(&sample_means)
            .ok_or(CltError::EmptyData("sample means have no finite values"))?;

        let theory = TheoreticalMoments::new(&self.distribution, sample_size);
        let normality = theory
            .limiting_normal()
            .map(|limit| ks_statistic(&sample_means, |x| limit.cdf(x)));

        info!(
            population_mean = population_summary.mean,
            population_std_dev = population_summary.std_dev,
            means_mean = means_summary.mean,
            means_std_dev = means_summary.std_dev,
            predicted_standard_error = theory.standard_error,
            "experiment finished"
        );

        Ok(ExperimentOutcome {
            distribution: self.distribution,
            params: self.params,
            population,
            sample_means,
            population_summary,
            means_summary,
            theory,
            normality,
        })
    }
}

/// Draws `num_samples` independent samples of `sample_size` values and
/// returns the mean of each.
///
/// Every sample comes fresh from the distribution rather than from a
/// previously drawn population.
///
/// # Errors
/// Returns [`CltError::Config`] if `sample_size` is zero and
/// [`CltError::NonFinite`] if any sample mean is infinite or NaN.
pub fn sample_means<R: Rng>(
    distribution: &Distribution,
    sample_size: usize,
    num_samples: usize,
    rng: &mut R,
) -> CltResult<Vec<f64>> {
    if sample_size == 0 {
        return Err(CltError::config("sample_size", "must be greater than 0"));
    }
    (0..num_samples)
        .map(|_| {
            stats::mean(&distribution.sample_n(rng, sample_size))
                .filter(|m| m.is_finite())
                .ok_or(CltError::NonFinite("sample means"))
        })
        .collect()
}

/// Kolmogorov–Smirnov statistic `sup |F_n(x) − F(x)|` of `data` against
/// the reference CDF `cdf`.
///
/// Returns 0 for empty data.
pub fn ks_statistic<F: Fn(f64) -> f64>(data: &[f64], cdf: F) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;

    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            let above = (i + 1) as f64 / n - f;
            let below = f - i as f64 / n;
            above.max(below)
        })
        .fold(0.0, f64::max)
}

/// One row of a sample-size sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub sample_size: usize,
    pub observed_standard_error: f64,
    pub predicted_standard_error: f64,
    pub ks_statistic: Option<f64>,
}

/// Repeats the sample-mean loop for each sample size and reports how the
/// spread of the means tracks `σ/√n`.
///
/// # Errors
/// Returns [`CltError::Config`] for an empty size list or a zero size.
pub fn sweep<R: Rng>(
    distribution: &Distribution,
    sample_sizes: &[usize],
    num_samples: usize,
    rng: &mut R,
) -> CltResult<Vec<SweepPoint>> {
    if sample_sizes.is_empty() {
        return Err(CltError::config("sample_sizes", "at least one size required"));
    }
    if num_samples < 2 {
        return Err(CltError::config("num_samples", "must be at least 2"));
    }
    if sample_sizes.contains(&0) {
        return Err(CltError::config("sample_sizes", "sizes must be greater than 0"));
    }

    let _guard = info_span!("sweep", distribution = distribution.name()).entered();
    sample_sizes
        .iter()
        .map(|&sample_size| -> CltResult<SweepPoint> {
            let means = sample_means(distribution, sample_size, num_samples, rng)?;
            let theory = TheoreticalMoments::new(distribution, sample_size);
            let observed = stats::population_std_dev(&means)
                .ok_or(CltError::EmptyData("sample means have no finite values"))?;
            let ks = theory
                .limiting_normal()
                .map(|limit| ks_statistic(&means, |x| limit.cdf(x)));
            debug!(sample_size, observed, predicted = theory.standard_error, "sweep point");
            Ok(SweepPoint {
                sample_size,
                observed_standard_error: observed,
                predicted_standard_error: theory.standard_error,
                ks_statistic: ks,
            })
        })
        .collect()
}
