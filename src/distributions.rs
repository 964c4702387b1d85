//! Named population distributions.
//!
//! The fixed set of distributions a CLT experiment can draw from, with
//! analytical moments (used for the theoretical prediction) and sampling.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | [`Uniform`] | low, high | (low+high)/2 | (high−low)²/12 |
//! | [`Normal`] | μ, σ | μ | σ² |
//! | [`Exponential`] | scale θ | θ | θ² |
//! | [`Multinomial`] | trials n, success probability p | n·p | n·p·(1−p) |
//!
//! Sampling is delegated to `rand` / `rand_distr`; this module only owns
//! parameter validation and the closed-form moments.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand_distr::{Binomial, Distribution as _, Exp1, StandardNormal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::special;

/// Error type for invalid distribution parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),

    /// The distribution name is not one of the supported kinds.
    #[error("unknown distribution '{0}' (expected uniform, normal, exponential or multinomial)")]
    UnknownKind(String),
}

// ============================================================================
// Uniform Distribution
// ============================================================================

/// Continuous uniform distribution on `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    low: f64,
    high: f64,
}

impl Uniform {
    /// Creates a new uniform distribution on `[low, high)`.
    ///
    /// # Errors
    /// Returns `Err` if `low >= high`, either bound is not finite, or the
    /// width `high − low` overflows.
    pub fn new(low: f64, high: f64) -> Result<Self, DistributionError> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(DistributionError::InvalidParameters(format!(
                "Uniform requires finite low < high, got low={low}, high={high}"
            )));
        }
        if !(high - low).is_finite() {
            return Err(DistributionError::InvalidParameters(format!(
                "Uniform width overflows f64, got low={low}, high={high}"
            )));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn mean(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn variance(&self) -> f64 {
        let range = self.high - self.low;
        range * range / 12.0
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x >= self.low && x < self.high {
            1.0 / (self.high - self.low)
        } else {
            0.0
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.low {
            0.0
        } else if x >= self.high {
            1.0
        } else {
            (x - self.low) / (self.high - self.low)
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.low..self.high)
    }
}

// ============================================================================
// Normal Distribution
// ============================================================================

/// Normal (Gaussian) distribution N(μ, σ²).
///
/// Samples are `μ + σ·Z` with `Z` drawn from `rand_distr::StandardNormal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// # Errors
    /// Returns `Err` if `sigma ≤ 0` or parameters are not finite.
    pub fn new(mu: f64, sigma: f64) -> Result<Self, DistributionError> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Normal requires finite μ and σ > 0, got μ={mu}, σ={sigma}"
            )));
        }
        Ok(Self { mu, sigma })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn mean(&self) -> f64 {
        self.mu
    }

    pub fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    /// PDF: (1/(σ√(2π))) exp(−(x−μ)²/(2σ²)).
    pub fn pdf(&self, x: f64) -> f64 {
        special::standard_normal_pdf((x - self.mu) / self.sigma) / self.sigma
    }

    /// CDF: Φ((x−μ)/σ).
    pub fn cdf(&self, x: f64) -> f64 {
        special::standard_normal_cdf((x - self.mu) / self.sigma)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        self.mu + self.sigma * z
    }
}

// ============================================================================
// Exponential Distribution
// ============================================================================

/// Exponential distribution parameterised by its scale θ = 1/λ.
///
/// - PDF: f(x) = exp(−x/θ)/θ for x ≥ 0
/// - CDF: F(x) = 1 − exp(−x/θ)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    scale: f64,
}

impl Exponential {
    /// # Errors
    /// Returns `Err` if `scale ≤ 0` or is not finite.
    pub fn new(scale: f64) -> Result<Self, DistributionError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Exponential requires finite scale > 0, got scale={scale}"
            )));
        }
        Ok(Self { scale })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn mean(&self) -> f64 {
        self.scale
    }

    pub fn variance(&self) -> f64 {
        self.scale * self.scale
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            (-x / self.scale).exp() / self.scale
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            1.0 - (-x / self.scale).exp()
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let e: f64 = rng.sample(Exp1);
        self.scale * e
    }
}

// ============================================================================
// Multinomial (two outcomes)
// ============================================================================

/// Two-outcome multinomial: each draw is the number of successes in
/// `trials` independent trials with probability `success_probability`.
///
/// With two categories the multinomial count vector is fully described by
/// its first component, so a draw is a single non-negative integer (returned
/// as `f64` to share the sampling pipeline with the continuous kinds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multinomial {
    trials: u64,
    success_probability: f64,
}

impl Multinomial {
    /// # Errors
    /// Returns `Err` if `trials == 0` or `success_probability ∉ [0, 1]`.
    pub fn new(trials: u64, success_probability: f64) -> Result<Self, DistributionError> {
        if trials == 0 {
            return Err(DistributionError::InvalidParameters(
                "Multinomial requires at least one trial".into(),
            ));
        }
        if !(0.0..=1.0).contains(&success_probability) {
            return Err(DistributionError::InvalidParameters(format!(
                "Multinomial requires 0 ≤ p ≤ 1, got p={success_probability}"
            )));
        }
        Ok(Self {
            trials,
            success_probability,
        })
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn success_probability(&self) -> f64 {
        self.success_probability
    }

    pub fn mean(&self) -> f64 {
        self.trials as f64 * self.success_probability
    }

    pub fn variance(&self) -> f64 {
        let p = self.success_probability;
        self.trials as f64 * p * (1.0 - p)
    }

    fn sampler(&self) -> Binomial {
        // Parameters were validated in `new`, which is everything
        // `Binomial::new` checks.
        Binomial::new(self.trials, self.success_probability)
            .expect("validated multinomial parameters")
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        self.sampler().sample(rng) as f64
    }

    fn sample_n<R: Rng>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        let sampler = self.sampler();
        (0..n).map(|_| sampler.sample(rng) as f64).collect()
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// The names of the supported distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
    Uniform,
    Normal,
    Exponential,
    Multinomial,
}

impl DistributionKind {
    pub const ALL: [DistributionKind; 4] = [
        DistributionKind::Uniform,
        DistributionKind::Normal,
        DistributionKind::Exponential,
        DistributionKind::Multinomial,
    ];

    /// Display name, as shown in plot captions and reports.
    pub fn label(self) -> &'static str {
        match self {
            DistributionKind::Uniform => "Uniform",
            DistributionKind::Normal => "Normal",
            DistributionKind::Exponential => "Exponential",
            DistributionKind::Multinomial => "Multinomial",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DistributionKind {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(DistributionKind::Uniform),
            "normal" | "gaussian" => Ok(DistributionKind::Normal),
            "exponential" => Ok(DistributionKind::Exponential),
            "multinomial" | "binomial" => Ok(DistributionKind::Multinomial),
            _ => Err(DistributionError::UnknownKind(s.to_string())),
        }
    }
}

/// A validated distribution from the supported set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    Uniform(Uniform),
    Normal(Normal),
    Exponential(Exponential),
    Multinomial(Multinomial),
}

impl Distribution {
    pub fn kind(&self) -> DistributionKind {
        match self {
            Distribution::Uniform(_) => DistributionKind::Uniform,
            Distribution::Normal(_) => DistributionKind::Normal,
            Distribution::Exponential(_) => DistributionKind::Exponential,
            Distribution::Multinomial(_) => DistributionKind::Multinomial,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().label()
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self, Distribution::Multinomial(_))
    }

    /// Short parameter description, e.g. `low=0, high=10`.
    pub fn describe(&self) -> String {
        match self {
            Distribution::Uniform(d) => format!("low={}, high={}", d.low, d.high),
            Distribution::Normal(d) => format!("mean={}, std_dev={}", d.mu, d.sigma),
            Distribution::Exponential(d) => format!("scale={}", d.scale),
            Distribution::Multinomial(d) => {
                format!("trials={}, p={}", d.trials, d.success_probability)
            }
        }
    }

    pub fn mean(&self) -> f64 {
        match self {
            Distribution::Uniform(d) => d.mean(),
            Distribution::Normal(d) => d.mean(),
            Distribution::Exponential(d) => d.mean(),
            Distribution::Multinomial(d) => d.mean(),
        }
    }

    pub fn variance(&self) -> f64 {
        match self {
            Distribution::Uniform(d) => d.variance(),
            Distribution::Normal(d) => d.variance(),
            Distribution::Exponential(d) => d.variance(),
            Distribution::Multinomial(d) => d.variance(),
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Density at `x`, or `None` for the discrete kind.
    pub fn pdf(&self, x: f64) -> Option<f64> {
        match self {
            Distribution::Uniform(d) => Some(d.pdf(x)),
            Distribution::Normal(d) => Some(d.pdf(x)),
            Distribution::Exponential(d) => Some(d.pdf(x)),
            Distribution::Multinomial(_) => None,
        }
    }

    /// Draws a single value.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            Distribution::Uniform(d) => d.sample(rng),
            Distribution::Normal(d) => d.sample(rng),
            Distribution::Exponential(d) => d.sample(rng),
            Distribution::Multinomial(d) => d.sample(rng),
        }
    }

    /// Draws `n` independent values.
    pub fn sample_n<R: Rng>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        match self {
            Distribution::Multinomial(d) => d.sample_n(rng, n),
            _ => (0..n).map(|_| self.sample(rng)).collect(),
        }
    }
}

impl From<Uniform> for Distribution {
    fn from(d: Uniform) -> Self {
        Distribution::Uniform(d)
    }
}

impl From<Normal> for Distribution {
    fn from(d: Normal) -> Self {
        Distribution::Normal(d)
    }
}

impl From<Exponential> for Distribution {
    fn from(d: Exponential) -> Self {
        Distribution::Exponential(d)
    }
}

impl From<Multinomial> for Distribution {
    fn from(d: Multinomial) -> Self {
        Distribution::Multinomial(d)
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn uniform_samples_stay_in_support(
            low in -100.0_f64..0.0,
            width in 0.1_f64..100.0,
            seed in 0_u64..10_000,
        ) {
            let d = Distribution::from(Uniform::new(low, low + width).unwrap());
            let mut rng = create_rng(seed);
            for x in d.sample_n(&mut rng, 64) {
                prop_assert!(x >= low && x < low + width);
            }
        }

        #[test]
        fn continuous_cdf_in_unit_interval(
            mu in -10.0_f64..10.0,
            sigma in 0.1_f64..10.0,
            scale in 0.1_f64..10.0,
            x in -50.0_f64..50.0,
        ) {
            let n = Normal::new(mu, sigma).unwrap();
            let e = Exponential::new(scale).unwrap();
            prop_assert!((0.0..=1.0).contains(&n.cdf(x)));
            prop_assert!((0.0..=1.0).contains(&e.cdf(x)));
        }

        #[test]
        fn multinomial_variance_bounded_by_mean(
            trials in 1_u64..100,
            p in 0.0_f64..=1.0,
        ) {
            let m = Multinomial::new(trials, p).unwrap();
            prop_assert!(m.variance() <= m.mean() + 1e-12);
            prop_assert!(m.variance() >= 0.0);
        }
    }
}
