//! Descriptive statistics with numerical stability guarantees.
//!
//! Every function handles empty and non-finite input explicitly and
//! returns `None` rather than a meaningless number.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier-compensated summation, O(ε) error independent of n.
//! - **Variance/StdDev**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Skewness/Kurtosis**: extended Welford update of M₃, M₄
//!   (Pébay 2008, SAND2008-6212).

use serde::Serialize;

/// Computes the arithmetic mean using compensated summation.
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use clt_lab::stats::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Sample variance (Bessel's correction, denominator `n − 1`).
///
/// # Returns
/// - `None` if `data.len() < 2` or contains NaN/Inf.
///
/// # Examples
/// ```
/// use clt_lab::stats::variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    WelfordAccumulator::from_slice(data)?.sample_variance()
}

/// Population variance (denominator `n`).
///
/// # Examples
/// ```
/// use clt_lab::stats::population_variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((population_variance(&v).unwrap() - 4.0).abs() < 1e-10);
/// ```
pub fn population_variance(data: &[f64]) -> Option<f64> {
    WelfordAccumulator::from_slice(data)?.population_variance()
}

/// Sample standard deviation, `sqrt(variance(data))`.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Population standard deviation, `sqrt(population_variance(data))`.
///
/// This is the figure reported in experiment summaries.
pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    population_variance(data).map(f64::sqrt)
}

/// Returns the minimum value, or `None` if `data` is empty or contains NaN.
pub fn min(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.min(x))
        }
    })
}

/// Returns the maximum value, or `None` if `data` is empty or contains NaN.
pub fn max(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::NEG_INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.max(x))
        }
    })
}

/// Neumaier's improved Kahan summation.
///
/// Handles the case where the addend is larger in magnitude than the
/// running sum, which plain Kahan summation does not.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for mean, variance, skewness, and kurtosis.
///
/// Maintains central moment sums M₂, M₃, M₄ incrementally. The update
/// order (M₄ → M₃ → M₂) matters: each uses the *previous* values of the
/// lower moments.
///
/// # Examples
/// ```
/// use clt_lab::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
    m3: f64,
    m4: f64,
}

impl WelfordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an accumulator over `data`, or `None` if it is empty or
    /// contains a non-finite value.
    pub fn from_slice(data: &[f64]) -> Option<Self> {
        if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
            return None;
        }
        let mut acc = Self::new();
        for &x in data {
            acc.update(x);
        }
        Some(acc)
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        let n1 = self.count;
        self.count += 1;

        if n1 == 0 {
            // Moments stay zero; avoids delta² overflow for huge first values.
            self.mean_acc = value;
            return;
        }

        let n = self.count as f64;
        let delta = value - self.mean_acc;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        let term1 = delta * delta_n * n1 as f64;

        self.m4 += term1 * delta_n2 * (n * n - 3.0 * n + 3.0)
            + 6.0 * delta_n2 * self.m2
            - 4.0 * delta_n * self.m3;
        self.m3 += term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        self.m2 += term1;
        self.mean_acc += delta_n;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean_acc)
    }

    pub fn sample_variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    pub fn population_variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    pub fn population_std_dev(&self) -> Option<f64> {
        self.population_variance().map(f64::sqrt)
    }

    /// Fisher's adjusted sample skewness (G₁), as Excel `SKEW()`.
    ///
    /// `None` with fewer than 3 samples or zero variance.
    pub fn skewness(&self) -> Option<f64> {
        if self.count < 3 || self.m2 == 0.0 {
            return None;
        }
        let n = self.count as f64;
        let g1 = n.sqrt() * self.m3 / self.m2.powf(1.5);
        let correction = (n * (n - 1.0)).sqrt() / (n - 2.0);
        Some(correction * g1)
    }

    /// Fisher's excess kurtosis (G₂) with bias correction, as Excel `KURT()`.
    ///
    /// Zero for a normal distribution. `None` with fewer than 4 samples or
    /// zero variance.
    pub fn kurtosis(&self) -> Option<f64> {
        if self.count < 4 || self.m2 == 0.0 {
            return None;
        }
        let n = self.count as f64;
        let g2 = n * self.m4 / (self.m2 * self.m2) - 3.0;
        let correction = (n - 1.0) / ((n - 2.0) * (n - 3.0));
        Some(correction * ((n + 1.0) * g2 + 6.0))
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Descriptive summary of one data set.
///
/// `std_dev` is the population standard deviation (denominator `n`).
/// Skewness and excess kurtosis make the CLT visible numerically: both
/// shrink towards zero for the sample means as the sample size grows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub skewness: Option<f64>,
    pub excess_kurtosis: Option<f64>,
}

impl Summary {
    /// Summarises `data`, or `None` if it is empty or has non-finite values.
    pub fn from_data(data: &[f64]) -> Option<Self> {
        let acc = WelfordAccumulator::from_slice(data)?;
        Some(Self {
            count: data.len(),
            mean: mean(data)?,
            std_dev: acc.population_std_dev()?,
            min: min(data)?,
            max: max(data)?,
            skewness: acc.skewness(),
            excess_kurtosis: acc.kurtosis(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[42.0]), Some(42.0));
    }

    #[test]
    fn test_mean_rejects_bad_input() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), None);
        assert_eq!(mean(&[1.0, f64::INFINITY, 3.0]), None);
    }

    #[test]
    fn test_variance_basic() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
        assert!((population_variance(&v).unwrap() - 4.0).abs() < 1e-10);
        assert!((population_std_dev(&v).unwrap() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_variance_needs_two_samples() {
        assert_eq!(variance(&[1.0]), None);
        assert_eq!(population_variance(&[1.0]), Some(0.0));
    }

    #[test]
    fn test_variance_offset_stability() {
        let base = 1e9;
        let v: Vec<f64> = [1.0, 2.0, 3.0, 4.0, 5.0].iter().map(|x| x + base).collect();
        let var = variance(&v).unwrap();
        assert!((var - 2.5).abs() < 1e-6, "variance of offset data = {var}");
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min(&[3.0, 1.0, 4.0, 1.0, 5.0]), Some(1.0));
        assert_eq!(max(&[3.0, 1.0, 4.0, 1.0, 5.0]), Some(5.0));
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[1.0, f64::NAN]), None);
    }

    #[test]
    fn test_kahan_sum_cancellation() {
        let v = [1.0, 1e100, 1.0, -1e100];
        assert_eq!(kahan_sum(&v), 2.0);
    }

    #[test]
    fn test_skewness_symmetric_is_zero() {
        let acc = WelfordAccumulator::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(acc.skewness().unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_skewness_right_tail_positive() {
        let acc = WelfordAccumulator::from_slice(&[1.0, 1.0, 1.0, 2.0, 10.0]).unwrap();
        assert!(acc.skewness().unwrap() > 0.0);
    }

    #[test]
    fn test_kurtosis_known_value() {
        // Excel KURT({2,4,4,4,5,5,7,9}) = 0.940625
        let acc = WelfordAccumulator::from_slice(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
            .unwrap();
        assert!((acc.kurtosis().unwrap() - 0.940625).abs() < 1e-6);
    }

    #[test]
    fn test_higher_moments_need_spread() {
        let acc = WelfordAccumulator::from_slice(&[3.0; 10]).unwrap();
        assert_eq!(acc.skewness(), None);
        assert_eq!(acc.kurtosis(), None);
    }

    #[test]
    fn test_summary_from_data() {
        let s = Summary::from_data(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.count, 8);
        assert!((s.mean - 5.0).abs() < 1e-15);
        assert!((s.std_dev - 2.0).abs() < 1e-12);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
        assert!(s.skewness.is_some());
        assert!(s.excess_kurtosis.is_some());
    }

    #[test]
    fn test_summary_empty_or_non_finite() {
        assert!(Summary::from_data(&[]).is_none());
        assert!(Summary::from_data(&[1.0, f64::NAN]).is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-1e6_f64..1e6, min_len..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn variance_non_negative(data in finite_vec(2, 100)) {
            prop_assert!(variance(&data).unwrap() >= 0.0);
            prop_assert!(population_variance(&data).unwrap() >= 0.0);
        }

        #[test]
        fn mean_between_min_and_max(data in finite_vec(1, 100)) {
            let m = mean(&data).unwrap();
            let lo = min(&data).unwrap();
            let hi = max(&data).unwrap();
            prop_assert!(m >= lo - 1e-9 && m <= hi + 1e-9);
        }

        #[test]
        fn welford_matches_two_pass(data in finite_vec(2, 100)) {
            let m = mean(&data).unwrap();
            let two_pass = data.iter().map(|x| (x - m) * (x - m)).sum::<f64>()
                / data.len() as f64;
            let welford = population_variance(&data).unwrap();
            prop_assert!((two_pass - welford).abs() <= 1e-6 * two_pass.max(1.0));
        }

        #[test]
        fn summary_std_dev_matches_population_std_dev(data in finite_vec(1, 100)) {
            let s = Summary::from_data(&data).unwrap();
            let sd = population_std_dev(&data).unwrap();
            prop_assert!((s.std_dev - sd).abs() < 1e-12);
        }
    }
}
