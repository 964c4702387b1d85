//! Standard normal density and distribution functions.
//!
//! Used by [`crate::distributions::Normal`] and by the normality check that
//! compares sample means against their predicted normal limit.

/// 1/√(2π) ≈ 0.3989422804014327
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Approximation of the standard normal CDF Φ(x) = P(Z ≤ x) for Z ~ N(0,1).
///
/// # Algorithm
/// Abramowitz & Stegun formula 26.2.17, polynomial approximation with
/// Horner evaluation.
///
/// # Accuracy
/// Maximum absolute error < 7.5 × 10⁻⁸.
///
/// # Examples
/// ```
/// use clt_lab::special::standard_normal_cdf;
/// assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-7);
/// assert!((standard_normal_cdf(1.96) - 0.975).abs() < 1e-3);
/// ```
pub fn standard_normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }

    // Φ(-x) = 1 - Φ(x)
    let abs_x = x.abs();
    let k = 1.0 / (1.0 + 0.231_641_9 * abs_x);
    let phi = FRAC_1_SQRT_2PI * (-0.5 * abs_x * abs_x).exp();
    let poly = k
        * (0.319_381_530
            + k * (-0.356_563_782
                + k * (1.781_477_937 + k * (-1.821_255_978 + k * 1.330_274_429))));

    let upper = 1.0 - phi * poly;
    if x >= 0.0 {
        upper
    } else {
        1.0 - upper
    }
}

/// Standard normal PDF φ(x) = (1/√(2π)) exp(-x²/2).
///
/// # Examples
/// ```
/// use clt_lab::special::standard_normal_pdf;
/// assert!((standard_normal_pdf(0.0) - 0.3989422804014327).abs() < 1e-15);
/// ```
pub fn standard_normal_pdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdf_at_zero() {
        assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_cdf_symmetry() {
        for &x in &[0.5, 1.0, 1.5, 2.0, 2.5, 3.0] {
            let sum = standard_normal_cdf(x) + standard_normal_cdf(-x);
            assert!((sum - 1.0).abs() < 1e-7, "Φ({x}) + Φ(-{x}) = {sum}");
        }
    }

    #[test]
    fn test_cdf_68_95_997() {
        let within = |k: f64| standard_normal_cdf(k) - standard_normal_cdf(-k);
        assert!((within(1.0) - 0.6827).abs() < 1e-3);
        assert!((within(2.0) - 0.9545).abs() < 1e-3);
        assert!((within(3.0) - 0.9973).abs() < 1e-3);
    }

    #[test]
    fn test_cdf_extremes() {
        assert_eq!(standard_normal_cdf(f64::INFINITY), 1.0);
        assert_eq!(standard_normal_cdf(f64::NEG_INFINITY), 0.0);
        assert!(standard_normal_cdf(f64::NAN).is_nan());
    }

    #[test]
    fn test_pdf_symmetric_and_peaked() {
        assert!((standard_normal_pdf(1.3) - standard_normal_pdf(-1.3)).abs() < 1e-15);
        assert!(standard_normal_pdf(0.0) > standard_normal_pdf(0.1));
        assert!(standard_normal_pdf(f64::NAN).is_nan());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn cdf_in_unit_interval(x in -40.0_f64..40.0) {
            let c = standard_normal_cdf(x);
            prop_assert!((0.0..=1.0).contains(&c));
        }

        #[test]
        fn cdf_monotonic(a in -8.0_f64..8.0, b in -8.0_f64..8.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(standard_normal_cdf(lo) <= standard_normal_cdf(hi) + 1e-12);
        }
    }
}
