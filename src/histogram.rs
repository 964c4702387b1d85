//! Fixed-width histograms with density normalisation.
//!
//! Bins span `[min, max]` of the data in `bins` equal steps. Every bin is
//! half-open `[lo, hi)` except the last, which also contains `max`.
//! Constant data gets the unit range `[v − 0.5, v + 0.5]`.

use serde::Serialize;

use crate::error::{CltError, CltResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
}

impl Histogram {
    /// Bins `data` into `bins` equal-width buckets spanning its range.
    ///
    /// # Errors
    /// - [`CltError::EmptyData`] if `data` is empty.
    /// - [`CltError::Histogram`] if `bins == 0` or any value is not finite.
    ///
    /// # Examples
    /// ```
    /// use clt_lab::histogram::Histogram;
    /// let h = Histogram::from_data(&[0.0, 1.0, 1.0, 2.0], 2).unwrap();
    /// assert_eq!(h.counts(), &[1, 3]);
    /// ```
    pub fn from_data(data: &[f64], bins: usize) -> CltResult<Self> {
        if bins == 0 {
            return Err(CltError::Histogram("bin count must be positive".into()));
        }
        if data.is_empty() {
            return Err(CltError::EmptyData("histogram needs at least one value"));
        }
        if let Some(bad) = data.iter().find(|x| !x.is_finite()) {
            return Err(CltError::Histogram(format!("non-finite value {bad}")));
        }

        let (mut lo, mut hi) = data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        Ok(Self::with_range(data, bins, lo, hi))
    }

    fn with_range(data: &[f64], bins: usize, lo: f64, hi: f64) -> Self {
        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0_u64; bins];
        for &x in data {
            let idx = ((x - lo) / width).floor();
            // x == hi lands one past the end; fold it into the last bin.
            let idx = if idx < 0.0 { 0 } else { (idx as usize).min(bins - 1) };
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    /// Bin edges, `bins + 1` values.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn bin_width(&self) -> f64 {
        (self.edges[self.edges.len() - 1] - self.edges[0]) / self.bins() as f64
    }

    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    /// `[lo, hi)` bounds of bin `i`.
    pub fn bin_bounds(&self, i: usize) -> (f64, f64) {
        (self.edges[i], self.edges[i + 1])
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Probability density of bin `i`: `count / (total · width)`.
    ///
    /// Densities integrate to one over the histogram range.
    pub fn density(&self, i: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.counts[i] as f64 / (total as f64 * self.bin_width())
    }

    pub fn densities(&self) -> Vec<f64> {
        (0..self.bins()).map(|i| self.density(i)).collect()
    }

    pub fn max_density(&self) -> f64 {
        self.densities().into_iter().fold(0.0, f64::max)
    }
}
