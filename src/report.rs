//! Text and JSON presentation of experiment results.

use std::fmt::Write as _;

use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::CltResult;
use crate::experiment::{ExperimentOutcome, SweepPoint, TheoreticalMoments};
use crate::histogram::Histogram;
use crate::stats::Summary;

pub const POPULATION_LABEL: &str = "Original Distribution";
pub const MEANS_LABEL: &str = "Sample Means Distribution";

/// How to use the demonstration, shown by `clt-lab explain`.
pub const INSTRUCTIONS: &str = "\
This application demonstrates the Central Limit Theorem:
1. Choose a distribution type and set its parameters.
2. Set the population size, sample size, and number of samples.
3. Run the experiment to see the results.
4. Observe how the distribution of sample means approaches a normal distribution, \
regardless of the original distribution's shape.";

/// `"<label> - Mean: m, Std Dev: s"` with four decimals.
pub fn summary_line(label: &str, summary: &Summary) -> String {
    format!(
        "{label} - Mean: {:.4}, Std Dev: {:.4}",
        summary.mean, summary.std_dev
    )
}

/// The two summary lines for an outcome, population first.
pub fn summary_lines(outcome: &ExperimentOutcome) -> [String; 2] {
    [
        summary_line(POPULATION_LABEL, &outcome.population_summary),
        summary_line(MEANS_LABEL, &outcome.means_summary),
    ]
}

/// Observed-versus-predicted comparison for the sample means.
pub fn theory_lines(outcome: &ExperimentOutcome) -> Vec<String> {
    let t = &outcome.theory;
    let n = outcome.params.sample_size;
    let mut lines = vec![
        format!(
            "Predicted Sample Means - Mean: {:.4}, Std Dev: {:.4} (σ/√{n} = {:.4}/{:.4})",
            t.mean,
            t.standard_error,
            t.std_dev,
            (n as f64).sqrt()
        ),
        format!(
            "Skewness - Original: {}, Sample Means: {}",
            fmt_opt(outcome.population_summary.skewness),
            fmt_opt(outcome.means_summary.skewness)
        ),
    ];
    if let Some(ks) = outcome.normality {
        lines.push(format!("KS distance of sample means from N(μ, σ/√n): {ks:.4}"));
    }
    lines
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

/// Renders a histogram as horizontal bars, one line per bin.
///
/// The tallest bin spans `width` characters.
pub fn text_histogram(histogram: &Histogram, width: usize) -> String {
    let peak = histogram.counts().iter().copied().max().unwrap_or(0).max(1);
    let mut out = String::new();
    for (i, &count) in histogram.counts().iter().enumerate() {
        let (lo, hi) = histogram.bin_bounds(i);
        let len = ((count as f64 / peak as f64) * width as f64).round() as usize;
        let _ = writeln!(
            out,
            "{lo:>10.3} .. {hi:<10.3} |{:<width$}| {count}",
            "#".repeat(len)
        );
    }
    out
}

/// Table of a sample-size sweep.
pub fn sweep_table(points: &[SweepPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:>12}  {:>12}  {:>8}  {:>8}",
        "n", "observed SE", "σ/√n", "ratio", "KS"
    );
    for p in points {
        let ratio = if p.predicted_standard_error > 0.0 {
            format!("{:.3}", p.observed_standard_error / p.predicted_standard_error)
        } else {
            "n/a".to_string()
        };
        let _ = writeln!(
            out,
            "{:>6}  {:>12.4}  {:>12.4}  {:>8}  {:>8}",
            p.sample_size,
            p.observed_standard_error,
            p.predicted_standard_error,
            ratio,
            fmt_opt(p.ks_statistic)
        );
    }
    out
}

/// Serializable digest of a run, without the raw sample arrays.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub distribution: String,
    pub parameters: String,
    pub config: SimulationConfig,
    pub seed: u64,
    pub population: Summary,
    pub sample_means: Summary,
    pub theory: TheoreticalMoments,
    pub normality: Option<f64>,
    pub population_histogram: Histogram,
    pub means_histogram: Histogram,
}

impl ExperimentReport {
    pub fn new(
        outcome: &ExperimentOutcome,
        config: &SimulationConfig,
        seed: u64,
    ) -> CltResult<Self> {
        Ok(Self {
            distribution: outcome.distribution.name().to_string(),
            parameters: outcome.distribution.describe(),
            config: config.clone(),
            seed,
            population: outcome.population_summary,
            sample_means: outcome.means_summary,
            theory: outcome.theory,
            normality: outcome.normality,
            population_histogram: Histogram::from_data(&outcome.population, config.bins)?,
            means_histogram: Histogram::from_data(&outcome.sample_means, config.bins)?,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::Uniform;
    use crate::experiment::{Experiment, ExperimentParams};
    use crate::random::create_rng;

    fn outcome() -> ExperimentOutcome {
        Experiment::new(
            Uniform::new(0.0, 10.0).unwrap().into(),
            ExperimentParams {
                population_size: 1_000,
                sample_size: 25,
                num_samples: 200,
            },
        )
        .unwrap()
        .run(&mut create_rng(21))
        .unwrap()
    }

    #[test]
    fn test_summary_line_format() {
        let s = Summary::from_data(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            summary_line(POPULATION_LABEL, &s),
            "Original Distribution - Mean: 2.0000, Std Dev: 0.8165"
        );
    }

    #[test]
    fn test_summary_lines_order() {
        let [first, second] = summary_lines(&outcome());
        assert!(first.starts_with("Original Distribution - Mean: "));
        assert!(second.starts_with("Sample Means Distribution - Mean: "));
    }

    #[test]
    fn test_theory_lines_mention_prediction() {
        let lines = theory_lines(&outcome());
        assert!(lines[0].contains("σ/√25"));
        assert!(lines[0].contains("Mean: 5.0000"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_text_histogram_bars() {
        let h = Histogram::from_data(&[0.0, 1.0, 1.0, 1.0, 2.0, 2.0], 2).unwrap();
        let text = text_histogram(&h, 6);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("|#     | 1"));
        assert!(lines[1].contains("|######| 5"));
    }

    #[test]
    fn test_sweep_table_rows() {
        let points = [
            SweepPoint {
                sample_size: 4,
                observed_standard_error: 1.0,
                predicted_standard_error: 1.0,
                ks_statistic: Some(0.01),
            },
            SweepPoint {
                sample_size: 16,
                observed_standard_error: 0.0,
                predicted_standard_error: 0.0,
                ks_statistic: None,
            },
        ];
        let table = sweep_table(&points);
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("1.000"));
        assert!(table.contains("n/a"));
    }

    #[test]
    fn test_report_json() {
        let config = SimulationConfig {
            population_size: 1_000,
            sample_size: 25,
            num_samples: 200,
            ..Default::default()
        };
        let report = ExperimentReport::new(&outcome(), &config, 21).unwrap();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["distribution"], "Uniform");
        assert_eq!(value["seed"], 21);
        assert_eq!(value["config"]["distribution"]["type"], "uniform");
        assert_eq!(value["population"]["count"], 1_000);
        assert_eq!(
            value["means_histogram"]["counts"].as_array().unwrap().len(),
            30
        );
    }
}
