//! End-to-end checks: config in, summaries and figure out.

use clt_lab::config::{DistributionSpec, SimulationConfig};
use clt_lab::distributions::DistributionKind;
use clt_lab::plot::{self, PlotOptions};
use clt_lab::random::create_rng;
use clt_lab::report::{self, ExperimentReport};
use clt_lab::CltError;

fn config_for(kind: DistributionKind) -> SimulationConfig {
    SimulationConfig {
        distribution: DistributionSpec::defaults_for(kind),
        population_size: 5_000,
        sample_size: 40,
        num_samples: 2_000,
        seed: Some(1234),
        ..Default::default()
    }
}

#[test]
fn sample_means_concentrate_for_every_distribution() {
    for kind in DistributionKind::ALL {
        let config = config_for(kind);
        let outcome = config
            .build_experiment()
            .unwrap()
            .run(&mut create_rng(config.seed.unwrap()))
            .unwrap();

        let predicted = outcome.theory.standard_error;
        let observed = outcome.means_summary.std_dev;
        assert!(
            (observed - predicted).abs() / predicted < 0.1,
            "{kind}: observed {observed}, predicted {predicted}"
        );
        assert!(
            (outcome.means_summary.mean - outcome.theory.mean).abs()
                < 4.0 * predicted / (config.num_samples as f64).sqrt(),
            "{kind}: mean of means {} vs μ {}",
            outcome.means_summary.mean,
            outcome.theory.mean
        );
        assert!(outcome.means_summary.std_dev < outcome.population_summary.std_dev);
    }
}

#[test]
fn toml_config_drives_a_full_run() {
    let config = SimulationConfig::from_toml(
        r#"
        population_size = 2000
        sample_size = 16
        num_samples = 500
        bins = 20
        seed = 7

        [distribution]
        type = "normal"
        mean = -2.0
        std_dev = 4.0
        "#,
    )
    .unwrap();
    let outcome = config
        .build_experiment()
        .unwrap()
        .run(&mut create_rng(7))
        .unwrap();

    assert!((outcome.theory.standard_error - 1.0).abs() < 1e-12);
    let [population, means] = report::summary_lines(&outcome);
    assert!(population.starts_with("Original Distribution - Mean: -"));
    assert!(means.starts_with("Sample Means Distribution - Mean: -"));

    let report = ExperimentReport::new(&outcome, &config, 7).unwrap();
    assert_eq!(report.population_histogram.bins(), 20);
    assert_eq!(report.means_histogram.total(), 500);

    let svg = plot::render_to_string(
        &outcome,
        &PlotOptions {
            bins: config.bins,
            overlay: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(svg.contains("Distribution of Sample Means"));
}

#[test]
fn same_seed_same_report() {
    let config = config_for(DistributionKind::Exponential);
    let experiment = config.build_experiment().unwrap();
    let a = experiment.run(&mut create_rng(99)).unwrap();
    let b = experiment.run(&mut create_rng(99)).unwrap();
    assert_eq!(report::summary_lines(&a), report::summary_lines(&b));
}

#[test]
fn out_of_range_config_is_rejected_before_sampling() {
    let config = SimulationConfig {
        distribution: DistributionSpec::Uniform {
            low: 8.0,
            high: 4.0,
        },
        ..Default::default()
    };
    match config.build_experiment() {
        Err(CltError::Config { field, .. }) => assert_eq!(field, "distribution.high"),
        other => panic!("expected a config error, got {other:?}"),
    }
}
