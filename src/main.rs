use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clt_lab::config::{self, DistributionSpec, SimulationConfig};
use clt_lab::distributions::DistributionKind;
use clt_lab::experiment::sweep;
use clt_lab::histogram::Histogram;
use clt_lab::plot::{self, PlotOptions};
use clt_lab::random;
use clt_lab::report::{self, ExperimentReport};

/// Central Limit Theorem interactive demonstration.
#[derive(Parser, Debug)]
#[command(name = "clt-lab", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    /// `CLT_LAB_LOG` takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a population and its sample means, then plot and summarise both
    Run(RunArgs),

    /// Show how the spread of sample means shrinks as σ/√n
    Sweep(SweepArgs),

    /// Explain what the demonstration shows
    Explain,
}

#[derive(Args, Debug)]
struct DistributionArgs {
    /// TOML file with the base configuration; flags override it
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Distribution to sample from: uniform, normal, exponential, multinomial
    #[arg(short, long)]
    distribution: Option<DistributionKind>,

    /// Uniform lower bound
    #[arg(long)]
    low: Option<f64>,

    /// Uniform upper bound
    #[arg(long)]
    high: Option<f64>,

    /// Normal mean
    #[arg(long, allow_negative_numbers = true)]
    mean: Option<f64>,

    /// Normal standard deviation
    #[arg(long)]
    std_dev: Option<f64>,

    /// Exponential scale (1/λ)
    #[arg(long)]
    scale: Option<f64>,

    /// Multinomial number of trials
    #[arg(long)]
    trials: Option<u64>,

    /// Multinomial probability of success
    #[arg(long)]
    probability: Option<f64>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    distribution: DistributionArgs,

    /// Number of values drawn for the population histogram
    #[arg(long)]
    population_size: Option<usize>,

    /// Values per sample
    #[arg(short = 'n', long)]
    sample_size: Option<usize>,

    /// Number of samples, i.e. of sample means
    #[arg(short = 'k', long)]
    num_samples: Option<usize>,

    /// Histogram bins per panel
    #[arg(long)]
    bins: Option<usize>,

    /// Where to write the SVG figure
    #[arg(short, long, default_value = "clt.svg", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Skip writing the SVG figure
    #[arg(long)]
    no_plot: bool,

    /// Overlay the theoretical densities on the figure
    #[arg(long)]
    overlay: bool,

    /// Print text histograms of both distributions
    #[arg(long)]
    text: bool,

    /// Print a JSON report instead of the summary lines
    #[arg(long, conflicts_with = "text")]
    json: bool,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    distribution: DistributionArgs,

    /// Comma-separated sample sizes to compare
    #[arg(long, value_delimiter = ',', default_values_t = [1_usize, 2, 5, 10, 30, 100])]
    sample_sizes: Vec<usize>,

    /// Number of samples per sample size
    #[arg(short = 'k', long)]
    num_samples: Option<usize>,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("CLT_LAB_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Layers defaults, the optional config file, and the command-line flags.
fn resolve_config(args: &DistributionArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(kind) = args.distribution {
        if kind != config.distribution.kind() {
            config.distribution = DistributionSpec::defaults_for(kind);
        }
    }

    match &mut config.distribution {
        DistributionSpec::Uniform { low, high } => {
            override_with(low, args.low);
            override_with(high, args.high);
        }
        DistributionSpec::Normal { mean, std_dev } => {
            override_with(mean, args.mean);
            override_with(std_dev, args.std_dev);
        }
        DistributionSpec::Exponential { scale } => override_with(scale, args.scale),
        DistributionSpec::Multinomial {
            trials,
            success_probability,
        } => {
            override_with(trials, args.trials);
            override_with(success_probability, args.probability);
        }
    }

    let kind = config.distribution.kind();
    for flag in ignored_flags(args, kind) {
        warn!(
            flag,
            distribution = %kind,
            "flag does not apply to this distribution, ignored"
        );
    }

    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

/// Parameter flags that were given but belong to another distribution.
fn ignored_flags(args: &DistributionArgs, kind: DistributionKind) -> Vec<&'static str> {
    [
        ("--low", args.low.is_some(), DistributionKind::Uniform),
        ("--high", args.high.is_some(), DistributionKind::Uniform),
        ("--mean", args.mean.is_some(), DistributionKind::Normal),
        ("--std-dev", args.std_dev.is_some(), DistributionKind::Normal),
        ("--scale", args.scale.is_some(), DistributionKind::Exponential),
        ("--trials", args.trials.is_some(), DistributionKind::Multinomial),
        ("--probability", args.probability.is_some(), DistributionKind::Multinomial),
    ]
    .into_iter()
    .filter(|&(_, given, applies_to)| given && applies_to != kind)
    .map(|(flag, _, _)| flag)
    .collect()
}

fn override_with<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = resolve_config(&args.distribution)?;
    if let Some(v) = args.population_size {
        config.population_size = v;
    }
    if let Some(v) = args.sample_size {
        config.sample_size = v;
    }
    if let Some(v) = args.num_samples {
        config.num_samples = v;
    }
    if let Some(v) = args.bins {
        config.bins = v;
    }

    let experiment = config.build_experiment()?;
    let (mut rng, seed) = random::seeded_or_fresh(config.seed);
    info!(seed, "rng seeded");
    let outcome = experiment.run(&mut rng)?;

    if args.json {
        let report = ExperimentReport::new(&outcome, &config, seed)?;
        println!("{}", report.to_json()?);
    } else {
        println!(
            "{} ({})",
            outcome.distribution.name(),
            outcome.distribution.describe()
        );
        for line in report::summary_lines(&outcome) {
            println!("{line}");
        }
        for line in report::theory_lines(&outcome) {
            println!("{line}");
        }
        println!("Seed: {seed}");

        if args.text {
            for (label, data) in [
                (report::POPULATION_LABEL, &outcome.population),
                (report::MEANS_LABEL, &outcome.sample_means),
            ] {
                let histogram = Histogram::from_data(data, config.bins)?;
                println!("\n{label}");
                print!("{}", report::text_histogram(&histogram, 50));
            }
        }
    }

    if !args.no_plot {
        let options = PlotOptions {
            bins: config.bins,
            overlay: args.overlay,
            ..Default::default()
        };
        plot::render_to_file(&args.output, &outcome, &options)
            .with_context(|| format!("writing {}", args.output.display()))?;
        if !args.json {
            println!("Figure written to {}", args.output.display());
        }
    }
    Ok(())
}

fn run_sweep(args: SweepArgs) -> Result<()> {
    let mut config = resolve_config(&args.distribution)?;
    if let Some(v) = args.num_samples {
        config.num_samples = v;
    }
    config.distribution.validate()?;
    if !config::NUM_SAMPLES_RANGE.contains(&config.num_samples) {
        bail!(
            "num_samples {} is outside {:?}",
            config.num_samples,
            config::NUM_SAMPLES_RANGE
        );
    }
    if let Some(&n) = args
        .sample_sizes
        .iter()
        .find(|n| !config::SAMPLE_SIZE_RANGE.contains(n))
    {
        bail!("sample size {n} is outside {:?}", config::SAMPLE_SIZE_RANGE);
    }

    let distribution = config.distribution.build()?;
    let (mut rng, seed) = random::seeded_or_fresh(config.seed);
    let points = sweep(&distribution, &args.sample_sizes, config.num_samples, &mut rng)?;

    println!(
        "{} ({}), σ = {:.4}, {} samples per size, seed {seed}",
        distribution.name(),
        distribution.describe(),
        distribution.std_dev(),
        config.num_samples
    );
    print!("{}", report::sweep_table(&points));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run(args) => run(args),
        Command::Sweep(args) => run_sweep(args),
        Command::Explain => {
            println!("{}", report::INSTRUCTIONS);
            Ok(())
        }
    }
}
