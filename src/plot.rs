//! Two-panel SVG rendering of an experiment.
//!
//! Left: the population histogram. Right: the histogram of sample means.
//! Both are density-normalised so the optional overlays (the population
//! density and the limiting normal of the means) share their scale.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::config::DEFAULT_BINS;
use crate::error::{CltError, CltResult};
use crate::experiment::ExperimentOutcome;
use crate::histogram::Histogram;

pub const POPULATION_TITLE: &str = "Original Distribution";
pub const MEANS_TITLE: &str = "Distribution of Sample Means";

const CURVE_POINTS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotOptions {
    pub bins: usize,
    /// Canvas size in pixels.
    pub size: (u32, u32),
    /// Draw the theoretical density curves over the histograms.
    pub overlay: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            size: (1200, 500),
            overlay: false,
        }
    }
}

/// Writes the two-panel figure to `path` as SVG.
pub fn render_to_file(
    path: &Path,
    outcome: &ExperimentOutcome,
    options: &PlotOptions,
) -> CltResult<()> {
    let root = SVGBackend::new(path, options.size).into_drawing_area();
    draw_panels(&root, outcome, options)?;
    debug!(path = %path.display(), "plot written");
    Ok(())
}

/// Renders the two-panel figure to an SVG document in memory.
pub fn render_to_string(outcome: &ExperimentOutcome, options: &PlotOptions) -> CltResult<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, options.size).into_drawing_area();
        draw_panels(&root, outcome, options)?;
    }
    Ok(svg)
}

fn draw_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    outcome: &ExperimentOutcome,
    options: &PlotOptions,
) -> CltResult<()> {
    let population = Histogram::from_data(&outcome.population, options.bins)?;
    let means = Histogram::from_data(&outcome.sample_means, options.bins)?;

    let (population_curve, means_curve) = if options.overlay {
        let limit = outcome.theory.limiting_normal();
        (
            density_curve(population.range(), |x| outcome.distribution.pdf(x)),
            density_curve(means.range(), |x| limit.map(|n| n.pdf(x))),
        )
    } else {
        (None, None)
    };

    root.fill(&WHITE).map_err(render_error)?;
    let panels = root.split_evenly((1, 2));
    draw_histogram(&panels[0], POPULATION_TITLE, "Value", &population, population_curve)
        .map_err(render_error)?;
    draw_histogram(&panels[1], MEANS_TITLE, "Sample Mean", &means, means_curve)
        .map_err(render_error)?;
    root.present().map_err(render_error)?;
    Ok(())
}

/// Samples `pdf` across `range`; `None` if the density is unavailable.
fn density_curve<F>((lo, hi): (f64, f64), pdf: F) -> Option<Vec<(f64, f64)>>
where
    F: Fn(f64) -> Option<f64>,
{
    let step = (hi - lo) / (CURVE_POINTS - 1) as f64;
    (0..CURVE_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            pdf(x).map(|y| (x, y))
        })
        .collect()
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    histogram: &Histogram,
    curve: Option<Vec<(f64, f64)>>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (lo, hi) = histogram.range();
    let densities = histogram.densities();

    let peak = curve
        .iter()
        .flatten()
        .map(|&(_, y)| y)
        .fold(histogram.max_density(), f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(lo..hi, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(densities.iter().enumerate().map(|(i, &d)| {
        let (x0, x1) = histogram.bin_bounds(i);
        Rectangle::new([(x0, 0.0), (x1, d)], BLUE.mix(0.7).filled())
    }))?;

    if let Some(points) = curve {
        chart.draw_series(LineSeries::new(points, RED.stroke_width(2)))?;
    }
    Ok(())
}

fn render_error<E>(err: DrawingAreaErrorKind<E>) -> CltError
where
    E: std::error::Error + Send + Sync,
{
    CltError::Render(err.to_string())
}
