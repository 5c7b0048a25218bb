//! Dashboard recompute pass.
//!
//! Produces the numeric series behind the four linked views:
//!
//! ```text
//! token, α ──► activation plot
//!         └──► activation bars ──► Evaluation ─┬─► discriminability plot (δ)
//!                                              └─► typicality plot (τ)
//! ```
//!
//! Every call recomputes from scratch; rendering is left to the caller.

use crate::aggregate::{aggregate, CategoryStats, Evaluation};
use crate::config::PlotConfig;
use crate::dataset::{Category, Dataset};
use crate::error::ModelResult;
use crate::model::{activation_curve, discriminability, typicality};
use crate::params::ModelParams;
use serde::{Deserialize, Serialize};

/// Ratio beyond which the discriminability x-axis grows proportionally.
const DISCR_LINEAR_PAD_LIMIT: f64 = 300.0;
const DISCR_LINEAR_PAD: f64 = 10.0;
const DISCR_RELATIVE_PAD: f64 = 0.1;

/// `n` evenly spaced samples over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Exemplar values of one category, shown on the strip under the curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExemplarStrip {
    pub category: Category,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationPlot {
    pub curve: Series,
    pub exemplars: Vec<ExemplarStrip>,
    pub token: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBar {
    pub category: Category,
    #[serde(flatten)]
    pub stats: CategoryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationBars {
    pub bars: Vec<CategoryBar>,
    pub evaluation: Evaluation,
}

/// A probability curve with the current operating point marked on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityPlot {
    pub curve: Series,
    pub point: Point,
    /// Parameter the curve was drawn with (δ or τ).
    pub threshold: f64,
}

impl ProbabilityPlot {
    pub fn probability(&self) -> f64 {
        self.point.y
    }
}

/// Everything the presentation layer needs for one parameter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardFrame {
    pub params: ModelParams,
    pub activation: ActivationPlot,
    pub bars: ActivationBars,
    pub discriminability: ProbabilityPlot,
    pub typicality: ProbabilityPlot,
}

pub fn activation_plot(
    dataset: &Dataset,
    params: &ModelParams,
    plot: &PlotConfig,
) -> ModelResult<ActivationPlot> {
    let token = params.token()?;
    let x = linspace(plot.activation_x_min, plot.activation_x_max, plot.activation_samples);
    let y = activation_curve(&x, token, params.alpha)?;
    let exemplars = dataset
        .categories()
        .into_iter()
        .map(|category| ExemplarStrip {
            values: dataset.values_of(&category),
            category,
        })
        .collect();
    Ok(ActivationPlot {
        curve: Series { x, y },
        exemplars,
        token,
    })
}

pub fn activation_bars(dataset: &Dataset, params: &ModelParams) -> ModelResult<ActivationBars> {
    let token = params.token()?;
    let agg = aggregate(dataset, token, params.alpha)?;
    let evaluation = agg.evaluation()?;
    let bars = agg
        .iter()
        .map(|(category, stats)| CategoryBar {
            category: category.clone(),
            stats: *stats,
        })
        .collect();
    Ok(ActivationBars { bars, evaluation })
}

/// Upper bound of the ratio axis: padded by 10, or by 10% for large ratios.
pub fn discriminability_x_max(ratio: f64) -> f64 {
    if ratio < DISCR_LINEAR_PAD_LIMIT {
        ratio + DISCR_LINEAR_PAD
    } else {
        ratio + ratio * DISCR_RELATIVE_PAD
    }
}

pub fn discriminability_plot(
    evaluation: &Evaluation,
    delta: f64,
    plot: &PlotConfig,
) -> ModelResult<ProbabilityPlot> {
    let p = discriminability(evaluation.ratio, delta)?;
    let x = linspace(
        0.0,
        discriminability_x_max(evaluation.ratio),
        plot.discriminability_samples,
    );
    // With δ = 0 the curve is undefined at ratio 0 only; that sample is left
    // as a gap (NaN, serialized as null) while the operating point stays strict.
    let y = x
        .iter()
        .map(|&r| discriminability(r, delta).unwrap_or(f64::NAN))
        .collect();
    Ok(ProbabilityPlot {
        curve: Series { x, y },
        point: Point {
            x: evaluation.ratio,
            y: p,
        },
        threshold: delta,
    })
}

pub fn typicality_plot(
    evaluation: &Evaluation,
    tau: f64,
    plot: &PlotConfig,
) -> ModelResult<ProbabilityPlot> {
    let p = typicality(evaluation.avg_activation, tau)?;
    let x = linspace(0.0, 1.0, plot.typicality_samples);
    let y = x
        .iter()
        .map(|&a| typicality(a, tau))
        .collect::<ModelResult<Vec<_>>>()?;
    Ok(ProbabilityPlot {
        curve: Series { x, y },
        point: Point {
            x: evaluation.avg_activation,
            y: p,
        },
        threshold: tau,
    })
}

/// Binds a dataset to plot settings and recomputes full frames on demand.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Dataset,
    plot: PlotConfig,
}

impl Dashboard {
    pub fn new(dataset: Dataset, plot: PlotConfig) -> Self {
        Self { dataset, plot }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn plot_config(&self) -> &PlotConfig {
        &self.plot
    }

    /// Recompute all four views for `params`.
    pub fn render(&self, params: &ModelParams) -> ModelResult<DashboardFrame> {
        let delta = params.effective_delta()?;
        let activation = activation_plot(&self.dataset, params, &self.plot)?;
        let bars = activation_bars(&self.dataset, params)?;
        let discriminability = discriminability_plot(&bars.evaluation, delta, &self.plot)?;
        let typicality = typicality_plot(&bars.evaluation, params.tau, &self.plot)?;

        tracing::debug!(
            token = activation.token,
            alpha = params.alpha,
            delta,
            tau = params.tau,
            ratio = bars.evaluation.ratio,
            avg_activation = bars.evaluation.avg_activation,
            "Recomputed dashboard frame"
        );

        Ok(DashboardFrame {
            params: *params,
            activation,
            bars,
            discriminability,
            typicality,
        })
    }
}
