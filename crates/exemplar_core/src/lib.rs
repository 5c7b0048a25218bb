//! # Exemplar categorization core
//!
//! An exemplar-based model of categorization over a fixed set of labeled
//! scalar observations (`Pusher` / `Pushee`). A token activates every
//! stored exemplar through a Gaussian window; the aggregated activation feeds
//! two evaluations:
//!
//! - **Discriminability**: can the intended category be told apart from its
//!   competitor? Driven by the Pushee/Pusher activation ratio and δ.
//! - **Typicality**: is the token typical of its category? Driven by the
//!   average Pushee activation and τ.
//!
//! All computation is pure and synchronous. The dataset is an immutable
//! handle passed explicitly to every call.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod model;
pub mod params;

pub use aggregate::{aggregate, Aggregate, CategoryStats, Evaluation};
pub use config::{DatasetConfig, ExemplarConfig, GatewayConfig, ModelDefaults, PlotConfig};
pub use dashboard::{Dashboard, DashboardFrame};
pub use dataset::{load_dataset, Category, CategorySummary, Dataset, Observation};
pub use error::{ModelError, ModelResult};
pub use model::{
    activation, discriminability, frequency_to_delta, typicality, FREQUENCY_DELTA_TABLE,
    MAX_FREQUENCY,
};
pub use params::ModelParams;
