use crate::params::ModelParams;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExemplarConfig {
    pub model: ModelDefaults,
    pub dataset: DatasetConfig,
    pub plot: PlotConfig,
    pub gateway: GatewayConfig,
}

impl ExemplarConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: ExemplarConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("EXEMPLAR_DATASET") {
            self.dataset.path = PathBuf::from(v);
        }
        if let Some(n) = env_parse("EXEMPLAR_ALPHA") {
            self.model.alpha = n;
        }
        if let Some(n) = env_parse("EXEMPLAR_DELTA") {
            self.model.delta = n;
        }
        if let Some(n) = env_parse("EXEMPLAR_TAU") {
            self.model.tau = n;
        }
        if let Some(n) = env_parse("EXEMPLAR_FREQUENCY") {
            self.model.frequency = Some(n);
        }
        if let Ok(v) = std::env::var("EXEMPLAR_HOST") {
            self.gateway.host = v;
        }
        if let Some(n) = env_parse("EXEMPLAR_PORT") {
            self.gateway.port = n;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}={:?}", key, raw);
            None
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

/// Initial parameter values offered by the presentation layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelDefaults {
    pub alpha: f64,
    pub delta: f64,
    pub tau: f64,
    pub frequency: Option<u32>,
    /// Starting token position; the core itself has no default.
    pub token_position: f64,
}

impl Default for ModelDefaults {
    fn default() -> Self {
        let params = ModelParams::default();
        Self {
            alpha: params.alpha,
            delta: params.delta,
            tau: params.tau,
            frequency: None,
            token_position: 0.0,
        }
    }
}

impl ModelDefaults {
    pub fn params(&self) -> ModelParams {
        ModelParams {
            alpha: self.alpha,
            delta: self.delta,
            tau: self.tau,
            token_position: Some(self.token_position),
            frequency: self.frequency,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/exemplars.csv"),
        }
    }
}

/// Sampling of the plotted curves.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub activation_x_min: f64,
    pub activation_x_max: f64,
    pub activation_samples: usize,
    pub discriminability_samples: usize,
    pub typicality_samples: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            activation_x_min: -3.5,
            activation_x_max: 1.5,
            activation_samples: 100,
            discriminability_samples: 1000,
            typicality_samples: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
