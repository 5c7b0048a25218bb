use exemplar_core::{
    CategorySummary, DashboardFrame, ModelDefaults, ModelError, ModelParams, Observation,
};
use serde::{Deserialize, Serialize};

/// Parameter state sent by a view.
///
/// α, δ and τ fall back to the configured defaults. The configured frequency
/// applies only when the request sets neither δ nor a frequency. The token
/// position is never defaulted: a request without one is answered with a
/// `missing_input` error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub tau: Option<f64>,
    #[serde(default)]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub token_position: Option<f64>,
}

impl EvaluateRequest {
    pub fn into_params(self, defaults: &ModelDefaults) -> ModelParams {
        let frequency = if self.delta.is_some() || self.frequency.is_some() {
            self.frequency
        } else {
            defaults.frequency
        };
        ModelParams {
            alpha: self.alpha.unwrap_or(defaults.alpha),
            delta: self.delta.unwrap_or(defaults.delta),
            tau: self.tau.unwrap_or(defaults.tau),
            token_position: self.token_position,
            frequency,
        }
    }
}

/// Error body returned for rejected computations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

impl From<&ModelError> for ErrorBody {
    fn from(err: &ModelError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub frequency: u32,
    pub delta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetResponse {
    pub observations: Vec<Observation>,
    pub summary: Vec<CategorySummary>,
}

/// Outbound WebSocket message; `seq` counts requests on the connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewReply {
    Frame {
        seq: u64,
        frame: Box<DashboardFrame>,
    },
    Error {
        seq: u64,
        #[serde(flatten)]
        body: ErrorBody,
    },
}
