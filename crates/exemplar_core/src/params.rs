use crate::error::{ModelError, ModelResult};
use crate::model::frequency_to_delta;
use serde::{Deserialize, Serialize};

/// Externally supplied model parameters for one recompute pass.
///
/// Ranges are the caller's business: the core only rejects values that break
/// a formula (see [`ModelError::Domain`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Activation window width (α).
    pub alpha: f64,
    /// Discriminability threshold (δ). Ignored when `frequency` is set.
    pub delta: f64,
    /// Typicality threshold (τ).
    pub tau: f64,
    /// Token position on the value scale. No default: the caller must pick one.
    #[serde(default)]
    pub token_position: Option<f64>,
    /// Type frequency in 1..=12, drives δ when present.
    #[serde(default)]
    pub frequency: Option<u32>,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            delta: 0.5,
            tau: 0.1,
            token_position: None,
            frequency: None,
        }
    }
}

impl ModelParams {
    pub fn with_token(mut self, position: f64) -> Self {
        self.token_position = Some(position);
        self
    }

    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// The token position, or `MissingInput` when none was supplied.
    pub fn token(&self) -> ModelResult<f64> {
        self.token_position.ok_or(ModelError::MissingInput {
            name: "token_position",
        })
    }

    /// δ after applying the frequency mapping, if a frequency is set.
    pub fn effective_delta(&self) -> ModelResult<f64> {
        match self.frequency {
            Some(freq) => frequency_to_delta(freq),
            None => Ok(self.delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token() {
        let params = ModelParams::default();
        assert!(matches!(
            params.token(),
            Err(ModelError::MissingInput {
                name: "token_position"
            })
        ));
        assert_eq!(params.with_token(-1.0).token().unwrap(), -1.0);
    }

    #[test]
    fn test_effective_delta() {
        let params = ModelParams::default();
        assert_eq!(params.effective_delta().unwrap(), 0.5);
        assert_eq!(params.with_frequency(1).effective_delta().unwrap(), 0.75);
        assert!(params.with_frequency(0).effective_delta().is_err());
    }

    #[test]
    fn test_deserialize_without_optionals() {
        let params: ModelParams =
            serde_json::from_str(r#"{"alpha":0.2,"delta":0.3,"tau":0.4}"#).unwrap();
        assert_eq!(params.alpha, 0.2);
        assert!(params.token_position.is_none());
        assert!(params.frequency.is_none());
    }
}
