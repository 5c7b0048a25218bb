//! Error taxonomy for the categorization model.

use thiserror::Error;

/// Result alias used across the model.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    /// A parameter violates a mathematical precondition of a formula.
    #[error("domain error in `{parameter}`: {reason}")]
    Domain {
        parameter: &'static str,
        reason: String,
    },

    /// A category group required by the aggregation is absent or empty.
    #[error("category group `{category}` is absent or empty")]
    EmptyGroup { category: String },

    /// A required parameter was not supplied.
    #[error("missing required input `{name}`")]
    MissingInput { name: &'static str },

    /// Type frequency outside the mapped range [1, 12].
    #[error("frequency {frequency} is outside the supported range 1..=12")]
    FrequencyOutOfRange { frequency: u32 },

    /// A dataset row could not be parsed.
    #[error("dataset line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn domain(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::Domain {
            parameter,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable label, used by the gateway's error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Domain { .. } => "domain",
            Self::EmptyGroup { .. } => "empty_group",
            Self::MissingInput { .. } => "missing_input",
            Self::FrequencyOutOfRange { .. } => "frequency_out_of_range",
            Self::Parse { .. } => "parse",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}
