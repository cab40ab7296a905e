// ============================================================
// Layer 3 — Pipeline Error Taxonomy
// ============================================================
// Each stage of encode → assemble → scale → predict fails in a
// distinct, named way so callers can react differently: a bad
// category is the user's to fix, a dimension mismatch or a load
// failure is an operator's.
//
// Request-level variants are recovered and turned into a
// PredictionResponse::Error. ArtifactLoadFailure is fatal.

use thiserror::Error;

use crate::domain::field::InputField;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// A category value that the fitted vocabulary never saw.
    #[error("unknown {field} '{value}': not one of the categories seen during fitting")]
    UnknownCategory { field: InputField, value: String },

    /// A vector's width disagrees with the width a stage was fit with.
    #[error("dimension mismatch at {stage}: expected width {expected}, got {actual}")]
    DimensionMismatch {
        stage:    &'static str,
        expected: usize,
        actual:   usize,
    },

    /// A numeric input that is missing, non-finite or out of range.
    #[error("invalid {field} = {value}: {reason}")]
    InvalidNumericInput {
        field:  InputField,
        value:  f64,
        reason: String,
    },

    /// The persisted bundle is missing, unreadable or inconsistent.
    #[error("cannot load artifact bundle '{path}': {reason}")]
    ArtifactLoadFailure { path: String, reason: String },

    /// A feature column is constant over the fitting data.
    #[error("feature column '{column}' has zero variance in the fitting data")]
    ZeroVariance { column: String },

    #[error("model produced a non-finite prediction")]
    NonFiniteOutput,

    /// A request that could not be parsed at all.
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl PipelineError {
    /// Stable machine-readable tag, used in JSON responses.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::UnknownCategory { .. }     => "unknown_category",
            PipelineError::DimensionMismatch { .. }   => "dimension_mismatch",
            PipelineError::InvalidNumericInput { .. } => "invalid_numeric_input",
            PipelineError::ArtifactLoadFailure { .. } => "artifact_load_failure",
            PipelineError::ZeroVariance { .. }        => "zero_variance",
            PipelineError::NonFiniteOutput            => "non_finite_output",
            PipelineError::MalformedRequest(_)        => "malformed_request",
        }
    }

    /// The input field at fault, when there is one.
    pub fn field(&self) -> Option<InputField> {
        match self {
            PipelineError::UnknownCategory { field, .. }
            | PipelineError::InvalidNumericInput { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// True for failures the caller can fix by changing the request.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PipelineError::UnknownCategory { .. }
                | PipelineError::InvalidNumericInput { .. }
                | PipelineError::MalformedRequest(_)
        )
    }
}
