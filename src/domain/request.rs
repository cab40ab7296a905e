// ============================================================
// Layer 3 — Prediction Request / Response
// ============================================================
// The contract with whatever front end collects employee
// details. A request carries the six raw fields; a response is
// either a salary or a structured error naming the field that
// failed.
//
// InputLimits holds the accepted numeric ranges. Defaults are
// the bounds of the salary request form:
//   age        18 ..= 70
//   rating     1.0 ..= 5.0
//   experience 0 ..= 50
//
// Reference: Rust Book §6 (Enums), serde docs (enum tagging)

use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;
use crate::domain::field::InputField;
use crate::domain::traits::FeatureSource;

/// Raw employee attributes submitted for a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub age:         f64,
    pub sex:         String,
    pub designation: String,
    pub unit:        String,
    pub rating:      f64,
    pub experience:  f64,
}

impl FeatureSource for PredictionRequest {
    fn numeric(&self, field: InputField) -> Option<f64> {
        match field {
            InputField::Age        => Some(self.age),
            InputField::Rating     => Some(self.rating),
            InputField::Experience => Some(self.experience),
            _ => None,
        }
    }

    fn category(&self, field: InputField) -> Option<&str> {
        match field {
            InputField::Sex         => Some(&self.sex),
            InputField::Designation => Some(&self.designation),
            InputField::Unit        => Some(&self.unit),
            _ => None,
        }
    }
}

/// Outcome of one prediction, as handed back to the caller.
///
/// Serialises as `{"status":"ok","salary":...}` or
/// `{"status":"error","kind":...,"field":...,"message":...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionResponse {
    Ok {
        salary: f64,
    },
    Error {
        kind:    String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field:   Option<InputField>,
        message: String,
    },
}

impl From<Result<f64, PipelineError>> for PredictionResponse {
    fn from(result: Result<f64, PipelineError>) -> Self {
        match result {
            Ok(salary) => PredictionResponse::Ok { salary },
            Err(e) => PredictionResponse::Error {
                kind:    e.kind().to_string(),
                field:   e.field(),
                message: e.to_string(),
            },
        }
    }
}

/// Closed interval of accepted values for one numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Accepted ranges for the numeric request fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    pub age:        NumericRange,
    pub rating:     NumericRange,
    pub experience: NumericRange,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            age:        NumericRange::new(18.0, 70.0),
            rating:     NumericRange::new(1.0, 5.0),
            experience: NumericRange::new(0.0, 50.0),
        }
    }
}

impl InputLimits {
    pub fn range(&self, field: InputField) -> Option<NumericRange> {
        match field {
            InputField::Age        => Some(self.age),
            InputField::Rating     => Some(self.rating),
            InputField::Experience => Some(self.experience),
            _ => None,
        }
    }

    /// Check every numeric field of a request, first failure wins.
    pub fn validate(&self, source: &impl FeatureSource) -> Result<(), PipelineError> {
        for field in [InputField::Age, InputField::Rating, InputField::Experience] {
            let value = source.numeric(field).ok_or(PipelineError::InvalidNumericInput {
                field,
                value:  f64::NAN,
                reason: "value is missing".to_string(),
            })?;

            if !value.is_finite() {
                return Err(PipelineError::InvalidNumericInput {
                    field,
                    value,
                    reason: "value is not a finite number".to_string(),
                });
            }

            if let Some(range) = self.range(field) {
                if !range.contains(value) {
                    return Err(PipelineError::InvalidNumericInput {
                        field,
                        value,
                        reason: format!("must be between {} and {}", range.min, range.max),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PredictionRequest {
        PredictionRequest {
            age:         30.0,
            sex:         "Male".into(),
            designation: "Analyst".into(),
            unit:        "Finance".into(),
            rating:      3.0,
            experience:  5.0,
        }
    }

    #[test]
    fn test_default_limits_accept_form_defaults() {
        assert!(InputLimits::default().validate(&request()).is_ok());
    }

    #[test]
    fn test_out_of_range_age_is_rejected() {
        let mut req = request();
        req.age = 12.0;
        let err = InputLimits::default().validate(&req).unwrap_err();
        assert_eq!(err.field(), Some(InputField::Age));
        assert_eq!(err.kind(), "invalid_numeric_input");
    }

    #[test]
    fn test_nan_rating_is_rejected() {
        let mut req = request();
        req.rating = f64::NAN;
        let err = InputLimits::default().validate(&req).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidNumericInput { field: InputField::Rating, .. }
        ));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let mut req = request();
        req.experience = 50.0;
        req.rating = 1.0;
        assert!(InputLimits::default().validate(&req).is_ok());
    }

    #[test]
    fn test_response_json_shapes() {
        let ok: PredictionResponse = Ok(51234.5).into();
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"status": "ok", "salary": 51234.5})
        );

        let err: PredictionResponse = Err(PipelineError::UnknownCategory {
            field: InputField::Unit,
            value: "Space".into(),
        })
        .into();
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["kind"], "unknown_category");
        assert_eq!(v["field"], "unit");
    }
}
