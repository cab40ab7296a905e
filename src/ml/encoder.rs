// ============================================================
// Layer 5 — Categorical Encoders
// ============================================================
// Turn a category label into numbers.
//
//   LabelEncoder  — value → its index in the sorted vocabulary
//                   (used for the binary `sex` field)
//   OneHotEncoder — value → a row of zeros with a single 1.0 at
//                   the value's position in the sorted vocabulary
//
// Both learn their vocabulary once with fit(): distinct values,
// sorted lexicographically, so fitting the same data twice gives
// the same positions. Anything outside the vocabulary is an
// UnknownCategory error. There is no fallback index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::error::PipelineError;
use crate::domain::field::InputField;

/// Sorted, de-duplicated vocabulary from an iterator of labels.
fn vocabulary<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    values
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ─── LabelEncoder ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub field:   InputField,
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a>(field: InputField, values: impl IntoIterator<Item = &'a str>) -> Self {
        Self { field, classes: vocabulary(values) }
    }

    pub fn encode(&self, value: &str) -> Result<usize, PipelineError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map_err(|_| PipelineError::UnknownCategory {
                field: self.field,
                value: value.to_string(),
            })
    }

    #[cfg(test)]
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

// ─── OneHotEncoder ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub field:      InputField,
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn fit<'a>(field: InputField, values: impl IntoIterator<Item = &'a str>) -> Self {
        Self { field, categories: vocabulary(values) }
    }

    /// Number of columns this encoder produces.
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    pub fn position(&self, value: &str) -> Result<usize, PipelineError> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .map_err(|_| PipelineError::UnknownCategory {
                field: self.field,
                value: value.to_string(),
            })
    }

    pub fn encode(&self, value: &str) -> Result<Vec<f64>, PipelineError> {
        let hot = self.position(value)?;
        let mut row = vec![0.0; self.width()];
        row[hot] = 1.0;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_encoder_sorts_and_dedupes() {
        let enc = LabelEncoder::fit(InputField::Sex, ["M", "F", "M", "F"]);
        assert_eq!(enc.classes, vec!["F", "M"]);
        assert_eq!(enc.encode("F").unwrap(), 0);
        assert_eq!(enc.encode("M").unwrap(), 1);
    }

    #[test]
    fn test_label_round_trip() {
        let enc = LabelEncoder::fit(InputField::Sex, ["Male", "Female"]);
        for class in ["Male", "Female"] {
            let idx = enc.encode(class).unwrap();
            assert_eq!(enc.decode(idx), Some(class));
        }
        assert_eq!(enc.decode(2), None);
    }

    #[test]
    fn test_label_unknown_is_error_not_default() {
        let enc = LabelEncoder::fit(InputField::Sex, ["Male", "Female"]);
        let err = enc.encode("Unknown").unwrap_err();
        assert_eq!(
            err,
            PipelineError::UnknownCategory { field: InputField::Sex, value: "Unknown".into() }
        );
    }

    #[test]
    fn test_one_hot_has_exactly_one_hot_position() {
        let enc = OneHotEncoder::fit(
            InputField::Designation,
            ["Analyst", "Manager", "Associate", "Director", "Analyst"],
        );
        assert_eq!(enc.width(), 4);
        for cat in enc.categories.clone() {
            let row = enc.encode(&cat).unwrap();
            assert_eq!(row.len(), enc.width());
            assert_eq!(row.iter().filter(|&&v| v == 1.0).count(), 1);
            assert_eq!(row.iter().filter(|&&v| v == 0.0).count(), enc.width() - 1);
            assert_eq!(row[enc.position(&cat).unwrap()], 1.0);
        }
    }

    #[test]
    fn test_one_hot_is_case_sensitive() {
        let enc = OneHotEncoder::fit(InputField::Unit, ["Finance", "IT"]);
        assert!(matches!(
            enc.encode("finance"),
            Err(PipelineError::UnknownCategory { field: InputField::Unit, .. })
        ));
    }
}
