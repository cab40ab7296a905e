// ============================================================
// Layer 5 — Feature Schema
// ============================================================
// The frozen, ordered description of the feature vector.
//
// A schema is a list of slots. Each slot names the input field
// it reads and how it is encoded, and therefore how many columns
// it contributes:
//
//   Numeric { age }             → 1 column   "AGE"
//   Label   { sex, classes }    → 1 column   "SEX"
//   OneHot  { unit, categories} → n columns  "UNIT_<category>"
//
// The fitted vocabularies live inside the slots. Column order,
// widths and vocabularies are persisted together and can never
// drift apart; the assembler walks the slots in order, so the
// inference-time layout is derived from the same object that
// defined the fit-time layout.
//
// Default layout (first fit, no frozen schema supplied):
//   AGE, SEX, RATINGS, PAST EXP, DESIGNATION_*, UNIT_*

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

use crate::domain::error::PipelineError;
use crate::domain::field::{FieldKind, InputField};
use crate::domain::record::TrainingRecord;
use crate::domain::traits::FeatureSource;
use crate::ml::encoder::{LabelEncoder, OneHotEncoder};

pub const SCHEMA_VERSION: u32 = 1;

/// One named group of feature columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSlot {
    Numeric { field: InputField },
    Label(LabelEncoder),
    OneHot(OneHotEncoder),
}

impl FeatureSlot {
    pub fn field(&self) -> InputField {
        match self {
            FeatureSlot::Numeric { field } => *field,
            FeatureSlot::Label(enc)        => enc.field,
            FeatureSlot::OneHot(enc)       => enc.field,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            FeatureSlot::Numeric { .. } | FeatureSlot::Label(_) => 1,
            FeatureSlot::OneHot(enc) => enc.width(),
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        let base = self.field().column();
        match self {
            FeatureSlot::Numeric { .. } | FeatureSlot::Label(_) => vec![base.to_string()],
            FeatureSlot::OneHot(enc) => enc
                .categories
                .iter()
                .map(|c| format!("{base}_{c}"))
                .collect(),
        }
    }

    /// Append this slot's columns for `source` to `out`.
    pub fn encode_into(
        &self,
        source: &impl FeatureSource,
        out:    &mut Vec<f64>,
    ) -> Result<(), PipelineError> {
        let field = self.field();
        match self {
            FeatureSlot::Numeric { .. } => {
                let value = source.numeric(field).ok_or_else(|| missing(field))?;
                out.push(value);
            }
            FeatureSlot::Label(enc) => {
                let value = source.category(field).ok_or_else(|| missing(field))?;
                out.push(enc.encode(value)? as f64);
            }
            FeatureSlot::OneHot(enc) => {
                let value = source.category(field).ok_or_else(|| missing(field))?;
                out.extend(enc.encode(value)?);
            }
        }
        Ok(())
    }

    /// Known categories, for categorical slots.
    pub fn vocabulary(&self) -> Option<&[String]> {
        match self {
            FeatureSlot::Numeric { .. } => None,
            FeatureSlot::Label(enc)     => Some(&enc.classes),
            FeatureSlot::OneHot(enc)    => Some(&enc.categories),
        }
    }
}

fn missing(field: InputField) -> PipelineError {
    match field.kind() {
        FieldKind::Numeric => PipelineError::InvalidNumericInput {
            field,
            value:  f64::NAN,
            reason: "value is missing".to_string(),
        },
        FieldKind::Categorical => PipelineError::UnknownCategory {
            field,
            value: String::new(),
        },
    }
}

/// Ordered list of feature slots, persisted with the fitted artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub slots:   Vec<FeatureSlot>,
}

impl FeatureSchema {
    /// Learn vocabularies from `records` and lay them out in the default order.
    pub fn derive(records: &[TrainingRecord]) -> Self {
        let sex         = LabelEncoder::fit(InputField::Sex, records.iter().map(|r| r.sex.as_str()));
        let designation = OneHotEncoder::fit(
            InputField::Designation,
            records.iter().map(|r| r.designation.as_str()),
        );
        let unit        = OneHotEncoder::fit(InputField::Unit, records.iter().map(|r| r.unit.as_str()));

        Self {
            version: SCHEMA_VERSION,
            slots: vec![
                FeatureSlot::Numeric { field: InputField::Age },
                FeatureSlot::Label(sex),
                FeatureSlot::Numeric { field: InputField::Rating },
                FeatureSlot::Numeric { field: InputField::Experience },
                FeatureSlot::OneHot(designation),
                FeatureSlot::OneHot(unit),
            ],
        }
    }

    /// Total number of feature columns.
    pub fn width(&self) -> usize {
        self.slots.iter().map(FeatureSlot::width).sum()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.slots.iter().flat_map(FeatureSlot::column_names).collect()
    }

    /// Column ranges occupied by each one-hot slot, in order.
    pub fn one_hot_blocks(&self) -> Vec<Range<usize>> {
        let mut offset = 0;
        let mut blocks = Vec::new();
        for slot in &self.slots {
            let width = slot.width();
            if matches!(slot, FeatureSlot::OneHot(_)) {
                blocks.push(offset..offset + width);
            }
            offset += width;
        }
        blocks
    }

    /// Known categories of `field`, if a categorical slot reads it.
    pub fn vocabulary(&self, field: InputField) -> Option<&[String]> {
        self.slots
            .iter()
            .find(|s| s.field() == field)
            .and_then(FeatureSlot::vocabulary)
    }

    /// Structural checks run whenever a schema is loaded from disk.
    pub fn validate(&self) -> Result<(), String> {
        if self.version != SCHEMA_VERSION {
            return Err(format!(
                "schema version {} is not supported (expected {SCHEMA_VERSION})",
                self.version
            ));
        }
        if self.slots.is_empty() {
            return Err("schema has no feature slots".to_string());
        }

        let mut seen = HashSet::new();
        for slot in &self.slots {
            let field = slot.field();
            if !seen.insert(field) {
                return Err(format!("field '{field}' appears in more than one slot"));
            }

            let expected_kind = match slot {
                FeatureSlot::Numeric { .. } => FieldKind::Numeric,
                _ => FieldKind::Categorical,
            };
            if field.kind() != expected_kind {
                return Err(format!("field '{field}' cannot use this encoding"));
            }

            if let Some(vocab) = slot.vocabulary() {
                if vocab.is_empty() {
                    return Err(format!("field '{field}' has an empty vocabulary"));
                }
                if vocab.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(format!("vocabulary of '{field}' is not sorted and unique"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::fixtures::record;

    fn sample_schema() -> FeatureSchema {
        FeatureSchema::derive(&[
            record("Male", "Analyst", "Finance"),
            record("Female", "Manager", "IT"),
            record("Female", "Associate", "Marketing"),
        ])
    }

    #[test]
    fn test_default_layout_and_width() {
        let schema = sample_schema();
        // 4 scalar columns + 3 designations + 3 units
        assert_eq!(schema.width(), 10);
        assert_eq!(
            schema.column_names(),
            vec![
                "AGE", "SEX", "RATINGS", "PAST EXP",
                "DESIGNATION_Analyst", "DESIGNATION_Associate", "DESIGNATION_Manager",
                "UNIT_Finance", "UNIT_IT", "UNIT_Marketing",
            ]
        );
        assert_eq!(schema.one_hot_blocks(), vec![4..7, 7..10]);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_schema_json_round_trip_keeps_order() {
        let schema = sample_schema();
        let json   = serde_json::to_string(&schema).unwrap();
        let back: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
        assert_eq!(back.column_names(), schema.column_names());
    }

    #[test]
    fn test_validate_rejects_duplicate_field() {
        let mut schema = sample_schema();
        schema.slots.push(FeatureSlot::Numeric { field: InputField::Age });
        assert!(schema.validate().unwrap_err().contains("more than one slot"));
    }

    #[test]
    fn test_validate_rejects_numeric_encoding_of_category() {
        let mut schema = sample_schema();
        schema.slots[1] = FeatureSlot::Numeric { field: InputField::Sex };
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unsorted_vocabulary() {
        let mut schema = sample_schema();
        if let FeatureSlot::OneHot(enc) = &mut schema.slots[5] {
            enc.categories.reverse();
        }
        assert!(schema.validate().unwrap_err().contains("not sorted"));
    }

    #[test]
    fn test_vocabulary_lookup() {
        let schema = sample_schema();
        assert_eq!(
            schema.vocabulary(InputField::Sex).unwrap(),
            &["Female".to_string(), "Male".to_string()]
        );
        assert!(schema.vocabulary(InputField::Age).is_none());
    }
}
