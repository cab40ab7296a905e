// ============================================================
// Layer 3 — Employee Records
// ============================================================
// Two shapes of the same historical row:
//
//   RawRecord      — exactly what the CSV said; any numeric
//                    field and any category may be missing
//   TrainingRecord — every field present; produced by the
//                    imputer and never modified afterwards
//
// Administrative columns (names, join date, leave balances)
// are dropped by the loader and never reach this layer.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

use crate::domain::field::InputField;
use crate::domain::traits::FeatureSource;

/// One CSV row as loaded, before imputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub age:         Option<f64>,
    pub sex:         Option<String>,
    pub designation: Option<String>,
    pub unit:        Option<String>,
    pub rating:      Option<f64>,
    pub experience:  Option<f64>,
    /// Target column; rows without it cannot be used for fitting
    pub salary:      Option<f64>,
}

impl RawRecord {
    pub fn numeric(&self, field: InputField) -> Option<f64> {
        match field {
            InputField::Age        => self.age,
            InputField::Rating     => self.rating,
            InputField::Experience => self.experience,
            _ => None,
        }
    }

    pub fn category(&self, field: InputField) -> Option<&str> {
        match field {
            InputField::Sex         => self.sex.as_deref(),
            InputField::Designation => self.designation.as_deref(),
            InputField::Unit        => self.unit.as_deref(),
            _ => None,
        }
    }
}

/// A fully populated historical row, ready for fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub age:         f64,
    pub sex:         String,
    pub designation: String,
    pub unit:        String,
    pub rating:      f64,
    pub experience:  f64,
    pub salary:      f64,
}

impl FeatureSource for TrainingRecord {
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
