// ============================================================
// Layer 3 — Input Fields
// ============================================================
// Every feature column is computed from exactly one of these
// six raw fields. The schema stores fields by this enum rather
// than by free-form strings, so a typo in a persisted schema is
// a parse error instead of a silently empty column.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a field carries a number or a category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// One raw attribute of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Age,
    Sex,
    Designation,
    Unit,
    Rating,
    Experience,
}

impl InputField {
    pub const ALL: [InputField; 6] = [
        InputField::Age,
        InputField::Sex,
        InputField::Designation,
        InputField::Unit,
        InputField::Rating,
        InputField::Experience,
    ];

    /// Lower-case name used in requests and error messages.
    pub fn name(self) -> &'static str {
        match self {
            InputField::Age         => "age",
            InputField::Sex         => "sex",
            InputField::Designation => "designation",
            InputField::Unit        => "unit",
            InputField::Rating      => "rating",
            InputField::Experience  => "experience",
        }
    }

    /// Header of this field in the training CSV, also used as the
    /// feature column name (one-hot columns append `_<category>`).
    pub fn column(self) -> &'static str {
        match self {
            InputField::Age         => "AGE",
            InputField::Sex         => "SEX",
            InputField::Designation => "DESIGNATION",
            InputField::Unit        => "UNIT",
            InputField::Rating      => "RATINGS",
            InputField::Experience  => "PAST EXP",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            InputField::Age | InputField::Rating | InputField::Experience => FieldKind::Numeric,
            InputField::Sex | InputField::Designation | InputField::Unit => FieldKind::Categorical,
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
