// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between layers:
//
//   RecordSource    — anything that yields historical rows
//                     (CsvLoader today)
//   FeatureSource   — anything the assembler can read raw
//                     field values from (training rows and
//                     live requests alike, so both go through
//                     the very same assembly code)
//   SalaryPredictor — anything that turns a request into a
//                     salary (SalaryPipeline today)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::error::PipelineError;
use crate::domain::field::InputField;
use crate::domain::record::RawRecord;
use crate::domain::request::PredictionRequest;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load historical employee rows.
pub trait RecordSource {
    fn load_all(&self) -> Result<Vec<RawRecord>>;
}

// ─── FeatureSource ────────────────────────────────────────────────────────────
/// Read access to the raw value of each input field.
///
/// Returns `None` when the field is of the other kind
/// (asking a categorical field for a number, or vice versa).
pub trait FeatureSource {
    fn numeric(&self, field: InputField) -> Option<f64>;
    fn category(&self, field: InputField) -> Option<&str>;
}

// ─── SalaryPredictor ──────────────────────────────────────────────────────────
/// Any component that can estimate a salary.
///
/// Implementations must be pure: the same request always
/// yields the same result.
pub trait SalaryPredictor {
    fn predict(&self, request: &PredictionRequest) -> Result<f64, PipelineError>;
}
