// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Loads the artifact bundle once, then serves predictions:
//
//   predict()   — one request → one PredictionResponse
//   run_batch() — JSON lines in → JSON lines out; a bad line
//                 yields an error line and the run continues
//   choices()   — what a front end needs to build its form:
//                 the known values of each categorical field
//                 and the accepted numeric ranges
//
// A bundle that fails to load is fatal here: no predictions are
// served from a partial or inconsistent set of artifacts.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::domain::error::PipelineError;
use crate::domain::field::{FieldKind, InputField};
use crate::domain::request::{InputLimits, PredictionRequest, PredictionResponse};
use crate::domain::traits::SalaryPredictor;
use crate::infra::bundle::BundleStore;
use crate::ml::inferencer::SalaryPipeline;

/// Known values of one categorical field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChoices {
    pub field:  InputField,
    pub column: String,
    pub values: Vec<String>,
}

/// Everything a request form needs to offer valid input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormChoices {
    pub categories: Vec<FieldChoices>,
    pub limits:     InputLimits,
    pub columns:    Vec<String>,
}

/// Totals of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchSummary {
    pub ok:     usize,
    pub failed: usize,
}

pub struct PredictUseCase {
    pipeline: SalaryPipeline,
}

impl PredictUseCase {
    pub fn new(artifacts_dir: &str) -> Result<Self> {
        let bundle = BundleStore::new(artifacts_dir)
            .load()
            .with_context(|| format!("Cannot serve predictions from '{artifacts_dir}'"))?;
        let pipeline = SalaryPipeline::from_bundle(bundle)?;
        Ok(Self { pipeline })
    }

    pub fn from_pipeline(pipeline: SalaryPipeline) -> Self {
        Self { pipeline }
    }

    pub fn predict(&self, request: &PredictionRequest) -> PredictionResponse {
        let result = self.pipeline.predict(request);
        match &result {
            Err(e) if e.is_user_error() => tracing::warn!("Rejected request: {e}"),
            Err(e)                      => tracing::error!("Prediction failed: {e}"),
            Ok(_)                       => {}
        }
        result.into()
    }

    /// One JSON request per input line, one JSON response per output line.
    /// Blank lines are skipped.
    pub fn run_batch<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for (i, line) in input.lines().enumerate() {
            let line = line.with_context(|| format!("Cannot read input line {}", i + 1))?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<PredictionRequest>(&line) {
                Ok(request) => self.predict(&request),
                Err(e) => {
                    tracing::warn!("Line {}: malformed request", i + 1);
                    PredictionResponse::from(Err::<f64, _>(PipelineError::MalformedRequest(
                        format!("line {}: {e}", i + 1),
                    )))
                }
            };

            match response {
                PredictionResponse::Ok { .. }    => summary.ok += 1,
                PredictionResponse::Error { .. } => summary.failed += 1,
            }
            serde_json::to_writer(&mut output, &response)?;
            writeln!(output)?;
        }

        output.flush()?;
        tracing::info!("Batch done: {} ok, {} failed", summary.ok, summary.failed);
        Ok(summary)
    }

    pub fn choices(&self) -> FormChoices {
        let schema = self.pipeline.schema();
        let categories = InputField::ALL
            .iter()
            .filter(|f| f.kind() == FieldKind::Categorical)
            .filter_map(|&field| {
                schema.vocabulary(field).map(|values| FieldChoices {
                    field,
                    column: field.column().to_string(),
                    values: values.to_vec(),
                })
            })
            .collect();

        FormChoices {
            categories,
            limits:  *self.pipeline.limits(),
            columns: schema.column_names(),
        }
    }
}
