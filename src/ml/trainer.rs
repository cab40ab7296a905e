// ============================================================
// Layer 5 — Fitting
// ============================================================
// Fits scaler and model for a given schema, in dependency order:
//
//   records ──assemble(schema)──► X ──fit──► scaler
//                                 X ──scale──► Xs ──OLS──► model
//
// The schema (vocabularies + column order) is an input here, not
// an output: deciding whether to derive a fresh one or reuse a
// frozen one is the application layer's call.

use anyhow::{bail, Context, Result};
use ndarray::Array1;

use crate::domain::record::TrainingRecord;
use crate::ml::assembler::FeatureAssembler;
use crate::ml::regression::LinearModel;
use crate::ml::scaler::StandardScaler;
use crate::ml::schema::FeatureSchema;

/// Scaler and model fitted against one schema.
#[derive(Debug, Clone)]
pub struct FittedArtifacts {
    pub scaler: StandardScaler,
    pub model:  LinearModel,
}

/// Goodness of fit on one set of rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitScore {
    pub rows: usize,
    pub r2:   f64,
    pub rmse: f64,
    pub mae:  f64,
}

pub fn fit_artifacts(schema: &FeatureSchema, records: &[TrainingRecord]) -> Result<FittedArtifacts> {
    if records.is_empty() {
        bail!("no training rows to fit on");
    }

    let x = FeatureAssembler::new(schema)
        .assemble_matrix(records)
        .context("Training data does not fit the feature schema")?;
    let y: Array1<f64> = records.iter().map(|r| r.salary).collect();

    let scaler = StandardScaler::fit(&x, &schema.column_names())?;
    let xs     = scaler.transform_batch(&x)?;

    // first column of each one-hot block is the reference category
    let reference: Vec<usize> = schema.one_hot_blocks().iter().map(|b| b.start).collect();
    let model = LinearModel::fit(&xs, &y, &reference)?;

    tracing::info!(
        "Fitted {} coefficients on {} rows",
        model.width(),
        records.len()
    );
    Ok(FittedArtifacts { scaler, model })
}

/// Score fitted artifacts against labelled rows.
pub fn score(
    schema:    &FeatureSchema,
    artifacts: &FittedArtifacts,
    records:   &[TrainingRecord],
) -> Result<FitScore> {
    if records.is_empty() {
        bail!("no rows to score");
    }

    let x      = FeatureAssembler::new(schema).assemble_matrix(records)?;
    let xs     = artifacts.scaler.transform_batch(&x)?;
    let pred   = artifacts.model.predict_batch(&xs)?;
    let actual: Array1<f64> = records.iter().map(|r| r.salary).collect();

    let n         = records.len() as f64;
    let residuals = &actual - &pred;
    let ss_res    = residuals.mapv(|r| r * r).sum();
    let mean      = actual.sum() / n;
    let ss_tot    = actual.mapv(|a| (a - mean).powi(2)).sum();

    Ok(FitScore {
        rows: records.len(),
        // a constant target has nothing to explain
        r2:   if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 },
        rmse: (ss_res / n).sqrt(),
        mae:  residuals.mapv(f64::abs).sum() / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PipelineError;
    use crate::ml::fixtures;

    #[test]
    fn test_fit_reproduces_affine_salaries() {
        let records   = fixtures::synthetic_records(120, 11);
        let schema    = FeatureSchema::derive(&records);
        let artifacts = fit_artifacts(&schema, &records).unwrap();
        let s         = score(&schema, &artifacts, &records).unwrap();

        assert_eq!(s.rows, 120);
        assert!(s.r2 > 0.999_999, "r2 = {}", s.r2);
        assert!(s.rmse < 1e-2, "rmse = {}", s.rmse);
    }

    #[test]
    fn test_coefficient_width_equals_schema_width() {
        let records   = fixtures::synthetic_records(60, 2);
        let schema    = FeatureSchema::derive(&records);
        let artifacts = fit_artifacts(&schema, &records).unwrap();
        assert_eq!(artifacts.model.width(), schema.width());
        assert_eq!(artifacts.scaler.width(), schema.width());
    }

    #[test]
    fn test_frozen_category_missing_from_data_is_zero_variance() {
        let records = fixtures::synthetic_records(60, 5);
        let schema  = FeatureSchema::derive(&records);

        // refit on data that never mentions one frozen unit
        let without_it: Vec<_> = records
            .into_iter()
            .filter(|r| r.unit != "Operations")
            .collect();
        let err = fit_artifacts(&schema, &without_it).unwrap_err();
        let err = err.downcast_ref::<PipelineError>().unwrap();
        assert_eq!(err, &PipelineError::ZeroVariance { column: "UNIT_Operations".into() });
    }

    #[test]
    fn test_row_outside_frozen_vocabulary_fails() {
        let records = fixtures::synthetic_records(40, 9);
        let schema  = FeatureSchema::derive(&records);

        let mut extra = records.clone();
        extra.push(fixtures::record("M", "Intern", "Finance"));
        let err = fit_artifacts(&schema, &extra).unwrap_err();
        assert!(err.chain().any(|e| e.to_string().contains("Intern")));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let schema = FeatureSchema::derive(&fixtures::synthetic_records(10, 1));
        assert!(fit_artifacts(&schema, &[]).is_err());
    }
}
