// ============================================================
// Layer 5 — Linear Regression
// ============================================================
// Ordinary least squares on the standardised feature matrix,
// solved by linfa-linear.
//
// Reference columns:
//   A full one-hot block always sums to 1, so together with the
//   intercept its columns are exactly collinear and the normal
//   equations are singular. Before solving, the first column of
//   every one-hot block is dropped; after solving, coefficients
//   are re-expanded to full width with 0.0 in the dropped
//   positions. Every valid input has exactly one hot column per
//   block, so predictions are the same as with any other
//   least-squares solution of the full design.
//
// Prediction is a plain dot product plus intercept on the
// persisted coefficient vector.

use anyhow::{anyhow, bail, Result};
use linfa::prelude::*;
use linfa::Dataset;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept:    f64,
}

impl LinearModel {
    /// Fit on standardised `x` against `y`, dropping `reference_columns`.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, reference_columns: &[usize]) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(PipelineError::DimensionMismatch {
                stage:    "regression",
                expected: x.nrows(),
                actual:   y.len(),
            }
            .into());
        }

        let kept: Vec<usize> = (0..x.ncols())
            .filter(|c| !reference_columns.contains(c))
            .collect();

        // one row per coefficient plus the intercept, at the very least
        if x.nrows() <= kept.len() {
            bail!(
                "need more than {} rows to fit {} coefficients and an intercept, got {}",
                kept.len(),
                kept.len(),
                x.nrows()
            );
        }

        let design  = x.select(Axis(1), &kept);
        let dataset = Dataset::new(design, y.clone());
        let fitted  = LinearRegression::new()
            .fit(&dataset)
            .map_err(|e| anyhow!("least-squares fit failed: {e}"))?;

        let mut coefficients = vec![0.0; x.ncols()];
        for (&column, &beta) in kept.iter().zip(fitted.params().iter()) {
            coefficients[column] = beta;
        }
        let intercept = fitted.intercept();

        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            bail!("least-squares fit produced non-finite coefficients (collinear features?)");
        }

        tracing::debug!(
            "OLS fit: {} rows, {} free coefficients, intercept={:.4}",
            x.nrows(),
            kept.len(),
            intercept
        );

        Ok(Self { coefficients, intercept })
    }

    pub fn width(&self) -> usize {
        self.coefficients.len()
    }

    pub fn predict(&self, row: &[f64]) -> Result<f64, PipelineError> {
        if row.len() != self.width() {
            return Err(PipelineError::DimensionMismatch {
                stage:    "model",
                expected: self.width(),
                actual:   row.len(),
            });
        }
        let dot: f64 = row.iter().zip(&self.coefficients).map(|(x, b)| x * b).sum();
        Ok(self.intercept + dot)
    }

    pub fn predict_batch(&self, x: &Array2<f64>) -> Result<Array1<f64>, PipelineError> {
        if x.ncols() != self.width() {
            return Err(PipelineError::DimensionMismatch {
                stage:    "model",
                expected: self.width(),
                actual:   x.ncols(),
            });
        }
        let coefficients = Array1::from(self.coefficients.clone());
        Ok(x.dot(&coefficients) + self.intercept)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("model has no coefficients".to_string());
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("model has non-finite coefficients".to_string());
        }
        Ok(())
    }
}
