// ============================================================
// Layer 5 — Standard Scaler
// ============================================================
// Per-column standardisation: z = (x - mean) / std
//
// Statistics are the population mean and standard deviation
// (divisor n) of the fitting matrix. A column whose standard
// deviation is zero (constant column, e.g. a category that never
// occurs in the data) cannot be standardised; fit() refuses it
// and names the column, so the problem shows up when fitting
// rather than as inf/NaN at prediction time.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

/// Relative tolerance under which a standard deviation counts as zero.
const ZERO_STD_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    pub stds:  Vec<f64>,
}

impl StandardScaler {
    /// Fit on `x` (rows = samples). `columns` names each column for errors.
    pub fn fit(x: &Array2<f64>, columns: &[String]) -> Result<Self, PipelineError> {
        if columns.len() != x.ncols() {
            return Err(PipelineError::DimensionMismatch {
                stage:    "scaler",
                expected: columns.len(),
                actual:   x.ncols(),
            });
        }

        let n         = x.nrows() as f64;
        let mut means = Vec::with_capacity(x.ncols());
        let mut stds  = Vec::with_capacity(x.ncols());

        for (column, name) in x.axis_iter(Axis(1)).zip(columns) {
            let mean = column.sum() / n;
            let var  = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std  = var.sqrt();

            if !std.is_finite() || std <= ZERO_STD_TOLERANCE * mean.abs().max(1.0) {
                return Err(PipelineError::ZeroVariance { column: name.clone() });
            }
            means.push(mean);
            stds.push(std);
        }

        tracing::debug!("Scaler fit on {} rows x {} columns", x.nrows(), x.ncols());
        Ok(Self { means, stds })
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PipelineError> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(x, (mean, std))| (x - mean) / std)
            .collect())
    }

    pub fn transform_batch(&self, x: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        self.check_width(x.ncols())?;
        let means = Array1::from(self.means.clone());
        let stds  = Array1::from(self.stds.clone());
        Ok((x - &means) / &stds)
    }

    /// Consistency check used when a scaler is read back from disk.
    pub fn validate(&self) -> Result<(), String> {
        if self.means.len() != self.stds.len() {
            return Err(format!(
                "scaler has {} means but {} standard deviations",
                self.means.len(),
                self.stds.len()
            ));
        }
        if let Some(i) = self.stds.iter().position(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(format!("scaler column {i} has a non-positive standard deviation"));
        }
        if self.means.iter().any(|m| !m.is_finite()) {
            return Err("scaler has a non-finite mean".to_string());
        }
        Ok(())
    }

    fn check_width(&self, actual: usize) -> Result<(), PipelineError> {
        if actual != self.width() {
            return Err(PipelineError::DimensionMismatch {
                stage:    "scaler",
                expected: self.width(),
                actual,
            });
        }
        Ok(())
    }
}
