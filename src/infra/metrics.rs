// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends the holdout evaluation of each training run to
// `metrics.csv` in the artifacts directory, so successive
// refits can be compared.
//
// Example:
//   train_rows,holdout_rows,train_r2,train_rmse,train_mae,holdout_r2,holdout_rmse,holdout_mae
//   1600,400,0.912311,9811.204400,7311.021000,0.905114,10233.871200,7702.155400

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use crate::ml::trainer::FitScore;

/// One run's scores on the training and holdout parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    pub train_rows:   usize,
    pub holdout_rows: usize,
    pub train_r2:     f64,
    pub train_rmse:   f64,
    pub train_mae:    f64,
    pub holdout_r2:   f64,
    pub holdout_rmse: f64,
    pub holdout_mae:  f64,
}

impl FitMetrics {
    pub fn new(train: FitScore, holdout: FitScore) -> Self {
        Self {
            train_rows:   train.rows,
            holdout_rows: holdout.rows,
            train_r2:     train.r2,
            train_rmse:   train.rmse,
            train_mae:    train.mae,
            holdout_r2:   holdout.r2,
            holdout_rmse: holdout.rmse,
            holdout_mae:  holdout.mae,
        }
    }

    /// Holdout R² well below training R² suggests overfitting.
    pub fn generalisation_gap(&self) -> f64 {
        self.train_r2 - self.holdout_r2
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;
        Ok(Self { csv_path: dir.join("metrics.csv") })
    }

    /// Append one row; the header is written only for a new file.
    pub fn log(&self, m: &FitMetrics) -> Result<()> {
        let is_new = !self.csv_path.exists();
        let file   = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(m)?;
        writer.flush()?;

        tracing::debug!(
            "Logged metrics: holdout_r2={:.4}, holdout_rmse={:.2}",
            m.holdout_r2,
            m.holdout_rmse
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
