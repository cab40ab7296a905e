// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one offline fitting run, in order:
//
//   Step 1: Load the salary CSV          (Layer 4 - data)
//   Step 2: Impute missing values        (Layer 4 - data)
//   Step 3: Resolve the feature schema   (Layer 6 - infra)
//   Step 4: Holdout evaluation, optional (Layer 4 + 5);
//           a failed evaluation is logged, not fatal
//   Step 5: Fit scaler and model         (Layer 5 - ml)
//   Step 6: Save bundle, schema, config  (Layer 6 - infra)
//
// Schema resolution, first match wins:
//   --refit-schema   → derive from this data
//   --schema <file>  → that file, verbatim
//   existing bundle  → its schema, so the feature width and
//                      column order never drift between refits
//   otherwise        → derive from this data (first run)
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    imputer::{ImputeReport, ImputeStrategy, Imputer},
    loader::CsvLoader,
    splitter::split_train_holdout,
};
use crate::domain::record::TrainingRecord;
use crate::domain::traits::RecordSource;
use crate::infra::{
    bundle::{load_schema_file, ArtifactBundle, BundleStore},
    metrics::{FitMetrics, MetricsLogger},
};
use crate::ml::schema::FeatureSchema;
use crate::ml::trainer::{fit_artifacts, score};

// ─── Training Configuration ──────────────────────────────────────────────────
// Settings of one fitting run. Saved next to the bundle as
// train_config.json so a run can be reproduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:      String,
    pub artifacts_dir:  String,
    pub schema_path:    Option<String>,
    pub refit_schema:   bool,
    pub impute:         ImputeStrategy,
    /// Share of rows used for fitting when evaluating; 1.0 skips holdout
    pub train_fraction: f64,
    pub seed:           Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:      "data/salaries.csv".to_string(),
            artifacts_dir:  "artifacts".to_string(),
            schema_path:    None,
            refit_schema:   false,
            impute:         ImputeStrategy::default(),
            train_fraction: 0.8,
            seed:           None,
        }
    }
}

/// Where the schema of a run came from.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOrigin {
    Derived,
    File(String),
    ExistingBundle,
}

/// What a finished run did, for the CLI to print.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub rows:          usize,
    pub impute:        ImputeReport,
    pub schema_origin: SchemaOrigin,
    pub feature_width: usize,
    pub metrics:       Option<FitMetrics>,
    pub bundle_path:   String,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainReport> {
        let cfg   = &self.config;
        let store = BundleStore::new(&cfg.artifacts_dir);

        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };

        // ── Step 1: Load the CSV ─────────────────────────────────────────────
        let raw = CsvLoader::new(&cfg.data_path).load_all()?;

        // ── Step 2: Impute ───────────────────────────────────────────────────
        let (records, impute) = Imputer::new(cfg.impute).impute(raw, &mut rng)?;
        tracing::info!(
            "{} usable rows ({} skipped, {} values filled)",
            impute.kept,
            impute.skipped,
            impute.filled
        );

        // ── Step 3: Resolve the schema ───────────────────────────────────────
        let (schema, schema_origin) = self.resolve_schema(&store, &records)?;
        tracing::info!(
            "Feature schema: {} columns ({:?})",
            schema.width(),
            schema_origin
        );

        // ── Step 4: Holdout evaluation ───────────────────────────────────────
        let metrics = if cfg.train_fraction < 1.0 {
            let (train, holdout) =
                split_train_holdout(records.clone(), cfg.train_fraction, &mut rng);
            // a rare category can land wholly in the holdout part
            match self.evaluate(&store, &schema, &train, &holdout) {
                Ok(metrics) => Some(metrics),
                Err(e) => {
                    tracing::warn!("Skipping holdout evaluation: {e:#}");
                    None
                }
            }
        } else {
            None
        };

        // ── Step 5: Fit on every row ─────────────────────────────────────────
        let artifacts = fit_artifacts(&schema, &records)
            .context("Fitting on the full dataset failed")?;

        // ── Step 6: Persist ──────────────────────────────────────────────────
        let bundle = ArtifactBundle::new(schema, artifacts, records.len(), cfg.data_path.clone());
        store.save(&bundle)?;
        store.save_schema(&bundle.schema)?;
        store.save_config(cfg)?;

        Ok(TrainReport {
            rows: records.len(),
            impute,
            schema_origin,
            feature_width: bundle.schema.width(),
            metrics,
            bundle_path: store.bundle_path().display().to_string(),
        })
    }

    fn resolve_schema(
        &self,
        store:   &BundleStore,
        records: &[TrainingRecord],
    ) -> Result<(FeatureSchema, SchemaOrigin)> {
        let cfg = &self.config;

        if cfg.refit_schema {
            return Ok((FeatureSchema::derive(records), SchemaOrigin::Derived));
        }
        if let Some(path) = &cfg.schema_path {
            let schema = load_schema_file(Path::new(path))?;
            return Ok((schema, SchemaOrigin::File(path.clone())));
        }
        if store.exists() {
            let bundle = store
                .load()
                .context("Existing bundle is unreadable; pass --refit-schema to start over")?;
            return Ok((bundle.schema, SchemaOrigin::ExistingBundle));
        }
        Ok((FeatureSchema::derive(records), SchemaOrigin::Derived))
    }

    fn evaluate(
        &self,
        store:   &BundleStore,
        schema:  &FeatureSchema,
        train:   &[TrainingRecord],
        holdout: &[TrainingRecord],
    ) -> Result<FitMetrics> {
        let artifacts = fit_artifacts(schema, train)
            .context("Fitting on the training split failed; try a larger --train-fraction")?;

        let train_score   = score(schema, &artifacts, train)?;
        let holdout_score = if holdout.is_empty() {
            tracing::warn!("Holdout split is empty; scoring on training rows only");
            train_score
        } else {
            score(schema, &artifacts, holdout)
                .context("Scoring the holdout split failed")?
        };

        let metrics = FitMetrics::new(train_score, holdout_score);
        tracing::info!(
            "Holdout R² {:.4}, RMSE {:.2}, MAE {:.2} (gap {:.4})",
            metrics.holdout_r2,
            metrics.holdout_rmse,
            metrics.holdout_mae,
            metrics.generalisation_gap()
        );

        let logger = MetricsLogger::new(store.dir())?;
        logger.log(&metrics)?;
        tracing::debug!("Appended metrics to '{}'", logger.csv_path().display());
        Ok(metrics)
    }
}
