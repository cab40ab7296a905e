// ============================================================
// Layer 6 — Artifact Bundle Store
// ============================================================
// Persists everything a prediction needs as ONE versioned file,
// so schema, scaler and model are always loaded together:
//
//   artifacts/
//     bundle.json        ← schema + scaler + model + limits
//     schema.json        ← the frozen schema on its own, reusable
//                          as `train --schema` for later refits
//     train_config.json  ← settings of the run that wrote them
//     metrics.csv        ← holdout scores, one row per run
//
// Writes go through a temp file in the same directory followed
// by a rename, so a crash mid-write never leaves a half bundle.
//
// Loading is all-or-nothing: any parse error, version mismatch
// or internal inconsistency is an ArtifactLoadFailure and the
// caller must not serve predictions.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::PipelineError;
use crate::domain::request::InputLimits;
use crate::ml::regression::LinearModel;
use crate::ml::scaler::StandardScaler;
use crate::ml::schema::FeatureSchema;
use crate::ml::trainer::FittedArtifacts;

pub const BUNDLE_FORMAT_VERSION: u32 = 1;

const BUNDLE_FILE: &str = "bundle.json";
const SCHEMA_FILE: &str = "schema.json";
const CONFIG_FILE: &str = "train_config.json";

/// Everything the prediction pipeline needs, persisted as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub format_version: u32,
    pub schema:         FeatureSchema,
    pub scaler:         StandardScaler,
    pub model:          LinearModel,
    #[serde(default)]
    pub limits:         InputLimits,
    /// Number of rows the model was fitted on
    pub fitted_rows:    usize,
    /// Where the fitting data came from
    pub source:         String,
}

impl ArtifactBundle {
    pub fn new(
        schema:      FeatureSchema,
        artifacts:   FittedArtifacts,
        fitted_rows: usize,
        source:      impl Into<String>,
    ) -> Self {
        Self {
            format_version: BUNDLE_FORMAT_VERSION,
            schema,
            scaler: artifacts.scaler,
            model:  artifacts.model,
            limits: InputLimits::default(),
            fitted_rows,
            source: source.into(),
        }
    }

    /// Check that every piece agrees on the feature width.
    pub fn validate(&self) -> Result<(), String> {
        if self.format_version != BUNDLE_FORMAT_VERSION {
            return Err(format!(
                "bundle format version {} is not supported (expected {BUNDLE_FORMAT_VERSION})",
                self.format_version
            ));
        }
        self.schema.validate()?;
        self.scaler.validate()?;
        self.model.validate()?;

        let width = self.schema.width();
        if self.scaler.width() != width {
            return Err(format!(
                "scaler width {} does not match schema width {width}",
                self.scaler.width()
            ));
        }
        if self.model.width() != width {
            return Err(format!(
                "model width {} does not match schema width {width}",
                self.model.width()
            ));
        }
        Ok(())
    }
}

/// Reads and writes the artifact files of one directory.
pub struct BundleStore {
    dir: PathBuf,
}

impl BundleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.dir.join(BUNDLE_FILE)
    }

    pub fn schema_path(&self) -> PathBuf {
        self.dir.join(SCHEMA_FILE)
    }

    pub fn exists(&self) -> bool {
        self.bundle_path().is_file()
    }

    pub fn save(&self, bundle: &ArtifactBundle) -> Result<()> {
        write_json_atomic(&self.bundle_path(), bundle)?;
        tracing::info!("Saved artifact bundle to '{}'", self.bundle_path().display());
        Ok(())
    }

    /// Load and fully validate the bundle.
    pub fn load(&self) -> Result<ArtifactBundle, PipelineError> {
        let path    = self.bundle_path();
        let failure = |reason: String| PipelineError::ArtifactLoadFailure {
            path: path.display().to_string(),
            reason,
        };

        let json = fs::read_to_string(&path).map_err(|e| failure(e.to_string()))?;
        let bundle: ArtifactBundle =
            serde_json::from_str(&json).map_err(|e| failure(e.to_string()))?;
        bundle.validate().map_err(failure)?;

        tracing::info!(
            "Loaded artifact bundle: {} features, fitted on {} rows",
            bundle.schema.width(),
            bundle.fitted_rows
        );
        Ok(bundle)
    }

    pub fn save_schema(&self, schema: &FeatureSchema) -> Result<()> {
        write_json_atomic(&self.schema_path(), schema)
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        write_json_atomic(&self.dir.join(CONFIG_FILE), cfg)
    }
}

/// Read a standalone frozen schema file.
pub fn load_schema_file(path: &Path) -> Result<FeatureSchema> {
    let schema: FeatureSchema = read_json(path)?;
    schema
        .validate()
        .map_err(|reason| anyhow::anyhow!("Invalid schema '{}': {reason}", path.display()))?;
    Ok(schema)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Cannot parse '{}'", path.display()))
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    tmp.persist(path)
        .with_context(|| format!("Cannot write '{}'", path.display()))?;

    tracing::debug!("Wrote '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::fixtures;
    use crate::ml::trainer::fit_artifacts;

    fn bundle() -> ArtifactBundle {
        let records   = fixtures::synthetic_records(48, 4);
        let schema    = FeatureSchema::derive(&records);
        let artifacts = fit_artifacts(&schema, &records).unwrap();
        ArtifactBundle::new(schema, artifacts, records.len(), "synthetic")
    }

    #[test]
    fn test_save_then_load_is_identical() {
        let dir    = tempfile::tempdir().unwrap();
        let store  = BundleStore::new(dir.path());
        let bundle = bundle();

        assert!(!store.exists());
        store.save(&bundle).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), bundle);
    }

    #[test]
    fn test_missing_bundle_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = BundleStore::new(dir.path()).load().unwrap_err();
        assert_eq!(err.kind(), "artifact_load_failure");
    }

    #[test]
    fn test_corrupt_bundle_is_load_failure() {
        let dir   = tempfile::tempdir().unwrap();
        let store = BundleStore::new(dir.path());
        fs::write(store.bundle_path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(PipelineError::ArtifactLoadFailure { .. })));
    }

    #[test]
    fn test_width_drift_is_load_failure() {
        let dir        = tempfile::tempdir().unwrap();
        let store      = BundleStore::new(dir.path());
        let mut bundle = bundle();
        bundle.model.coefficients.pop();
        store.save(&bundle).unwrap();

        match store.load() {
            Err(PipelineError::ArtifactLoadFailure { reason, .. }) => {
                assert!(reason.contains("model width"));
            }
            other => panic!("expected load failure, got {other:?}"),
        }
    }

    #[test]
    fn test_future_version_is_load_failure() {
        let dir        = tempfile::tempdir().unwrap();
        let store      = BundleStore::new(dir.path());
        let mut bundle = bundle();
        bundle.format_version = BUNDLE_FORMAT_VERSION + 1;
        store.save(&bundle).unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_schema_file_round_trip() {
        let dir    = tempfile::tempdir().unwrap();
        let store  = BundleStore::new(dir.path());
        let bundle = bundle();
        store.save_schema(&bundle.schema).unwrap();
        assert_eq!(load_schema_file(&store.schema_path()).unwrap(), bundle.schema);
    }
}
