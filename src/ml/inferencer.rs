// ============================================================
// Layer 5 — Prediction Pipeline
// ============================================================
// Runs one request through the fitted stages, in fixed order:
//
//   request ─► limits ─► assemble(schema) ─► scale ─► model ─► salary
//
// Built once from a validated ArtifactBundle and read-only after
// that, so a single SalaryPipeline can serve any number of
// threads at once. Every stage reports through PipelineError;
// nothing here panics on bad input.

use crate::domain::error::PipelineError;
use crate::domain::request::{InputLimits, PredictionRequest};
use crate::domain::traits::SalaryPredictor;
use crate::infra::bundle::ArtifactBundle;
use crate::ml::assembler::FeatureAssembler;
use crate::ml::regression::LinearModel;
use crate::ml::scaler::StandardScaler;
use crate::ml::schema::FeatureSchema;

#[derive(Debug, Clone)]
pub struct SalaryPipeline {
    schema: FeatureSchema,
    scaler: StandardScaler,
    model:  LinearModel,
    limits: InputLimits,
}

impl SalaryPipeline {
    /// Take ownership of a bundle, refusing one whose parts disagree.
    pub fn from_bundle(bundle: ArtifactBundle) -> Result<Self, PipelineError> {
        bundle
            .validate()
            .map_err(|reason| PipelineError::ArtifactLoadFailure {
                path: bundle.source.clone(),
                reason,
            })?;

        Ok(Self {
            schema: bundle.schema,
            scaler: bundle.scaler,
            model:  bundle.model,
            limits: bundle.limits,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }
}

impl SalaryPredictor for SalaryPipeline {
    fn predict(&self, request: &PredictionRequest) -> Result<f64, PipelineError> {
        self.limits.validate(request)?;

        let features = FeatureAssembler::new(&self.schema).assemble(request)?;
        let scaled   = self.scaler.transform(&features)?;
        let salary   = self.model.predict(&scaled)?;

        if !salary.is_finite() {
            return Err(PipelineError::NonFiniteOutput);
        }
        tracing::debug!("Predicted {:.2} for {:?}", salary, request);
        Ok(salary)
    }
}
