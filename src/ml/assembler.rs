// ============================================================
// Layer 5 — Feature Assembler
// ============================================================
// Builds the exact-width, exact-order feature vector for one
// request (or one training row) by walking the schema slots in
// order. The assembler never chooses a column order itself.
//
// Every categorical lookup happens here, before any arithmetic,
// so an unknown category is reported by name instead of
// surfacing later as a shape error.

use ndarray::Array2;

use crate::domain::error::PipelineError;
use crate::domain::traits::FeatureSource;
use crate::ml::schema::FeatureSchema;

pub struct FeatureAssembler<'a> {
    schema: &'a FeatureSchema,
}

impl<'a> FeatureAssembler<'a> {
    pub fn new(schema: &'a FeatureSchema) -> Self {
        Self { schema }
    }

    /// Encode one source into a vector of `schema.width()` columns.
    pub fn assemble(&self, source: &impl FeatureSource) -> Result<Vec<f64>, PipelineError> {
        let expected = self.schema.width();
        let mut row  = Vec::with_capacity(expected);

        for slot in &self.schema.slots {
            slot.encode_into(source, &mut row)?;
        }

        if row.len() != expected {
            return Err(PipelineError::DimensionMismatch {
                stage:  "assembler",
                expected,
                actual: row.len(),
            });
        }
        Ok(row)
    }

    /// Encode many sources into an `n × width` matrix.
    pub fn assemble_matrix<S: FeatureSource>(&self, sources: &[S]) -> Result<Array2<f64>, PipelineError> {
        let width    = self.schema.width();
        let mut flat = Vec::with_capacity(sources.len() * width);

        for source in sources {
            flat.extend(self.assemble(source)?);
        }

        let actual = flat.len();
        Array2::from_shape_vec((sources.len(), width), flat).map_err(|_| {
            PipelineError::DimensionMismatch {
                stage:    "assembler",
                expected: sources.len() * width,
                actual,
            }
        })
    }
}
