// ============================================================
// Layer 5 — ML Layer
// ============================================================
// The numeric core. Every stage is fitted once, offline, and is
// read-only afterwards:
//
//   FeatureSchema    → which fields, in which order, with which
//                      frozen vocabularies
//       │
//       ▼
//   FeatureAssembler → raw fields → fixed-width f64 vector
//       │
//       ▼
//   StandardScaler   → per-column (x - mean) / std
//       │
//       ▼
//   LinearModel      → intercept + coefficients · x
//
// trainer.rs fits scaler and model against a schema;
// inferencer.rs chains the fitted stages for one request.
//
// Reference: ndarray docs, linfa-linear docs

/// Label and one-hot category encoders
pub mod encoder;

/// Frozen feature layout and vocabularies
pub mod schema;

/// Builds feature vectors from raw fields
pub mod assembler;

/// Per-column standardisation
pub mod scaler;

/// Ordinary least squares linear model
pub mod regression;

/// Fits scaler and model; scores a fit
pub mod trainer;

/// The read-only prediction pipeline
pub mod inferencer;

#[cfg(test)]
pub(crate) mod fixtures;
