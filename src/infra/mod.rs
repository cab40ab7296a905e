// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File formats and persistence, used by the application layer:
//
//   bundle.rs  — the versioned artifact bundle (schema, scaler,
//                model, input limits) plus the standalone schema
//                and run config, all written atomically as JSON
//
//   metrics.rs — appends holdout scores of each fitting run to
//                metrics.csv
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            serde_json docs, tempfile docs

/// Artifact bundle saving, loading and validation
pub mod bundle;

/// Fit metrics CSV logger
pub mod metrics;
