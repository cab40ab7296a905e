// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
// fitting, predicting, describing the data.
//
// Rules for this layer:
//   - No ML math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No file formats here (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The offline fitting workflow
pub mod train_use_case;

// Single, batch and form-choice prediction workflow
pub mod predict_use_case;

// Descriptive statistics over the raw CSV
pub mod describe_use_case;
