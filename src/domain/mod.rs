// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing what the system talks about:
// employee records, prediction requests and responses, the
// input fields a feature schema can draw from, and the error
// taxonomy every pipeline stage reports through.
//
// Rules for this layer:
//   - NO ndarray / linfa types
//   - NO file I/O
//   - Only structs, enums and traits
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

// The six raw input fields and their CSV column names
pub mod field;

// Historical rows, before and after imputation
pub mod record;

// Prediction request / response and numeric input limits
pub mod request;

// Tagged pipeline error type
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
