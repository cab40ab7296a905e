// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the historical CSV and fitting-ready rows:
//
//   salary CSV
//       │
//       ▼
//   CsvLoader   → RawRecords (administrative columns dropped,
//                 empty cells kept as None)
//       │
//       ├──────► stats::describe → DatasetSummary (`describe`)
//       ▼
//   Imputer     → TrainingRecords (rows without target skipped,
//                 missing numbers filled)
//       │
//       ▼
//   splitter    → fitting rows / holdout rows
//
// Reference: csv crate docs, rand crate docs

/// Reads the salary CSV into RawRecords
pub mod loader;

/// Fills or skips missing values
pub mod imputer;

/// Shuffles and splits rows into train/holdout sets
pub mod splitter;

/// Descriptive statistics over the raw dataset
pub mod stats;
