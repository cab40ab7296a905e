// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and all their flags:
//
//   train    — fit the pipeline from a salary CSV
//   predict  — one salary from command-line fields
//   batch    — JSON-lines requests in, JSON-lines responses out
//   schema   — the known categories and numeric limits
//   describe — descriptive statistics over a salary CSV
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::data::imputer::ImputeStrategy;
use crate::domain::request::PredictionRequest;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit encoders, scaler and model from a salary CSV
    Train(TrainArgs),

    /// Predict one salary
    Predict(PredictArgs),

    /// Predict salaries for JSON-lines requests
    Batch(BatchArgs),

    /// Show the categories and numeric ranges the model accepts
    Schema(SchemaArgs),

    /// Summarise a salary CSV
    Describe(DescribeArgs),
}

/// How missing AGE / RATINGS / PAST EXP values are filled.
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ImputeArg {
    /// Draw from the distinct observed values
    #[default]
    Sample,
    Mean,
    Median,
}

impl From<ImputeArg> for ImputeStrategy {
    fn from(a: ImputeArg) -> Self {
        match a {
            ImputeArg::Sample => ImputeStrategy::Sample,
            ImputeArg::Mean   => ImputeStrategy::Mean,
            ImputeArg::Median => ImputeStrategy::Median,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Historical salary CSV
    #[arg(long, default_value = "data/salaries.csv")]
    pub data: String,

    /// Directory for bundle.json, schema.json and metrics.csv
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,

    /// Frozen schema to fit against, instead of the existing bundle's
    #[arg(long, conflicts_with = "refit_schema")]
    pub schema: Option<String>,

    /// Derive a fresh schema from this data; may change the feature width
    #[arg(long)]
    pub refit_schema: bool,

    #[arg(long, value_enum, default_value_t = ImputeArg::Sample)]
    pub impute: ImputeArg,

    /// Share of rows used for fitting during holdout evaluation;
    /// 1.0 skips the evaluation
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// RNG seed for imputation and the holdout split
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:      a.data,
            artifacts_dir:  a.artifacts_dir,
            schema_path:    a.schema,
            refit_schema:   a.refit_schema,
            impute:         a.impute.into(),
            train_fraction: a.train_fraction,
            seed:           a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,

    #[arg(long)]
    pub age: f64,

    #[arg(long)]
    pub sex: String,

    #[arg(long)]
    pub designation: String,

    #[arg(long)]
    pub unit: String,

    /// Performance rating, 1.0 to 5.0
    #[arg(long)]
    pub rating: f64,

    /// Years of past experience
    #[arg(long)]
    pub experience: f64,

    /// Print the response as JSON
    #[arg(long)]
    pub json: bool,
}

impl From<&PredictArgs> for PredictionRequest {
    fn from(a: &PredictArgs) -> Self {
        PredictionRequest {
            age:         a.age,
            sex:         a.sex.clone(),
            designation: a.designation.clone(),
            unit:        a.unit.clone(),
            rating:      a.rating,
            experience:  a.experience,
        }
    }
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,

    /// JSON-lines request file; reads stdin when omitted
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[arg(long, default_value = "data/salaries.csv")]
    pub data: String,

    #[arg(long)]
    pub json: bool,
}
