// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// `clap`, hands the work to Layer 2 and prints the outcome.
// Nothing here computes anything.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufReader};

use crate::application::{
    describe_use_case::DescribeUseCase,
    predict_use_case::{FormChoices, PredictUseCase},
    train_use_case::TrainUseCase,
};
use crate::data::stats::{DatasetSummary, GroupMean};
use crate::domain::request::{PredictionRequest, PredictionResponse};
use commands::{BatchArgs, Commands, DescribeArgs, PredictArgs, SchemaArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "salary-predictor",
    version,
    about = "Predict employee salaries with a linear regression pipeline, and refit it from CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Predict(args)  => run_predict(args),
            Commands::Batch(args)    => run_batch(args),
            Commands::Schema(args)   => run_schema(args),
            Commands::Describe(args) => run_describe(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Fitting on '{}'", args.data);

    let report = TrainUseCase::new(args.into()).execute()?;

    println!("Fitted on {} rows ({} skipped, {} values imputed)",
        report.rows, report.impute.skipped, report.impute.filled);
    println!("Feature width: {} (schema: {:?})", report.feature_width, report.schema_origin);
    if let Some(m) = &report.metrics {
        println!(
            "Holdout ({} rows): R² {:.4}  RMSE {}  MAE {}",
            m.holdout_rows,
            m.holdout_r2,
            format_salary(m.holdout_rmse),
            format_salary(m.holdout_mae)
        );
    }
    println!("Bundle saved to {}", report.bundle_path);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let use_case = PredictUseCase::new(&args.artifacts_dir)?;
    let request  = PredictionRequest::from(&args);
    let response = use_case.predict(&request);

    if args.json {
        println!("{}", serde_json::to_string(&response)?);
    }
    match response {
        PredictionResponse::Ok { salary } => {
            if !args.json {
                println!("Predicted salary: {}", format_salary(salary));
            }
            Ok(())
        }
        PredictionResponse::Error { message, .. } => bail!(message),
    }
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let use_case = PredictUseCase::new(&args.artifacts_dir)?;
    let stdout   = io::stdout().lock();

    let summary = match &args.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Cannot open requests '{path}'"))?;
            use_case.run_batch(BufReader::new(file), stdout)?
        }
        None => use_case.run_batch(io::stdin().lock(), stdout)?,
    };

    if summary.failed > 0 {
        tracing::warn!("{} of {} request(s) failed", summary.failed, summary.ok + summary.failed);
    }
    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<()> {
    let choices = PredictUseCase::new(&args.artifacts_dir)?.choices();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&choices)?);
    } else {
        print_choices(&choices);
    }
    Ok(())
}

fn run_describe(args: DescribeArgs) -> Result<()> {
    let summary = DescribeUseCase::from_csv(&args.data).execute()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

// ─── Output formatting ────────────────────────────────────────────────────────

/// Two decimals with thousands separators: 1234567.891 → "1,234,567.89".
pub fn format_salary(value: f64) -> String {
    let fixed        = format!("{:.2}", value.abs());
    let (int, frac)  = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped  = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

fn print_choices(choices: &FormChoices) {
    for c in &choices.categories {
        println!("{:<12} {}", c.column, c.values.join(", "));
    }
    let l = &choices.limits;
    println!("{:<12} {} to {}", "AGE", l.age.min, l.age.max);
    println!("{:<12} {} to {}", "RATINGS", l.rating.min, l.rating.max);
    println!("{:<12} {} to {}", "PAST EXP", l.experience.min, l.experience.max);
    println!("\n{} feature columns", choices.columns.len());
}

fn print_means(title: &str, rows: &[GroupMean]) {
    println!("\n{title}");
    for g in rows {
        println!("  {:<16} {:>14}  (n={})", g.group, format_salary(g.mean_salary), g.count);
    }
}

fn print_summary(s: &DatasetSummary) {
    println!("Rows: {}", s.rows);
    if let Some(sal) = &s.salary {
        println!(
            "Salary: min {}  median {}  mean {}  max {}",
            format_salary(sal.min),
            format_salary(sal.median),
            format_salary(sal.mean),
            format_salary(sal.max)
        );
    }

    println!("\nHeadcount by designation");
    for g in &s.headcount_by_designation {
        println!("  {:<16} {:>6}", g.group, g.count);
    }
    println!("\nHeadcount by unit");
    for g in &s.headcount_by_unit {
        println!("  {:<16} {:>6}", g.group, g.count);
    }

    print_means("Mean salary by designation", &s.mean_salary_by_designation);
    print_means("Mean salary by unit", &s.mean_salary_by_unit);
    print_means("Mean salary by sex", &s.mean_salary_by_sex);
    if let Some(gap) = &s.pay_gap {
        println!(
            "  Pay gap: {} earns {} more than {} on average (ratio {:.3})",
            gap.higher,
            format_salary(gap.absolute),
            gap.lower,
            gap.ratio
        );
    }
    print_means("Mean salary by years of experience", &s.mean_salary_by_experience);

    println!("\nSex by unit");
    for u in &s.sex_by_unit {
        let counts: Vec<String> = u.counts.iter().map(|c| format!("{}={}", c.group, c.count)).collect();
        println!("  {:<16} {}", u.unit, counts.join("  "));
    }

    println!("\nCorrelation with SALARY");
    for c in &s.correlations {
        match c.r {
            Some(r) => println!("  {:<16} {:>7.3}  (n={})", c.column, r, c.pairs),
            None    => println!("  {:<16} {:>7}  (n={})", c.column, "n/a", c.pairs),
        }
    }

    if s.missing.is_empty() {
        println!("\nNo missing values");
    } else {
        println!("\nMissing values");
        for m in &s.missing {
            println!("  {:<16} {:>6}", m.group, m.count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_salary() {
        assert_eq!(format_salary(0.0), "0.00");
        assert_eq!(format_salary(999.999), "1,000.00");
        assert_eq!(format_salary(44570.0), "44,570.00");
        assert_eq!(format_salary(1234567.891), "1,234,567.89");
        assert_eq!(format_salary(-1500.5), "-1,500.50");
    }

    #[test]
    fn test_cli_parses_predict() {
        let cli = Cli::try_parse_from([
            "salary-predictor", "predict",
            "--age", "30", "--sex", "M", "--designation", "Analyst",
            "--unit", "Finance", "--rating", "3", "--experience", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Predict(a) => {
                let req = PredictionRequest::from(&a);
                assert_eq!(req.age, 30.0);
                assert_eq!(a.artifacts_dir, "artifacts");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_schema_and_refit_schema_conflict() {
        let res = Cli::try_parse_from([
            "salary-predictor", "train", "--schema", "s.json", "--refit-schema",
        ]);
        assert!(res.is_err());
    }
}
