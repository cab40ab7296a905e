// ============================================================
// Layer 4 — Missing Value Imputer
// ============================================================
// Turns RawRecords into TrainingRecords.
//
//   - rows without a SALARY (the target) are skipped
//   - rows without SEX / DESIGNATION / UNIT are skipped
//   - missing AGE / RATINGS / PAST EXP are filled in
//
// Earlier fits filled only AGE and RATINGS. PAST EXP gets the
// same treatment here, so a gap in it no longer reaches the
// scaler as NaN.
//
// Fill strategies:
//   Sample — draw uniformly from the field's DISTINCT observed
//            values. Kept as the default so refits behave like
//            earlier fits did, but it adds noise and
//            over-weights rare values; prefer Mean or Median.
//   Mean   — arithmetic mean of observed values
//   Median — median of observed values
//
// The fill pool for each field is computed from the rows that
// survive the skip step, before anything is filled in.

use anyhow::{bail, Result};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::domain::field::InputField;
use crate::domain::record::{RawRecord, TrainingRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    #[default]
    Sample,
    Mean,
    Median,
}

/// How one numeric field gets its missing values.
enum Fill {
    Pool(Vec<f64>),
    Constant(f64),
}

impl Fill {
    fn build(strategy: ImputeStrategy, field: InputField, observed: &[f64]) -> Result<Self> {
        if observed.is_empty() {
            bail!("column '{}' has no observed values to impute from", field.column());
        }
        Ok(match strategy {
            ImputeStrategy::Sample => {
                let mut distinct: Vec<f64> = Vec::new();
                for &v in observed {
                    if !distinct.iter().any(|d| d.to_bits() == v.to_bits()) {
                        distinct.push(v);
                    }
                }
                Fill::Pool(distinct)
            }
            ImputeStrategy::Mean => {
                Fill::Constant(observed.iter().sum::<f64>() / observed.len() as f64)
            }
            ImputeStrategy::Median => Fill::Constant(median(observed)),
        })
    }

    fn value<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            // pool is never empty, see build()
            Fill::Pool(pool) => pool.choose(rng).copied().unwrap_or(f64::NAN),
            Fill::Constant(c) => *c,
        }
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Outcome of one imputation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImputeReport {
    pub kept:    usize,
    pub skipped: usize,
    pub filled:  usize,
}

pub struct Imputer {
    strategy: ImputeStrategy,
}

impl Imputer {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self { strategy }
    }

    pub fn impute<R: Rng>(
        &self,
        raw: Vec<RawRecord>,
        rng: &mut R,
    ) -> Result<(Vec<TrainingRecord>, ImputeReport)> {
        let total = raw.len();
        let usable: Vec<RawRecord> = raw
            .into_iter()
            .filter(|r| {
                r.salary.is_some() && r.sex.is_some() && r.designation.is_some() && r.unit.is_some()
            })
            .collect();

        let skipped = total - usable.len();
        if skipped > 0 {
            tracing::warn!(
                "Skipping {} row(s) with no salary or a missing category",
                skipped
            );
        }

        let fill_for = |field: InputField| -> Result<Fill> {
            let observed: Vec<f64> = usable.iter().filter_map(|r| r.numeric(field)).collect();
            Fill::build(self.strategy, field, &observed)
        };
        let age_fill        = fill_for(InputField::Age)?;
        let rating_fill     = fill_for(InputField::Rating)?;
        let experience_fill = fill_for(InputField::Experience)?;

        let mut filled  = 0usize;
        let mut records = Vec::with_capacity(usable.len());

        for r in usable {
            let mut take = |value: Option<f64>, fill: &Fill| {
                value.unwrap_or_else(|| {
                    filled += 1;
                    fill.value(rng)
                })
            };
            let age        = take(r.age, &age_fill);
            let rating     = take(r.rating, &rating_fill);
            let experience = take(r.experience, &experience_fill);

            // the filter above guarantees these are Some
            let (Some(sex), Some(designation), Some(unit), Some(salary)) =
                (r.sex, r.designation, r.unit, r.salary)
            else {
                continue;
            };

            records.push(TrainingRecord { age, sex, designation, unit, rating, experience, salary });
        }

        if filled > 0 {
            tracing::info!("Imputed {} missing numeric value(s) ({:?})", filled, self.strategy);
        }

        let report = ImputeReport { kept: records.len(), skipped, filled };
        Ok((records, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn raw(age: Option<f64>, rating: Option<f64>, salary: Option<f64>) -> RawRecord {
        RawRecord {
            age,
            sex:         Some("F".into()),
            designation: Some("Analyst".into()),
            unit:        Some("IT".into()),
            rating,
            experience:  Some(1.0),
            salary,
        }
    }

    #[test]
    fn test_sample_only_draws_observed_values() {
        let rows = vec![
            raw(Some(21.0), Some(2.0), Some(1.0)),
            raw(Some(35.0), Some(4.0), Some(1.0)),
            raw(None, None, Some(1.0)),
            raw(None, None, Some(1.0)),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let (out, report) = Imputer::new(ImputeStrategy::Sample).impute(rows, &mut rng).unwrap();

        assert_eq!(report, ImputeReport { kept: 4, skipped: 0, filled: 4 });
        for r in &out[2..] {
            assert!(r.age == 21.0 || r.age == 35.0);
            assert!(r.rating == 2.0 || r.rating == 4.0);
        }
    }

    #[test]
    fn test_mean_and_median() {
        let rows = || {
            vec![
                raw(Some(20.0), Some(1.0), Some(1.0)),
                raw(Some(30.0), Some(2.0), Some(1.0)),
                raw(Some(70.0), Some(5.0), Some(1.0)),
                raw(None, None, Some(1.0)),
            ]
        };
        let mut rng = StdRng::seed_from_u64(0);

        let (mean, _) = Imputer::new(ImputeStrategy::Mean).impute(rows(), &mut rng).unwrap();
        assert_eq!(mean[3].age, 40.0);

        let (median, _) = Imputer::new(ImputeStrategy::Median).impute(rows(), &mut rng).unwrap();
        assert_eq!(median[3].age, 30.0);
        assert_eq!(median[3].rating, 2.0);
    }

    #[test]
    fn test_rows_without_target_are_skipped() {
        let rows = vec![raw(Some(30.0), Some(3.0), None), raw(Some(31.0), Some(3.0), Some(2.0))];
        let mut rng = StdRng::seed_from_u64(0);
        let (out, report) = Imputer::new(ImputeStrategy::Sample).impute(rows, &mut rng).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_all_missing_field_is_an_error() {
        let rows = vec![raw(None, Some(3.0), Some(1.0))];
        let mut rng = StdRng::seed_from_u64(0);
        let err = Imputer::new(ImputeStrategy::Mean).impute(rows, &mut rng).unwrap_err();
        assert!(err.to_string().contains("AGE"));
    }

    #[test]
    fn test_missing_experience_is_filled() {
        let mut gap = raw(Some(30.0), Some(3.0), Some(1.0));
        gap.experience = None;
        let rows = vec![raw(Some(30.0), Some(3.0), Some(1.0)), gap];
        let mut rng = StdRng::seed_from_u64(0);
        let (out, report) = Imputer::new(ImputeStrategy::Median).impute(rows, &mut rng).unwrap();
        assert_eq!(out[1].experience, 1.0);
        assert_eq!(report.filled, 1);
    }

    #[test]
    fn test_median_even_count() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }
}
