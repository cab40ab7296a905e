// ============================================================
// Layer 4 — Descriptive Statistics
// ============================================================
// Text-mode exploration of the raw dataset: the numbers behind
// the usual HR charts (headcounts, pay by group, pay gap,
// experience buckets, missing values, correlations), computed
// over RawRecords before any imputation.
//
// Grouped statistics skip rows whose group key or salary is
// missing. Headcounts are sorted by count (descending), group
// means by mean salary (descending); ties break by name.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::field::InputField;
use crate::domain::record::RawRecord;

/// Experience buckets, half-open `[lo, hi)` in years.
pub const EXPERIENCE_BUCKETS: [(&str, f64, f64); 5] = [
    ("0-2",   0.0,  2.0),
    ("3-5",   2.0,  5.0),
    ("6-10",  5.0,  10.0),
    ("11-20", 10.0, 20.0),
    ("20+",   20.0, 50.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub group: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub group:       String,
    pub count:       usize,
    pub mean_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalarySummary {
    pub count:  usize,
    pub min:    f64,
    pub max:    f64,
    pub mean:   f64,
    pub median: f64,
}

/// Mean-salary gap between the two largest sex groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayGap {
    pub higher:   String,
    pub lower:    String,
    pub absolute: f64,
    /// lower mean / higher mean
    pub ratio:    f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSexCount {
    pub unit:   String,
    pub counts: Vec<GroupCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub column: String,
    /// Pearson r against SALARY; None when undefined
    pub r:      Option<f64>,
    pub pairs:  usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows:                       usize,
    pub salary:                     Option<SalarySummary>,
    pub headcount_by_designation:   Vec<GroupCount>,
    pub headcount_by_unit:          Vec<GroupCount>,
    pub mean_salary_by_designation: Vec<GroupMean>,
    pub mean_salary_by_unit:        Vec<GroupMean>,
    pub mean_salary_by_sex:         Vec<GroupMean>,
    pub pay_gap:                    Option<PayGap>,
    pub mean_salary_by_experience:  Vec<GroupMean>,
    pub sex_by_unit:                Vec<UnitSexCount>,
    pub missing:                    Vec<GroupCount>,
    pub correlations:               Vec<Correlation>,
}

pub fn describe(records: &[RawRecord]) -> DatasetSummary {
    let by_sex = mean_salary_by(records, |r| r.category(InputField::Sex).map(str::to_string));

    DatasetSummary {
        rows:                       records.len(),
        salary:                     salary_summary(records),
        headcount_by_designation:   headcount(records, InputField::Designation),
        headcount_by_unit:          headcount(records, InputField::Unit),
        mean_salary_by_designation: mean_salary_by(records, |r| {
            r.category(InputField::Designation).map(str::to_string)
        }),
        mean_salary_by_unit:        mean_salary_by(records, |r| {
            r.category(InputField::Unit).map(str::to_string)
        }),
        pay_gap:                    pay_gap(&by_sex),
        mean_salary_by_sex:         by_sex,
        mean_salary_by_experience:  salary_by_experience(records),
        sex_by_unit:                sex_by_unit(records),
        missing:                    missing_counts(records),
        correlations:               [InputField::Age, InputField::Rating, InputField::Experience]
            .into_iter()
            .map(|f| correlation(records, f))
            .collect(),
    }
}

fn salary_summary(records: &[RawRecord]) -> Option<SalarySummary> {
    let mut salaries: Vec<f64> = records.iter().filter_map(|r| r.salary).collect();
    if salaries.is_empty() {
        return None;
    }
    salaries.sort_by(f64::total_cmp);

    let n   = salaries.len();
    let mid = n / 2;
    Some(SalarySummary {
        count:  n,
        min:    salaries[0],
        max:    salaries[n - 1],
        mean:   salaries.iter().sum::<f64>() / n as f64,
        median: if n % 2 == 0 { (salaries[mid - 1] + salaries[mid]) / 2.0 } else { salaries[mid] },
    })
}

fn sort_counts(mut counts: Vec<GroupCount>) -> Vec<GroupCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));
    counts
}

fn headcount(records: &[RawRecord], field: InputField) -> Vec<GroupCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in records.iter().filter_map(|r| r.category(field)) {
        *counts.entry(value).or_insert(0) += 1;
    }
    sort_counts(
        counts
            .into_iter()
            .map(|(group, count)| GroupCount { group: group.to_string(), count })
            .collect(),
    )
}

fn mean_salary_by<F>(records: &[RawRecord], key: F) -> Vec<GroupMean>
where
    F: Fn(&RawRecord) -> Option<String>,
{
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for r in records {
        if let (Some(group), Some(salary)) = (key(r), r.salary) {
            let entry = sums.entry(group).or_insert((0.0, 0));
            entry.0 += salary;
            entry.1 += 1;
        }
    }

    let mut means: Vec<GroupMean> = sums
        .into_iter()
        .map(|(group, (sum, count))| GroupMean { group, count, mean_salary: sum / count as f64 })
        .collect();
    means.sort_by(|a, b| {
        b.mean_salary
            .total_cmp(&a.mean_salary)
            .then_with(|| a.group.cmp(&b.group))
    });
    means
}

fn pay_gap(by_sex: &[GroupMean]) -> Option<PayGap> {
    let mut largest: Vec<&GroupMean> = by_sex.iter().collect();
    largest.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));
    let (a, b) = (largest.first()?, largest.get(1)?);

    let (hi, lo) = if a.mean_salary >= b.mean_salary { (a, b) } else { (b, a) };
    Some(PayGap {
        higher:   hi.group.clone(),
        lower:    lo.group.clone(),
        absolute: hi.mean_salary - lo.mean_salary,
        ratio:    if hi.mean_salary != 0.0 { lo.mean_salary / hi.mean_salary } else { f64::NAN },
    })
}

fn experience_bucket(years: f64) -> Option<usize> {
    EXPERIENCE_BUCKETS
        .iter()
        .position(|&(_, lo, hi)| years >= lo && years < hi)
}

fn salary_by_experience(records: &[RawRecord]) -> Vec<GroupMean> {
    let mut sums = [(0.0f64, 0usize); EXPERIENCE_BUCKETS.len()];
    for r in records {
        if let (Some(bucket), Some(salary)) = (r.experience.and_then(experience_bucket), r.salary) {
            sums[bucket].0 += salary;
            sums[bucket].1 += 1;
        }
    }

    // bucket order, not salary order
    EXPERIENCE_BUCKETS
        .iter()
        .zip(sums)
        .filter(|(_, (_, count))| *count > 0)
        .map(|(&(label, _, _), (sum, count))| GroupMean {
            group:       label.to_string(),
            count,
            mean_salary: sum / count as f64,
        })
        .collect()
}

fn sex_by_unit(records: &[RawRecord]) -> Vec<UnitSexCount> {
    let mut table: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for r in records {
        if let (Some(unit), Some(sex)) = (r.category(InputField::Unit), r.category(InputField::Sex)) {
            *table.entry(unit).or_default().entry(sex).or_insert(0) += 1;
        }
    }
    table
        .into_iter()
        .map(|(unit, sexes)| UnitSexCount {
            unit:   unit.to_string(),
            counts: sexes
                .into_iter()
                .map(|(group, count)| GroupCount { group: group.to_string(), count })
                .collect(),
        })
        .collect()
}

fn missing_counts(records: &[RawRecord]) -> Vec<GroupCount> {
    let mut out: Vec<GroupCount> = InputField::ALL
        .iter()
        .map(|&field| {
            let count = records
                .iter()
                .filter(|r| r.numeric(field).is_none() && r.category(field).is_none())
                .count();
            GroupCount { group: field.column().to_string(), count }
        })
        .collect();
    out.push(GroupCount {
        group: "SALARY".to_string(),
        count: records.iter().filter(|r| r.salary.is_none()).count(),
    });
    out.retain(|c| c.count > 0);
    out
}

fn correlation(records: &[RawRecord], field: InputField) -> Correlation {
    let pairs: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| Some((r.numeric(field)?, r.salary?)))
        .collect();
    Correlation {
        column: field.column().to_string(),
        r:      pearson(&pairs),
        pairs:  pairs.len(),
    }
}

fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n      = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x).powi(2);
        syy += (y - mean_y).powi(2);
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some(sxy / (sxx.sqrt() * syy.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sex: &str, designation: &str, unit: &str, exp: Option<f64>, salary: Option<f64>) -> RawRecord {
        RawRecord {
            age:         exp.map(|e| 22.0 + e),
            sex:         Some(sex.into()),
            designation: Some(designation.into()),
            unit:        Some(unit.into()),
            rating:      Some(3.0),
            experience:  exp,
            salary,
        }
    }

    fn rows() -> Vec<RawRecord> {
        vec![
            row("F", "Analyst", "IT",      Some(0.0),  Some(40_000.0)),
            row("M", "Analyst", "IT",      Some(1.0),  Some(44_000.0)),
            row("F", "Manager", "Finance", Some(12.0), Some(90_000.0)),
            row("M", "Manager", "IT",      Some(25.0), Some(110_000.0)),
            row("F", "Analyst", "Finance", None,       Some(42_000.0)),
            row("M", "Analyst", "IT",      Some(3.0),  None),
        ]
    }

    #[test]
    fn test_salary_summary() {
        let s = describe(&rows()).salary.unwrap();
        assert_eq!(s.count, 5);
        assert_eq!(s.min, 40_000.0);
        assert_eq!(s.max, 110_000.0);
        assert_eq!(s.median, 44_000.0);
    }

    #[test]
    fn test_headcount_sorted_by_count() {
        let d = describe(&rows());
        assert_eq!(d.headcount_by_designation[0], GroupCount { group: "Analyst".into(), count: 4 });
        assert_eq!(d.headcount_by_unit[0], GroupCount { group: "IT".into(), count: 4 });
    }

    #[test]
    fn test_pay_gap_between_sexes() {
        let gap = describe(&rows()).pay_gap.unwrap();
        // F: (40 + 90 + 42) / 3 = 57.333k, M: (44 + 110) / 2 = 77k
        assert_eq!(gap.higher, "M");
        assert_eq!(gap.lower, "F");
        assert!((gap.absolute - (77_000.0 - 172_000.0 / 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_experience_buckets_in_label_order() {
        let d      = describe(&rows());
        let labels: Vec<_> = d.mean_salary_by_experience.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(labels, vec!["0-2", "11-20", "20+"]);
        assert_eq!(d.mean_salary_by_experience[0].mean_salary, 42_000.0);
    }

    #[test]
    fn test_bucket_edges_are_half_open() {
        assert_eq!(experience_bucket(2.0), Some(1));
        assert_eq!(experience_bucket(1.99), Some(0));
        assert_eq!(experience_bucket(50.0), None);
    }

    #[test]
    fn test_missing_counts() {
        let d = describe(&rows());
        assert!(d.missing.contains(&GroupCount { group: "PAST EXP".into(), count: 1 }));
        assert!(d.missing.contains(&GroupCount { group: "SALARY".into(), count: 1 }));
        assert!(!d.missing.iter().any(|c| c.group == "SEX"));
    }

    #[test]
    fn test_pearson_perfect_and_undefined() {
        assert!((pearson(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[(1.0, 2.0), (1.0, 4.0)]), None);
        assert_eq!(pearson(&[(1.0, 2.0)]), None);
    }

    #[test]
    fn test_sex_by_unit_table() {
        let d = describe(&rows());
        let it = d.sex_by_unit.iter().find(|u| u.unit == "IT").unwrap();
        assert_eq!(it.counts, vec![
            GroupCount { group: "F".into(), count: 1 },
            GroupCount { group: "M".into(), count: 3 },
        ]);
    }
}
