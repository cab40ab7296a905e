// ============================================================
// Layer 2 — DescribeUseCase
// ============================================================
// Loads the salary CSV and summarises it, without imputing or
// fitting anything. Missing cells are reported, not filled.

use anyhow::Result;

use crate::data::{loader::CsvLoader, stats::{describe, DatasetSummary}};
use crate::domain::traits::RecordSource;

pub struct DescribeUseCase<S: RecordSource> {
    source: S,
}

impl DescribeUseCase<CsvLoader> {
    pub fn from_csv(path: &str) -> Self {
        Self::new(CsvLoader::new(path))
    }
}

impl<S: RecordSource> DescribeUseCase<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn execute(&self) -> Result<DatasetSummary> {
        let records = self.source.load_all()?;
        let summary = describe(&records);
        tracing::info!(
            "Described {} rows ({} column(s) with missing values)",
            summary.rows,
            summary.missing.len()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RawRecord;

    struct InMemory(Vec<RawRecord>);

    impl RecordSource for InMemory {
        fn load_all(&self) -> Result<Vec<RawRecord>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_describes_any_record_source() {
        let rows = vec![
            RawRecord { sex: Some("F".into()), salary: Some(10.0), ..RawRecord::default() },
            RawRecord { sex: Some("M".into()), salary: Some(30.0), ..RawRecord::default() },
        ];
        let summary = DescribeUseCase::new(InMemory(rows)).execute().unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.salary.unwrap().mean, 20.0);
        assert_eq!(summary.pay_gap.unwrap().higher, "M");
    }

    #[test]
    fn test_missing_csv_is_an_error() {
        assert!(DescribeUseCase::from_csv("/no/such/file.csv").execute().is_err());
    }
}
