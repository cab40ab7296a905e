// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads the historical salary CSV into RawRecords.
//
// Expected headers (matched case-insensitively, whitespace
// trimmed, in any order):
//
//   SEX, DESIGNATION, AGE, SALARY, UNIT, RATINGS, PAST EXP
//
// Every other column (FIRST NAME, LAST NAME, DOJ, CURRENT DATE,
// LEAVES USED, LEAVES REMAINING, ...) is administrative and is
// dropped here. Empty cells become `None`; deciding what to do
// about them is the imputer's job. A cell that is present but
// not a number is a hard error naming the line and column.
//
// Reference: csv crate documentation

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::{io::Read, path::PathBuf};

use crate::domain::field::InputField;
use crate::domain::record::RawRecord;
use crate::domain::traits::RecordSource;

const SALARY_COLUMN: &str = "SALARY";

/// Loads RawRecords from one CSV file.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvLoader {
    fn load_all(&self) -> Result<Vec<RawRecord>> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Cannot open training data '{}'", self.path.display()))?;
        let records = read_records(file)
            .with_context(|| format!("Cannot parse '{}'", self.path.display()))?;

        tracing::info!("Loaded {} rows from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}

/// Column positions of the fields we keep.
struct ColumnMap {
    age:         usize,
    sex:         usize,
    designation: usize,
    unit:        usize,
    rating:      usize,
    experience:  usize,
    salary:      usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow!("missing required column '{name}'"))
        };

        let map = Self {
            age:         find(InputField::Age.column())?,
            sex:         find(InputField::Sex.column())?,
            designation: find(InputField::Designation.column())?,
            unit:        find(InputField::Unit.column())?,
            rating:      find(InputField::Rating.column())?,
            experience:  find(InputField::Experience.column())?,
            salary:      find(SALARY_COLUMN)?,
        };

        let dropped = headers.len().saturating_sub(7);
        if dropped > 0 {
            tracing::debug!("Ignoring {} administrative column(s)", dropped);
        }
        Ok(map)
    }
}

/// Parse CSV text from any reader.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(csv.headers()?)?;
    let mut records = Vec::new();

    for (i, row) in csv.records().enumerate() {
        let row  = row?;
        // header is line 1
        let line = i + 2;

        records.push(RawRecord {
            age:         number(&row, columns.age, InputField::Age.column(), line)?,
            sex:         text(&row, columns.sex),
            designation: text(&row, columns.designation),
            unit:        text(&row, columns.unit),
            rating:      number(&row, columns.rating, InputField::Rating.column(), line)?,
            experience:  number(&row, columns.experience, InputField::Experience.column(), line)?,
            salary:      number(&row, columns.salary, SALARY_COLUMN, line)?,
        });
    }
    Ok(records)
}

fn text(row: &StringRecord, idx: usize) -> Option<String> {
    row.get(idx)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number(row: &StringRecord, idx: usize, column: &str, line: usize) -> Result<Option<f64>> {
    match row.get(idx).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| anyhow!("line {line}: column '{column}' is not a number: '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
FIRST NAME,LAST NAME,SEX,DOJ,CURRENT DATE,DESIGNATION,AGE,SALARY,UNIT,LEAVES USED,LEAVES REMAINING,RATINGS,PAST EXP
TOMASA,ARMEN,F,5-18-2014,01-07-2016,Analyst,21,44570,Finance,24,6,2,0
ANNIE,,F,,01-07-2016,Associate,,89207,Web,,13,,7
OLIVE,ANCY,F,7-28-2014,01-07-2016,Analyst,21,40955,Finance,23,7,3,0
";

    #[test]
    fn test_reads_kept_columns_and_drops_admin() {
        let rows = read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            RawRecord {
                age:         Some(21.0),
                sex:         Some("F".into()),
                designation: Some("Analyst".into()),
                unit:        Some("Finance".into()),
                rating:      Some(2.0),
                experience:  Some(0.0),
                salary:      Some(44570.0),
            }
        );
    }

    #[test]
    fn test_empty_cells_become_none() {
        let rows = read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows[1].age, None);
        assert_eq!(rows[1].rating, None);
        assert_eq!(rows[1].experience, Some(7.0));
    }

    #[test]
    fn test_headers_are_case_insensitive_and_reorderable() {
        let csv  = "salary, past exp ,ratings,unit,age,designation,sex\n50000,3,4.5,IT,33,Manager,M\n";
        let rows = read_records(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].salary, Some(50000.0));
        assert_eq!(rows[0].experience, Some(3.0));
        assert_eq!(rows[0].sex.as_deref(), Some("M"));
    }

    #[test]
    fn test_missing_required_column() {
        let err = read_records("AGE,SEX\n30,M\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("missing required column"));
    }

    #[test]
    fn test_non_numeric_cell_names_line() {
        let csv = "SEX,DESIGNATION,AGE,SALARY,UNIT,RATINGS,PAST EXP\nM,Analyst,thirty,1,IT,3,1\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("AGE"));
    }

    #[test]
    fn test_csv_loader_reports_missing_file() {
        let err = CsvLoader::new("/definitely/not/here.csv").load_all().unwrap_err();
        assert!(err.to_string().contains("Cannot open"));
    }
}
