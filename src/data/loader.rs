//! CSV Data Loader Module
//! Loads loan portfolio CSVs into typed records using Polars.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::record::{
    parse_flag, HomeOwnership, LoanGrade, LoanIntent, LoanRecord, LoanStatus,
};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// One malformed row, skipped during load and reported alongside the
/// successfully loaded records.
#[derive(Debug, Clone)]
pub struct RowError {
    pub row: usize,
    pub column: &'static str,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: column '{}': {}", self.row, self.column, self.message)
    }
}

/// An immutable, fully loaded record collection. Owned by one load call;
/// reports borrow it for the duration of a run.
pub struct Dataset {
    records: Vec<LoanRecord>,
    row_errors: Vec<RowError>,
    file_path: Option<PathBuf>,
}

impl Dataset {
    /// Load a CSV file using Polars and extract typed records.
    ///
    /// Rows with a missing or malformed required field are skipped and
    /// collected as [`RowError`]s (partial success). The two nullable
    /// columns (`employment_length_years`, `interest_rate`) may carry
    /// nulls or be absent entirely.
    pub fn from_csv(file_path: &str) -> Result<Self, LoaderError> {
        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let (records, row_errors) = extract_records(&df)?;
        log::info!(
            "loaded {} records from {} ({} malformed rows skipped)",
            records.len(),
            file_path,
            row_errors.len()
        );

        Ok(Self {
            records,
            row_errors,
            file_path: Some(PathBuf::from(file_path)),
        })
    }

    /// Build a dataset from already-typed records (no parse step).
    pub fn from_records(records: Vec<LoanRecord>) -> Self {
        Self {
            records,
            row_errors: Vec::new(),
            file_path: None,
        }
    }

    pub fn records(&self) -> &[LoanRecord] {
        &self.records
    }

    pub fn row_errors(&self) -> &[RowError] {
        &self.row_errors
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

fn required_column<'a>(df: &'a DataFrame, name: &'static str) -> Result<&'a Column, LoaderError> {
    df.column(name).map_err(|_| LoaderError::MissingColumn(name))
}

/// Required numeric column, cast to f64. Values that fail the cast become
/// nulls and surface as per-row errors during extraction.
fn float_column(df: &DataFrame, name: &'static str) -> Result<Float64Chunked, LoaderError> {
    let casted = required_column(df, name)?.cast(&DataType::Float64)?;
    Ok(casted.f64()?.clone())
}

/// Nullable numeric column; an absent column reads as all-null.
fn optional_float_column(
    df: &DataFrame,
    name: &'static str,
) -> Result<Option<Float64Chunked>, LoaderError> {
    let Ok(col) = df.column(name) else {
        log::warn!("column '{name}' not present; treating all values as null");
        return Ok(None);
    };
    let casted = col.cast(&DataType::Float64)?;
    Ok(Some(casted.f64()?.clone()))
}

/// Categorical column value as a plain string (Polars quotes string
/// AnyValues when displayed).
fn string_value(col: &Column, i: usize, name: &'static str) -> Result<String, RowError> {
    let val = col.get(i).map_err(|e| RowError {
        row: i,
        column: name,
        message: e.to_string(),
    })?;
    if val.is_null() {
        return Err(RowError {
            row: i,
            column: name,
            message: "missing value".into(),
        });
    }
    Ok(val.to_string().trim_matches('"').to_string())
}

fn float_value(ca: &Float64Chunked, i: usize, name: &'static str) -> Result<f64, RowError> {
    match ca.get(i) {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(RowError {
            row: i,
            column: name,
            message: "missing or non-numeric value".into(),
        }),
    }
}

fn count_value(ca: &Float64Chunked, i: usize, name: &'static str) -> Result<u32, RowError> {
    let v = float_value(ca, i, name)?;
    if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return Err(RowError {
            row: i,
            column: name,
            message: format!("expected a non-negative integer, got {v}"),
        });
    }
    Ok(v as u32)
}

fn extract_records(df: &DataFrame) -> Result<(Vec<LoanRecord>, Vec<RowError>), LoaderError> {
    let age = float_column(df, "age")?;
    let income = float_column(df, "income")?;
    let loan_amount = float_column(df, "loan_amount")?;
    let loan_percent_income = float_column(df, "loan_percent_income")?;
    let credit_history = float_column(df, "credit_history_length_years")?;
    let employment = optional_float_column(df, "employment_length_years")?;
    let interest_rate = optional_float_column(df, "interest_rate")?;

    let home_ownership = required_column(df, "home_ownership")?;
    let loan_intent = required_column(df, "loan_intent")?;
    let loan_grade = required_column(df, "loan_grade")?;
    let prior_default = required_column(df, "prior_default_on_file")?;
    // The source data declares this column INT but some producers emit it
    // as a string; casting accepts both and nulls anything else.
    let status = required_column(df, "status")?.cast(&DataType::Int64)?;
    let status = status.i64()?;

    let mut records = Vec::with_capacity(df.height());
    let mut row_errors = Vec::new();

    for i in 0..df.height() {
        let read_row = || -> Result<LoanRecord, RowError> {
            let income_v = float_value(&income, i, "income")?;
            if income_v < 0.0 {
                return Err(RowError {
                    row: i,
                    column: "income",
                    message: format!("income must be >= 0, got {income_v}"),
                });
            }
            let amount_v = float_value(&loan_amount, i, "loan_amount")?;
            if amount_v <= 0.0 {
                return Err(RowError {
                    row: i,
                    column: "loan_amount",
                    message: format!("loan_amount must be > 0, got {amount_v}"),
                });
            }

            let ownership_s = string_value(home_ownership, i, "home_ownership")?;
            let ownership = HomeOwnership::parse(&ownership_s).ok_or_else(|| RowError {
                row: i,
                column: "home_ownership",
                message: format!("unknown value '{ownership_s}'"),
            })?;
            let intent_s = string_value(loan_intent, i, "loan_intent")?;
            let intent = LoanIntent::parse(&intent_s).ok_or_else(|| RowError {
                row: i,
                column: "loan_intent",
                message: format!("unknown value '{intent_s}'"),
            })?;
            let grade_s = string_value(loan_grade, i, "loan_grade")?;
            let grade = LoanGrade::parse(&grade_s).ok_or_else(|| RowError {
                row: i,
                column: "loan_grade",
                message: format!("unknown value '{grade_s}'"),
            })?;
            let prior_s = string_value(prior_default, i, "prior_default_on_file")?;
            let prior = parse_flag(&prior_s).ok_or_else(|| RowError {
                row: i,
                column: "prior_default_on_file",
                message: format!("unknown value '{prior_s}'"),
            })?;
            let status_flag = status.get(i).ok_or_else(|| RowError {
                row: i,
                column: "status",
                message: "missing or non-numeric value".into(),
            })?;
            let status_v = LoanStatus::from_flag(status_flag).ok_or_else(|| RowError {
                row: i,
                column: "status",
                message: format!("expected 0 or 1, got {status_flag}"),
            })?;

            Ok(LoanRecord {
                age: count_value(&age, i, "age")?,
                income: income_v,
                home_ownership: ownership,
                employment_length_years: employment.as_ref().and_then(|ca| ca.get(i)),
                loan_intent: intent,
                loan_grade: grade,
                loan_amount: amount_v,
                interest_rate: interest_rate.as_ref().and_then(|ca| ca.get(i)),
                status: status_v,
                loan_percent_income: float_value(&loan_percent_income, i, "loan_percent_income")?,
                prior_default_on_file: prior,
                credit_history_length_years: count_value(&credit_history, i, "credit_history_length_years")?,
            })
        };

        match read_row() {
            Ok(record) => records.push(record),
            Err(err) => {
                log::debug!("skipping {err}");
                row_errors.push(err);
            }
        }
    }

    Ok((records, row_errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    type Row<'a> = (i64, f64, &'a str, &'a str, &'a str, f64, f64, i64, f64, &'a str, i64);

    fn frame(rows: Vec<Row<'_>>) -> DataFrame {
        let mut age = Vec::new();
        let mut income = Vec::new();
        let mut ownership = Vec::new();
        let mut intent = Vec::new();
        let mut grade = Vec::new();
        let mut amount = Vec::new();
        let mut rate = Vec::new();
        let mut status = Vec::new();
        let mut pct = Vec::new();
        let mut prior = Vec::new();
        let mut history = Vec::new();
        for r in rows {
            age.push(r.0);
            income.push(r.1);
            ownership.push(r.2.to_string());
            intent.push(r.3.to_string());
            grade.push(r.4.to_string());
            amount.push(r.5);
            rate.push(r.6);
            status.push(r.7);
            pct.push(r.8);
            prior.push(r.9.to_string());
            history.push(r.10);
        }
        DataFrame::new(vec![
            Column::new("age".into(), age),
            Column::new("income".into(), income),
            Column::new("home_ownership".into(), ownership),
            Column::new("loan_intent".into(), intent),
            Column::new("loan_grade".into(), grade),
            Column::new("loan_amount".into(), amount),
            Column::new("interest_rate".into(), rate),
            Column::new("status".into(), status),
            Column::new("loan_percent_income".into(), pct),
            Column::new("prior_default_on_file".into(), prior),
            Column::new("credit_history_length_years".into(), history),
        ])
        .expect("build test frame")
    }

    #[test]
    fn extracts_typed_records() {
        let df = frame(vec![
            (25, 48000.0, "RENT", "EDUCATION", "B", 9000.0, 11.5, 1, 0.19, "Y", 3),
            (41, 120000.0, "MORTGAGE", "VENTURE", "A", 25000.0, 7.2, 0, 0.21, "N", 15),
        ]);
        let (records, errors) = extract_records(&df).expect("extract");
        assert_eq!(records.len(), 2);
        assert!(errors.is_empty());
        assert_eq!(records[0].status, LoanStatus::Defaulted);
        assert_eq!(records[0].loan_grade, LoanGrade::B);
        assert!(records[0].prior_default_on_file);
        assert_eq!(records[1].home_ownership, HomeOwnership::Mortgage);
        assert_eq!(records[1].interest_rate, Some(7.2));
    }

    #[test]
    fn malformed_rows_are_skipped_and_reported() {
        let df = frame(vec![
            (25, 48000.0, "RENT", "EDUCATION", "B", 9000.0, 11.5, 1, 0.19, "Y", 3),
            (32, 55000.0, "CASTLE", "MEDICAL", "C", 4000.0, 9.0, 0, 0.07, "N", 6),
            (29, 61000.0, "OWN", "PERSONAL", "A", -100.0, 8.0, 0, 0.01, "N", 7),
        ]);
        let (records, errors) = extract_records(&df).expect("extract");
        assert_eq!(records.len(), 1);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].column, "home_ownership");
        assert_eq!(errors[1].column, "loan_amount");
    }

    #[test]
    fn status_accepts_string_encoding() {
        let df = DataFrame::new(vec![
            Column::new("age".into(), vec![30i64]),
            Column::new("income".into(), vec![52000.0]),
            Column::new("home_ownership".into(), vec!["RENT".to_string()]),
            Column::new("loan_intent".into(), vec!["MEDICAL".to_string()]),
            Column::new("loan_grade".into(), vec!["C".to_string()]),
            Column::new("loan_amount".into(), vec![7000.0]),
            Column::new("interest_rate".into(), vec![12.0]),
            Column::new("status".into(), vec!["1".to_string()]),
            Column::new("loan_percent_income".into(), vec![0.13]),
            Column::new("prior_default_on_file".into(), vec!["N".to_string()]),
            Column::new("credit_history_length_years".into(), vec![8i64]),
        ])
        .expect("build test frame");
        let (records, errors) = extract_records(&df).expect("extract");
        assert!(errors.is_empty());
        assert_eq!(records[0].status, LoanStatus::Defaulted);
    }

    #[test]
    fn missing_required_column_fails_the_load() {
        let df = DataFrame::new(vec![Column::new("age".into(), vec![30i64])]).expect("frame");
        let err = extract_records(&df).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn("income")));
    }

    #[test]
    fn absent_nullable_columns_read_as_none() {
        let df = DataFrame::new(vec![
            Column::new("age".into(), vec![30i64]),
            Column::new("income".into(), vec![52000.0]),
            Column::new("home_ownership".into(), vec!["RENT".to_string()]),
            Column::new("loan_intent".into(), vec!["MEDICAL".to_string()]),
            Column::new("loan_grade".into(), vec!["C".to_string()]),
            Column::new("loan_amount".into(), vec![7000.0]),
            Column::new("status".into(), vec![1i64]),
            Column::new("loan_percent_income".into(), vec![0.13]),
            Column::new("prior_default_on_file".into(), vec!["N".to_string()]),
            Column::new("credit_history_length_years".into(), vec![8i64]),
        ])
        .expect("build test frame");
        let (records, errors) = extract_records(&df).expect("extract");
        assert!(errors.is_empty());
        assert_eq!(records[0].interest_rate, None);
        assert_eq!(records[0].employment_length_years, None);
    }
}
