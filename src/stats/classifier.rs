//! Segment Classifier Module
//! Named, reusable bucket classifiers shared across reports.
//!
//! A classifier derives a categorical bucket key from a record; keys are
//! computed per report and never stored on the record itself.

use thiserror::Error;

use crate::data::LoanRecord;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("thresholds must be strictly increasing, got {0:?}")]
    InvalidThresholds(Vec<f64>),
    #[error("{thresholds} thresholds require {expected} labels, got {actual}")]
    LabelMismatch {
        thresholds: usize,
        expected: usize,
        actual: usize,
    },
}

/// A pluggable bucket-key function with a stable name.
pub struct Classifier {
    name: String,
    key: Box<dyn Fn(&LoanRecord) -> String + Send + Sync>,
}

impl Classifier {
    pub fn new(
        name: impl Into<String>,
        key: impl Fn(&LoanRecord) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            key: Box::new(key),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bucket key for one record.
    pub fn key_for(&self, record: &LoanRecord) -> String {
        (self.key)(record)
    }

    /// Threshold-tier classifier over a numeric field.
    ///
    /// A value below `thresholds[i]` maps to `labels[i]`; values at or above
    /// the last threshold map to the last label. Records where the field is
    /// absent map to `missing_label`, so every built-in stays exhaustive.
    pub fn tiered(
        name: impl Into<String>,
        extract: impl Fn(&LoanRecord) -> Option<f64> + Send + Sync + 'static,
        thresholds: Vec<f64>,
        labels: Vec<String>,
        missing_label: impl Into<String>,
    ) -> Result<Self, ClassifierError> {
        if thresholds.is_empty() || thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ClassifierError::InvalidThresholds(thresholds));
        }
        if labels.len() != thresholds.len() + 1 {
            return Err(ClassifierError::LabelMismatch {
                thresholds: thresholds.len(),
                expected: thresholds.len() + 1,
                actual: labels.len(),
            });
        }
        Ok(Self::tiered_unchecked(
            name,
            extract,
            thresholds,
            labels,
            missing_label,
        ))
    }

    fn tiered_unchecked(
        name: impl Into<String>,
        extract: impl Fn(&LoanRecord) -> Option<f64> + Send + Sync + 'static,
        thresholds: Vec<f64>,
        labels: Vec<String>,
        missing_label: impl Into<String>,
    ) -> Self {
        let missing_label = missing_label.into();
        Self::new(name, move |record| {
            let Some(value) = extract(record) else {
                return missing_label.clone();
            };
            let tier = thresholds
                .iter()
                .position(|t| value < *t)
                .unwrap_or(thresholds.len());
            labels[tier].clone()
        })
    }

    /// Income tier: < 50k Low, < 100k Middle, else High.
    pub fn income_tier() -> Self {
        Self::tiered_unchecked(
            "income_tier",
            |r| Some(r.income),
            vec![50_000.0, 100_000.0],
            vec![
                "Low Income".to_string(),
                "Middle Income".to_string(),
                "High Income".to_string(),
            ],
            "Unclassified",
        )
    }

    /// Interest-rate tier: < 10 Low, < 15 Medium, else High. Loans without
    /// a rate on file land in `Unrated`.
    pub fn interest_rate_tier() -> Self {
        Self::tiered_unchecked(
            "interest_rate_tier",
            |r| r.interest_rate,
            vec![10.0, 15.0],
            vec![
                "Low Rate".to_string(),
                "Medium Rate".to_string(),
                "High Rate".to_string(),
            ],
            "Unrated",
        )
    }

    pub fn loan_intent() -> Self {
        Self::new("loan_intent", |r| r.loan_intent.as_str().to_string())
    }

    pub fn loan_grade() -> Self {
        Self::new("loan_grade", |r| r.loan_grade.as_str().to_string())
    }

    pub fn home_ownership() -> Self {
        Self::new("home_ownership", |r| r.home_ownership.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HomeOwnership, LoanGrade, LoanIntent, LoanStatus};

    fn record(income: f64, rate: Option<f64>) -> LoanRecord {
        LoanRecord {
            age: 30,
            income,
            home_ownership: HomeOwnership::Rent,
            employment_length_years: Some(4.0),
            loan_intent: LoanIntent::Personal,
            loan_grade: LoanGrade::B,
            loan_amount: 10_000.0,
            interest_rate: rate,
            status: LoanStatus::Performing,
            loan_percent_income: 10_000.0 / income,
            prior_default_on_file: false,
            credit_history_length_years: 5,
        }
    }

    #[test]
    fn income_tier_thresholds() {
        let c = Classifier::income_tier();
        assert_eq!(c.key_for(&record(40_000.0, None)), "Low Income");
        assert_eq!(c.key_for(&record(50_000.0, None)), "Middle Income");
        assert_eq!(c.key_for(&record(99_999.0, None)), "Middle Income");
        assert_eq!(c.key_for(&record(100_000.0, None)), "High Income");
    }

    #[test]
    fn rate_tier_buckets_missing_rates() {
        let c = Classifier::interest_rate_tier();
        assert_eq!(c.key_for(&record(1.0, Some(9.9))), "Low Rate");
        assert_eq!(c.key_for(&record(1.0, Some(10.0))), "Medium Rate");
        assert_eq!(c.key_for(&record(1.0, Some(15.0))), "High Rate");
        assert_eq!(c.key_for(&record(1.0, None)), "Unrated");
    }

    #[test]
    fn tiered_rejects_non_monotonic_thresholds() {
        let result = Classifier::tiered(
            "bad",
            |r| Some(r.income),
            vec![100.0, 100.0],
            vec!["a".into(), "b".into(), "c".into()],
            "missing",
        );
        assert!(matches!(result, Err(ClassifierError::InvalidThresholds(_))));
    }

    #[test]
    fn tiered_rejects_label_arity_mismatch() {
        let result = Classifier::tiered(
            "bad",
            |r| Some(r.income),
            vec![100.0],
            vec!["a".into()],
            "missing",
        );
        assert!(matches!(
            result,
            Err(ClassifierError::LabelMismatch { expected: 2, actual: 1, .. })
        ));
    }
}
