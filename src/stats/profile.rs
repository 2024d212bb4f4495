//! Population Profile Module
//! Field means over a predicate-restricted sub-population, and
//! matched-vs-rest significance contrasts.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::data::LoanRecord;

/// Significance threshold for the contrast t-test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Mean of each numeric field over the matching records. Nullable fields
/// average over present values only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationProfile {
    pub count: usize,
    pub avg_age: Option<f64>,
    pub avg_income: Option<f64>,
    pub avg_employment_length_years: Option<f64>,
    pub avg_loan_amount: Option<f64>,
    pub avg_interest_rate: Option<f64>,
    pub avg_loan_percent_income: Option<f64>,
}

/// One field's matched-vs-rest comparison.
#[derive(Debug, Clone, Serialize)]
pub struct FieldContrast {
    pub field: &'static str,
    pub mean_matching: Option<f64>,
    pub mean_rest: Option<f64>,
    pub p_value: Option<f64>,
    pub is_significant: bool,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

const FIELDS: [(&str, fn(&LoanRecord) -> Option<f64>); 6] = [
    ("age", |r| Some(r.age as f64)),
    ("income", |r| Some(r.income)),
    ("employment_length_years", |r| r.employment_length_years),
    ("loan_amount", |r| Some(r.loan_amount)),
    ("interest_rate", |r| r.interest_rate),
    ("loan_percent_income", |r| Some(r.loan_percent_income)),
];

/// Summarize the sub-population matching `predicate`.
pub fn profile(records: &[LoanRecord], predicate: impl Fn(&LoanRecord) -> bool) -> PopulationProfile {
    let matching: Vec<&LoanRecord> = records.iter().filter(|r| predicate(r)).collect();
    let field_values = |extract: fn(&LoanRecord) -> Option<f64>| -> Vec<f64> {
        matching.iter().filter_map(|r| extract(r)).collect()
    };

    PopulationProfile {
        count: matching.len(),
        avg_age: mean(&field_values(FIELDS[0].1)),
        avg_income: mean(&field_values(FIELDS[1].1)),
        avg_employment_length_years: mean(&field_values(FIELDS[2].1)),
        avg_loan_amount: mean(&field_values(FIELDS[3].1)),
        avg_interest_rate: mean(&field_values(FIELDS[4].1)),
        avg_loan_percent_income: mean(&field_values(FIELDS[5].1)),
    }
}

/// Compare the matching population against the rest, field by field, with
/// Welch's t-test. Answers questions like "do defaulted borrowers carry
/// significantly higher rates than performing ones".
pub fn contrast(
    records: &[LoanRecord],
    predicate: impl Fn(&LoanRecord) -> bool,
) -> Vec<FieldContrast> {
    let (matching, rest): (Vec<&LoanRecord>, Vec<&LoanRecord>) =
        records.iter().partition(|r| predicate(r));

    FIELDS
        .iter()
        .map(|(field, extract)| {
            let a: Vec<f64> = matching.iter().filter_map(|r| extract(r)).collect();
            let b: Vec<f64> = rest.iter().filter_map(|r| extract(r)).collect();
            let p_value = welch_ttest(&a, &b);
            FieldContrast {
                field,
                mean_matching: mean(&a),
                mean_rest: mean(&b),
                p_value,
                is_significant: p_value.is_some_and(|p| p <= SIGNIFICANCE_THRESHOLD),
            }
        })
        .collect()
}

/// Welch's t-test (independent samples, unequal variance). Two-tailed
/// p-value; `None` when either sample is too small for a test.
fn welch_ttest(group_values: &[f64], control_values: &[f64]) -> Option<f64> {
    let n1 = group_values.len() as f64;
    let n2 = control_values.len() as f64;

    if n1 < 2.0 || n2 < 2.0 {
        return None;
    }

    let mean1 = group_values.iter().sum::<f64>() / n1;
    let mean2 = control_values.iter().sum::<f64>() / n2;

    let var1 = group_values
        .iter()
        .map(|x| (x - mean1).powi(2))
        .sum::<f64>()
        / (n1 - 1.0);
    let var2 = control_values
        .iter()
        .map(|x| (x - mean2).powi(2))
        .sum::<f64>()
        / (n2 - 1.0);

    let se = (var1 / n1 + var2 / n2).sqrt();
    if se == 0.0 {
        return Some(1.0); // No variance difference
    }

    let t = (mean1 - mean2) / se;

    // Welch-Satterthwaite degrees of freedom
    let df_num = (var1 / n1 + var2 / n2).powi(2);
    let df_denom = (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
    let df = df_num / df_denom;

    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some(2.0 * (1.0 - dist.cdf(t.abs())))
}
