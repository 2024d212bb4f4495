//! Aggregation Module
//! Grouped descriptive statistics over loan record segments.

use std::collections::HashMap;

use serde::Serialize;

use crate::data::LoanRecord;
use crate::stats::classifier::Classifier;

/// One group's output row. Computed fresh per report, immutable.
///
/// `default_rate_pct` and `avg_amount` are `None` for an empty group (the
/// defined "no data" sentinel); sums are zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub bucket: String,
    pub count: usize,
    pub default_rate_pct: Option<f64>,
    pub avg_amount: Option<f64>,
    pub total_volume: f64,
    pub estimated_losses: f64,
}

impl AggregateRow {
    pub fn empty(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            count: 0,
            default_rate_pct: None,
            avg_amount: None,
            total_volume: 0.0,
            estimated_losses: 0.0,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Partition records by a classifier's bucket key. Exhaustive classifiers
/// produce buckets whose counts sum back to the input length.
pub fn bucketize<'a>(
    records: &'a [LoanRecord],
    classifier: &Classifier,
) -> HashMap<String, Vec<&'a LoanRecord>> {
    let mut buckets: HashMap<String, Vec<&LoanRecord>> = HashMap::new();
    for record in records {
        buckets
            .entry(classifier.key_for(record))
            .or_default()
            .push(record);
    }
    buckets
}

/// Cartesian bucketing over two classifiers.
pub fn cross_segment<'a>(
    records: &'a [LoanRecord],
    a: &Classifier,
    b: &Classifier,
) -> HashMap<(String, String), Vec<&'a LoanRecord>> {
    let mut cells: HashMap<(String, String), Vec<&LoanRecord>> = HashMap::new();
    for record in records {
        cells
            .entry((a.key_for(record), b.key_for(record)))
            .or_default()
            .push(record);
    }
    cells
}

/// Descriptive statistics for one group.
pub fn aggregate(bucket: impl Into<String>, group: &[&LoanRecord]) -> AggregateRow {
    let count = group.len();
    if count == 0 {
        return AggregateRow::empty(bucket);
    }

    let defaults = group.iter().filter(|r| r.status.is_default()).count();
    let total_volume: f64 = group.iter().map(|r| r.loan_amount).sum();
    let estimated_losses: f64 = group
        .iter()
        .filter(|r| r.status.is_default())
        .map(|r| r.loan_amount)
        .sum();

    AggregateRow {
        bucket: bucket.into(),
        count,
        default_rate_pct: Some(round2(defaults as f64 / count as f64 * 100.0)),
        avg_amount: Some(total_volume / count as f64),
        total_volume,
        estimated_losses,
    }
}

/// Aggregate every bucket, rows ordered by bucket key for determinism.
pub fn aggregate_buckets(buckets: &HashMap<String, Vec<&LoanRecord>>) -> Vec<AggregateRow> {
    let mut keys: Vec<&String> = buckets.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| aggregate(key.clone(), &buckets[key]))
        .collect()
}

/// Aggregate every cross-segment cell, keys joined for display, ordered.
pub fn aggregate_cells(cells: &HashMap<(String, String), Vec<&LoanRecord>>) -> Vec<AggregateRow> {
    let mut keys: Vec<&(String, String)> = cells.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| aggregate(format!("{} / {}", key.0, key.1), &cells[key]))
        .collect()
}
