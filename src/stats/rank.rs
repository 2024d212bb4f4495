//! Ranking Module
//! Deterministic ordering of aggregate rows by a named metric.

use std::cmp::Ordering;

use crate::stats::aggregate::AggregateRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count,
    DefaultRate,
    AvgAmount,
    TotalVolume,
    EstimatedLosses,
}

impl Metric {
    /// Metric value for a row; `None` is the empty-group sentinel.
    fn value(&self, row: &AggregateRow) -> Option<f64> {
        match self {
            Metric::Count => Some(row.count as f64),
            Metric::DefaultRate => row.default_rate_pct,
            Metric::AvgAmount => row.avg_amount,
            Metric::TotalVolume => Some(row.total_volume),
            Metric::EstimatedLosses => Some(row.estimated_losses),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Filter groups below `min_count`, sort by `metric`, truncate to `limit`.
///
/// Ties break on bucket key lexical order so repeated runs agree; sentinel
/// rows (empty groups) always sort after valued rows.
pub fn rank(
    mut rows: Vec<AggregateRow>,
    metric: Metric,
    order: SortOrder,
    min_count: usize,
    limit: usize,
) -> Vec<AggregateRow> {
    rows.retain(|row| row.count >= min_count);
    rows.sort_by(|a, b| {
        let by_metric = match (metric.value(a), metric.value(b)) {
            (Some(x), Some(y)) => {
                let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_metric.then_with(|| a.bucket.cmp(&b.bucket))
    });
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(bucket: &str, count: usize, rate: Option<f64>, volume: f64) -> AggregateRow {
        AggregateRow {
            bucket: bucket.to_string(),
            count,
            default_rate_pct: rate,
            avg_amount: rate.map(|_| volume / count.max(1) as f64),
            total_volume: volume,
            estimated_losses: 0.0,
        }
    }

    #[test]
    fn sorts_by_metric_with_lexical_tie_break() {
        let rows = vec![
            row("C", 10, Some(5.0), 100.0),
            row("A", 10, Some(5.0), 100.0),
            row("B", 10, Some(9.0), 100.0),
        ];
        let ranked = rank(rows, Metric::DefaultRate, SortOrder::Descending, 0, 10);
        let order: Vec<&str> = ranked.iter().map(|r| r.bucket.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn descending_is_exact_reverse_of_ascending_without_ties() {
        let rows = vec![
            row("A", 5, Some(1.0), 10.0),
            row("B", 5, Some(3.0), 20.0),
            row("C", 5, Some(2.0), 30.0),
        ];
        let desc = rank(rows.clone(), Metric::DefaultRate, SortOrder::Descending, 0, 10);
        let mut asc = rank(rows, Metric::DefaultRate, SortOrder::Ascending, 0, 10);
        asc.reverse();
        assert_eq!(desc, asc);
    }

    #[test]
    fn filters_below_min_count_and_truncates() {
        let rows = vec![
            row("A", 2, Some(1.0), 10.0),
            row("B", 50, Some(3.0), 20.0),
            row("C", 40, Some(2.0), 30.0),
            row("D", 30, Some(4.0), 40.0),
        ];
        let ranked = rank(rows, Metric::Count, SortOrder::Descending, 10, 2);
        let order: Vec<&str> = ranked.iter().map(|r| r.bucket.as_str()).collect();
        assert_eq!(order, vec!["B", "C"]);
    }

    #[test]
    fn sentinel_rows_sort_last() {
        let rows = vec![
            row("Empty", 0, None, 0.0),
            row("Full", 4, Some(25.0), 10.0),
        ];
        let ranked = rank(rows, Metric::DefaultRate, SortOrder::Ascending, 0, 10);
        assert_eq!(ranked[0].bucket, "Full");
        assert_eq!(ranked[1].bucket, "Empty");
    }
}
