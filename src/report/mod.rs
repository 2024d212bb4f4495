//! Report module - the standard segmentation report suite and rendering.
//!
//! Each report is a pure, deterministic pass over the loaded dataset; the
//! suite runner fans out across independent reports with rayon.

use rayon::prelude::*;
use serde::Serialize;

use crate::data::Dataset;
use crate::stats::{
    aggregate_buckets, aggregate_cells, bucketize, contrast, cross_segment, profile, rank,
    AggregateRow, Classifier, FieldContrast, Metric, PopulationProfile, SortOrder,
};

/// The standard report suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    DefaultRateByIncomeTier,
    DefaultRateByIntent,
    DefaultRateByRateTier,
    GradeLossRanking,
    IncomeIntentCross,
    DefaultedBorrowerProfile,
}

impl Report {
    pub const ALL: [Report; 6] = [
        Report::DefaultRateByIncomeTier,
        Report::DefaultRateByIntent,
        Report::DefaultRateByRateTier,
        Report::GradeLossRanking,
        Report::IncomeIntentCross,
        Report::DefaultedBorrowerProfile,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Report::DefaultRateByIncomeTier => "default_rate_by_income_tier",
            Report::DefaultRateByIntent => "default_rate_by_intent",
            Report::DefaultRateByRateTier => "default_rate_by_rate_tier",
            Report::GradeLossRanking => "grade_loss_ranking",
            Report::IncomeIntentCross => "income_intent_cross",
            Report::DefaultedBorrowerProfile => "defaulted_borrower_profile",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Report::DefaultRateByIncomeTier => "Default rate by income tier",
            Report::DefaultRateByIntent => "Default rate by loan intent",
            Report::DefaultRateByRateTier => "Default rate by interest-rate tier",
            Report::GradeLossRanking => "Loan grades ranked by estimated losses",
            Report::IncomeIntentCross => "Default rate by income tier and intent",
            Report::DefaultedBorrowerProfile => "Defaulted borrower profile",
        }
    }

    pub fn by_name(name: &str) -> Option<Report> {
        Report::ALL.iter().copied().find(|r| r.name() == name)
    }
}

/// Profile report body: the sub-population summary plus per-field
/// matched-vs-rest contrasts.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub profile: PopulationProfile,
    pub contrasts: Vec<FieldContrast>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportBody {
    Segments(Vec<AggregateRow>),
    Profile(ProfileSummary),
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub name: &'static str,
    pub title: &'static str,
    pub body: ReportBody,
}

/// Run one report against a loaded dataset.
pub fn run(dataset: &Dataset, report: Report) -> ReportOutput {
    let started = std::time::Instant::now();
    let records = dataset.records();

    let body = match report {
        Report::DefaultRateByIncomeTier => ReportBody::Segments(aggregate_buckets(&bucketize(
            records,
            &Classifier::income_tier(),
        ))),
        Report::DefaultRateByIntent => ReportBody::Segments(aggregate_buckets(&bucketize(
            records,
            &Classifier::loan_intent(),
        ))),
        Report::DefaultRateByRateTier => ReportBody::Segments(aggregate_buckets(&bucketize(
            records,
            &Classifier::interest_rate_tier(),
        ))),
        Report::GradeLossRanking => {
            let rows = aggregate_buckets(&bucketize(records, &Classifier::loan_grade()));
            ReportBody::Segments(rank(
                rows,
                Metric::EstimatedLosses,
                SortOrder::Descending,
                1,
                usize::MAX,
            ))
        }
        Report::IncomeIntentCross => ReportBody::Segments(aggregate_cells(&cross_segment(
            records,
            &Classifier::income_tier(),
            &Classifier::loan_intent(),
        ))),
        Report::DefaultedBorrowerProfile => ReportBody::Profile(ProfileSummary {
            profile: profile(records, |r| r.status.is_default()),
            contrasts: contrast(records, |r| r.status.is_default()),
        }),
    };

    log::debug!("report {} computed in {:?}", report.name(), started.elapsed());
    ReportOutput {
        name: report.name(),
        title: report.title(),
        body,
    }
}

/// Run the whole suite. Reports are independent pure passes over the same
/// immutable dataset, so they parallelize without locking; output order is
/// the fixed suite order.
pub fn run_suite(dataset: &Dataset) -> Vec<ReportOutput> {
    Report::ALL
        .par_iter()
        .map(|report| run(dataset, *report))
        .collect()
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

impl ReportOutput {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// CSV lines, header first. `None` metrics render as empty cells.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        match &self.body {
            ReportBody::Segments(rows) => {
                out.push_str("bucket,count,default_rate_pct,avg_amount,total_volume,estimated_losses\n");
                for row in rows {
                    let rate = row.default_rate_pct.map(|v| format!("{v:.2}")).unwrap_or_default();
                    let avg = row.avg_amount.map(|v| format!("{v:.2}")).unwrap_or_default();
                    out.push_str(&format!(
                        "{},{},{},{},{:.2},{:.2}\n",
                        row.bucket, row.count, rate, avg, row.total_volume, row.estimated_losses
                    ));
                }
            }
            ReportBody::Profile(summary) => {
                out.push_str("field,mean_matching,mean_rest,p_value,is_significant\n");
                for c in &summary.contrasts {
                    let p = c.p_value.map(|v| format!("{v:.4}")).unwrap_or_default();
                    out.push_str(&format!(
                        "{},{},{},{},{}\n",
                        c.field,
                        c.mean_matching.map(|v| format!("{v:.2}")).unwrap_or_default(),
                        c.mean_rest.map(|v| format!("{v:.2}")).unwrap_or_default(),
                        p,
                        c.is_significant
                    ));
                }
            }
        }
        out
    }

    /// Plain text table for terminal display.
    pub fn to_table(&self) -> String {
        let mut out = format!("{}\n", self.title);
        match &self.body {
            ReportBody::Segments(rows) => {
                out.push_str(&format!(
                    "{:<32} {:>8} {:>10} {:>12} {:>14} {:>14}\n",
                    "bucket", "count", "rate %", "avg amount", "volume", "est. losses"
                ));
                for row in rows {
                    out.push_str(&format!(
                        "{:<32} {:>8} {:>10} {:>12} {:>14.2} {:>14.2}\n",
                        row.bucket,
                        row.count,
                        fmt_opt(row.default_rate_pct),
                        fmt_opt(row.avg_amount),
                        row.total_volume,
                        row.estimated_losses
                    ));
                }
            }
            ReportBody::Profile(summary) => {
                out.push_str(&format!("matching records: {}\n", summary.profile.count));
                out.push_str(&format!(
                    "{:<26} {:>14} {:>14} {:>10} {:>6}\n",
                    "field", "matching mean", "rest mean", "p-value", "sig."
                ));
                for c in &summary.contrasts {
                    out.push_str(&format!(
                        "{:<26} {:>14} {:>14} {:>10} {:>6}\n",
                        c.field,
                        fmt_opt(c.mean_matching),
                        fmt_opt(c.mean_rest),
                        c.p_value.map(|v| format!("{v:.4}")).unwrap_or_else(|| "-".to_string()),
                        if c.is_significant { "yes" } else { "no" }
                    ));
                }
            }
        }
        out
    }
}
