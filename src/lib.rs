//! loansight - Loan portfolio segmentation & default-rate analytics
//!
//! Loads tabular loan records from CSV and computes reproducible
//! segmentation reports: default rates, volumes, loss estimates, and
//! population profiles, grouped by derived categorical buckets.

pub mod data;
pub mod report;
pub mod stats;

pub use data::{Dataset, LoanRecord};
pub use report::{Report, ReportOutput};
