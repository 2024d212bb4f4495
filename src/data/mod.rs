//! Data module - CSV loading and typed loan records

mod loader;
mod record;

pub use loader::{Dataset, LoaderError, RowError};
pub use record::{parse_flag, HomeOwnership, LoanGrade, LoanIntent, LoanRecord, LoanStatus};
