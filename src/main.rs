//! loansight CLI - run segmentation reports against a loan portfolio CSV.
//!
//! Usage:
//!   loansight portfolio.csv
//!   loansight portfolio.csv --json
//!   loansight portfolio.csv --report default_rate_by_income_tier

use anyhow::{bail, Context, Result};
use std::env;

use loansight::data::Dataset;
use loansight::report::{self, Report};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1).filter(|a| !a.starts_with("--")) else {
        bail!("usage: loansight <portfolio.csv> [--json] [--report <name>]");
    };
    let json = args.iter().any(|a| a == "--json");
    let report_name = args
        .windows(2)
        .find(|w| w[0] == "--report")
        .map(|w| w[1].as_str());

    let dataset = Dataset::from_csv(path).with_context(|| format!("loading {path}"))?;
    if !dataset.row_errors().is_empty() {
        log::warn!(
            "{} malformed rows skipped; rerun with RUST_LOG=debug for details",
            dataset.row_errors().len()
        );
    }

    let outputs = match report_name {
        Some(name) => {
            let report = Report::by_name(name).with_context(|| {
                let known: Vec<&str> = Report::ALL.iter().map(|r| r.name()).collect();
                format!("unknown report '{name}'; known reports: {}", known.join(", "))
            })?;
            vec![report::run(&dataset, report)]
        }
        None => report::run_suite(&dataset),
    };

    for output in &outputs {
        if json {
            println!("{}", output.to_json()?);
        } else {
            println!("{}", output.to_table());
        }
    }

    Ok(())
}
