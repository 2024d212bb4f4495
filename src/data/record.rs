//! Loan Record Module
//! Typed representation of one loan origination row.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HomeOwnership {
    Rent,
    Own,
    Mortgage,
    Other,
}

impl HomeOwnership {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RENT" => Some(Self::Rent),
            "OWN" => Some(Self::Own),
            "MORTGAGE" => Some(Self::Mortgage),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "RENT",
            Self::Own => "OWN",
            Self::Mortgage => "MORTGAGE",
            Self::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanIntent {
    Personal,
    Education,
    Medical,
    Venture,
    HomeImprovement,
    DebtConsolidation,
}

impl LoanIntent {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PERSONAL" => Some(Self::Personal),
            "EDUCATION" => Some(Self::Education),
            "MEDICAL" => Some(Self::Medical),
            "VENTURE" => Some(Self::Venture),
            "HOMEIMPROVEMENT" => Some(Self::HomeImprovement),
            "DEBTCONSOLIDATION" => Some(Self::DebtConsolidation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Education => "EDUCATION",
            Self::Medical => "MEDICAL",
            Self::Venture => "VENTURE",
            Self::HomeImprovement => "HOMEIMPROVEMENT",
            Self::DebtConsolidation => "DEBTCONSOLIDATION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoanGrade {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl LoanGrade {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            "F" => Some(Self::F),
            "G" => Some(Self::G),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
        }
    }
}

/// Repayment outcome, normalized from the `0`/`1` status column regardless
/// of whether the source encodes it as integer or string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Performing,
    Defaulted,
}

impl LoanStatus {
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            0 => Some(Self::Performing),
            1 => Some(Self::Defaulted),
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Defaulted)
    }
}

/// Parse the `prior_default_on_file` column. Credit files commonly use
/// `Y`/`N`; boolean and `0`/`1` encodings are accepted as well.
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_uppercase().as_str() {
        "Y" | "YES" | "TRUE" | "1" => Some(true),
        "N" | "NO" | "FALSE" | "0" => Some(false),
        _ => None,
    }
}

/// One loan application/origination.
///
/// `loan_percent_income` is advisory (≈ loan_amount / income) and carried
/// through as loaded, not recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub age: u32,
    pub income: f64,
    pub home_ownership: HomeOwnership,
    pub employment_length_years: Option<f64>,
    pub loan_intent: LoanIntent,
    pub loan_grade: LoanGrade,
    pub loan_amount: f64,
    pub interest_rate: Option<f64>,
    pub status: LoanStatus,
    pub loan_percent_income: f64,
    pub prior_default_on_file: bool,
    pub credit_history_length_years: u32,
}
