use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CalculationCategory {
    #[serde(alias = "sip")]
    Sip,
    #[serde(alias = "swp")]
    Swp,
    #[serde(alias = "emi")]
    Emi,
    #[serde(alias = "cagr")]
    Cagr,
    #[serde(alias = "lumpsum")]
    Lumpsum,
    #[serde(alias = "fd")]
    Fd,
    #[serde(alias = "rd")]
    Rd,
    #[serde(alias = "basic")]
    Basic,
}

impl CalculationCategory {
    pub const ALL: [CalculationCategory; 8] = [
        CalculationCategory::Sip,
        CalculationCategory::Swp,
        CalculationCategory::Emi,
        CalculationCategory::Cagr,
        CalculationCategory::Lumpsum,
        CalculationCategory::Fd,
        CalculationCategory::Rd,
        CalculationCategory::Basic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CalculationCategory::Sip => "SIP",
            CalculationCategory::Swp => "SWP",
            CalculationCategory::Emi => "EMI",
            CalculationCategory::Cagr => "CAGR",
            CalculationCategory::Lumpsum => "LUMPSUM",
            CalculationCategory::Fd => "FD",
            CalculationCategory::Rd => "RD",
            CalculationCategory::Basic => "BASIC",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CalculationCategory::Sip => "Systematic Investment Plan",
            CalculationCategory::Swp => "Systematic Withdrawal Plan",
            CalculationCategory::Emi => "Equated Monthly Installment",
            CalculationCategory::Cagr => "Compound Annual Growth Rate",
            CalculationCategory::Lumpsum => "Lumpsum Investment",
            CalculationCategory::Fd => "Fixed Deposit",
            CalculationCategory::Rd => "Recurring Deposit",
            CalculationCategory::Basic => "Basic Calculation",
        }
    }
}

impl fmt::Display for CalculationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalculationCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        CalculationCategory::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown calculation category '{trimmed}'"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParameterRecord {
    pub monthly_contribution: f64,
    pub principal: f64,
    // None is an absent corpus, computed as 0.0.
    pub corpus: Option<f64>,
    pub monthly_withdrawal: f64,
    pub beginning_value: f64,
    pub ending_value: f64,
    pub years: i32,
    // percent
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub final_amount: f64,
    pub total_contributed: f64,
    pub net_gain: f64,
    pub periodic_amount: f64,
}
