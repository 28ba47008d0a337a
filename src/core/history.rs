use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{CalculationCategory, ParameterRecord, ResultRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub category: CalculationCategory,
    pub params: String,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn record(
        category: CalculationCategory,
        params: &ParameterRecord,
        result: &ResultRecord,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            category,
            params: params_summary(category, params),
            result: result_summary(category, result),
            timestamp,
        }
    }

    pub fn share_text(&self) -> String {
        format!(
            "{category} Calculation\n\n\
             Parameters: {params}\n\
             Result: {result}\n\n\
             Calculated on: {date}",
            category = self.category,
            params = self.params,
            result = self.result,
            date = self.timestamp.format("%b %d, %Y"),
        )
    }
}

pub fn params_summary(category: CalculationCategory, params: &ParameterRecord) -> String {
    let years = params.years;
    let rate = params.rate;
    match category {
        CalculationCategory::Sip | CalculationCategory::Rd => format!(
            "Monthly: ₹{}, Years: {years}, Rate: {rate}%",
            params.monthly_contribution
        ),
        CalculationCategory::Swp => format!(
            "Corpus: ₹{}, Years: {years}, Rate: {rate}%",
            params.corpus.unwrap_or(0.0)
        ),
        CalculationCategory::Emi => format!(
            "Principal: ₹{}, Years: {years}, Rate: {rate}%",
            params.principal
        ),
        CalculationCategory::Cagr => format!(
            "Beginning: ₹{}, Ending: ₹{}, Years: {years}",
            params.beginning_value, params.ending_value
        ),
        CalculationCategory::Lumpsum | CalculationCategory::Fd => format!(
            "Amount: ₹{}, Years: {years}, Rate: {rate}%",
            params.principal
        ),
        CalculationCategory::Basic => String::new(),
    }
}

pub fn result_summary(category: CalculationCategory, result: &ResultRecord) -> String {
    match category {
        CalculationCategory::Cagr => format!("{:.2}%", result.final_amount),
        _ => format!("₹{:.2}", result.final_amount),
    }
}
