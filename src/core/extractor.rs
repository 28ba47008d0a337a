use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{CalculationCategory, ParameterRecord};

pub const DEFAULT_RATE: f64 = 8.0;
pub const DEFAULT_YEARS: i32 = 5;

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("number pattern compiles"));
static RATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*%").expect("rate pattern compiles"));
static YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)\s*(?:years|yrs|year|y)").expect("years pattern compiles")
});

pub fn extract(text: &str, category: CalculationCategory) -> ParameterRecord {
    match category {
        CalculationCategory::Sip => ParameterRecord {
            monthly_contribution: amount_after_keyword(text, &["invest", "monthly", "sip"]),
            years: extract_years(text),
            rate: extract_rate(text),
            ..ParameterRecord::default()
        },
        CalculationCategory::Swp => ParameterRecord {
            corpus: Some(amount_after_keyword(text, &["corpus", "amount", "withdraw"])),
            monthly_withdrawal: amount_after_keyword(text, &["withdraw", "monthly"]),
            years: extract_years(text),
            rate: extract_rate(text),
            ..ParameterRecord::default()
        },
        CalculationCategory::Emi => ParameterRecord {
            principal: amount_after_keyword(text, &["loan", "principal", "amount"]),
            years: extract_years(text),
            rate: extract_rate(text),
            ..ParameterRecord::default()
        },
        CalculationCategory::Cagr => extract_cagr(text),
        CalculationCategory::Lumpsum => ParameterRecord {
            principal: amount_after_keyword(text, &["invest", "amount", "principal"]),
            years: extract_years(text),
            rate: extract_rate(text),
            ..ParameterRecord::default()
        },
        CalculationCategory::Fd => ParameterRecord {
            principal: amount_after_keyword(text, &["deposit", "amount", "principal"]),
            years: extract_years(text),
            rate: extract_rate(text),
            ..ParameterRecord::default()
        },
        CalculationCategory::Rd => ParameterRecord {
            monthly_contribution: amount_after_keyword(text, &["monthly", "invest", "deposit"]),
            years: extract_years(text),
            rate: extract_rate(text),
            ..ParameterRecord::default()
        },
        CalculationCategory::Basic => ParameterRecord::default(),
    }
}

fn extract_cagr(text: &str) -> ParameterRecord {
    let numbers = all_numbers(text);
    ParameterRecord {
        beginning_value: numbers.first().copied().unwrap_or(0.0),
        ending_value: numbers.get(1).copied().unwrap_or(0.0),
        years: numbers
            .get(2)
            .map(|&value| truncate_years(value))
            .unwrap_or_else(|| extract_years(text)),
        ..ParameterRecord::default()
    }
}

pub fn amount_after_keyword(text: &str, keywords: &[&str]) -> f64 {
    let lowered = text.to_lowercase();
    for keyword in keywords {
        if let Some(index) = lowered.find(keyword) {
            if let Some(value) = first_number(&lowered[index + keyword.len()..]) {
                return value;
            }
        }
    }
    first_number(text).unwrap_or(0.0)
}

pub fn extract_rate(text: &str) -> f64 {
    RATE.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .or_else(|| first_number(text))
        .unwrap_or(DEFAULT_RATE)
}

pub fn extract_years(text: &str) -> i32 {
    let lowered = text.to_lowercase();
    YEARS
        .captures(&lowered)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .or_else(|| first_number(text))
        .map(truncate_years)
        .unwrap_or(DEFAULT_YEARS)
}

pub fn first_number(text: &str) -> Option<f64> {
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

pub fn all_numbers(text: &str) -> Vec<f64> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

// `as` truncates toward zero and saturates at the i32 bounds.
fn truncate_years(value: f64) -> i32 {
    value as i32
}
