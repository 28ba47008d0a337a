use super::types::CalculationCategory;

#[derive(Copy, Clone, Debug)]
enum Match {
    All(&'static [&'static str]),
    Any(&'static [&'static str]),
}

impl Match {
    fn matches(self, lowered: &str) -> bool {
        match self {
            Match::All(keywords) => keywords.iter().all(|k| lowered.contains(k)),
            Match::Any(keywords) => keywords.iter().any(|k| lowered.contains(k)),
        }
    }
}

// Evaluated top to bottom, first match wins. Order encodes priority.
const RULES: &[(Match, CalculationCategory)] = &[
    (
        Match::All(&["sip", "monthly", "invest"]),
        CalculationCategory::Sip,
    ),
    (
        Match::Any(&["systematic investment", "monthly investment"]),
        CalculationCategory::Sip,
    ),
    (
        Match::All(&["swp", "withdraw", "monthly"]),
        CalculationCategory::Swp,
    ),
    (
        Match::Any(&["systematic withdrawal", "monthly withdrawal"]),
        CalculationCategory::Swp,
    ),
    (
        Match::Any(&["emi", "loan", "installment"]),
        CalculationCategory::Emi,
    ),
    (
        Match::Any(&["cagr", "annual growth", "compound growth"]),
        CalculationCategory::Cagr,
    ),
    (
        Match::Any(&["lumpsum", "one time", "lump sum"]),
        CalculationCategory::Lumpsum,
    ),
    (
        Match::Any(&["fixed deposit", "fd", "term deposit"]),
        CalculationCategory::Fd,
    ),
    (
        Match::Any(&["recurring deposit", "rd", "monthly deposit"]),
        CalculationCategory::Rd,
    ),
    (
        Match::Any(&["+", "-", "*", "/", "calculate", "what is"]),
        CalculationCategory::Basic,
    ),
];

pub fn classify(text: &str) -> CalculationCategory {
    let lowered = text.to_lowercase();
    RULES
        .iter()
        .find(|(rule, _)| rule.matches(&lowered))
        .map(|&(_, category)| category)
        .unwrap_or(CalculationCategory::Basic)
}
