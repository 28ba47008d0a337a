use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, error};

use super::classifier::classify;
use super::engine::compute;
use super::explain::explain;
use super::extractor::extract;
use super::types::{CalculationCategory, ParameterRecord, ResultRecord};

pub const GREETING: &str = "👋 Hello! I'm your AI finance assistant. I can help you with:\n\n\
    • 💰 SIP Calculations\n\
    • 💸 SWP Planning\n\
    • 🏠 EMI Calculations\n\
    • 📈 CAGR Analysis\n\
    • 💎 Lumpsum Investments\n\
    • 🏦 Fixed Deposits\n\
    • 🔄 Recurring Deposits\n\n\
    💡 Try asking: 'Calculate SIP of ₹5000 monthly for 10 years at 12% return'";

pub const APOLOGY: &str = "I couldn't understand your request. Please try rephrasing with specific numbers.\n\n\
    Example: 'Calculate SIP of ₹5000 monthly for 10 years at 12% return'";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline worker failed: {0}")]
    Worker(#[from] JoinError),
}

pub const MAX_YEARS: i32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub category: CalculationCategory,
    pub params: ParameterRecord,
    pub explanation: String,
    pub success: bool,
}

impl Assessment {
    fn fallback() -> Self {
        Self {
            category: CalculationCategory::Basic,
            params: ParameterRecord::default(),
            explanation: APOLOGY.to_string(),
            success: false,
        }
    }
}

pub fn process_text(text: &str) -> Assessment {
    let category = classify(text);
    debug!(%category, "classified input");

    let params = extract(text, category);
    debug!(?params, "extracted parameters");

    let explanation = explain(category, &params);
    Assessment {
        category,
        params,
        explanation,
        success: true,
    }
}

pub async fn try_process_on_worker(text: String) -> Result<Assessment, PipelineError> {
    let assessment = tokio::task::spawn_blocking(move || process_text(&text)).await?;
    Ok(assessment)
}

pub async fn process_on_worker(text: String) -> Assessment {
    match try_process_on_worker(text).await {
        Ok(assessment) => assessment,
        Err(err) => {
            error!(error = %err, "error processing input");
            Assessment::fallback()
        }
    }
}

pub fn compute_result(category: CalculationCategory, params: &ParameterRecord) -> ResultRecord {
    let result = compute(category, params);
    debug!(%category, final_amount = result.final_amount, "computed result");
    result
}

pub async fn compute_on_worker(
    category: CalculationCategory,
    params: ParameterRecord,
) -> Result<ResultRecord, PipelineError> {
    let result = tokio::task::spawn_blocking(move || compute_result(category, &params)).await?;
    Ok(result)
}

// SWP and RD loop once per month, so the duration has to stay small.
pub fn validate_params(params: &ParameterRecord) -> Result<(), String> {
    if params.years > MAX_YEARS {
        return Err(format!(
            "years must be <= {MAX_YEARS}, got {}",
            params.years
        ));
    }
    Ok(())
}

pub fn render_answer(assessment: &Assessment, result: &ResultRecord) -> String {
    let monthly = if result.periodic_amount > 0.0 {
        format!("• Monthly Amount: ₹{:.2}\n", result.periodic_amount)
    } else {
        String::new()
    };

    format!(
        "{explanation}\n\n\
         📊 **Calculation Results:**\n\
         • Final Amount: ₹{final_amount:.2}\n\
         • Total Investment: ₹{total:.2}\n\
         • Wealth Gained: ₹{gain:.2}\n\
         {monthly}\n\
         💡 *Note: These are approximate values for educational purposes. Actual returns may vary.*",
        explanation = assessment.explanation,
        final_amount = result.final_amount,
        total = result.total_contributed,
        gain = result.net_gain,
    )
}
