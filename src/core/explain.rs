use super::types::{CalculationCategory, ParameterRecord};

pub fn explain(category: CalculationCategory, params: &ParameterRecord) -> String {
    match category {
        CalculationCategory::Sip => explain_sip(params),
        CalculationCategory::Swp => explain_swp(params),
        CalculationCategory::Emi => explain_emi(params),
        CalculationCategory::Cagr => explain_cagr(params),
        CalculationCategory::Lumpsum => explain_lumpsum(params),
        CalculationCategory::Fd => explain_fd(params),
        CalculationCategory::Rd => explain_rd(params),
        CalculationCategory::Basic => "I'll help you calculate this.".to_string(),
    }
}

fn explain_sip(params: &ParameterRecord) -> String {
    format!(
        "📈 **SIP Calculation**\n\n\
         You're investing ₹{contribution:.0} monthly for {years} years at {rate}% annual return.\n\n\
         **Formula Used:**\n\
         Future Value = P × [((1 + r)ⁿ - 1) / r] × (1 + r)\n\
         Where:\n\
         P = Monthly Investment\n\
         r = Monthly Rate ({rate}%/12)\n\
         n = Total Months ({months})\n\n\
         This calculation assumes compounding monthly returns.",
        contribution = params.monthly_contribution,
        years = params.years,
        rate = params.rate,
        months = i64::from(params.years) * 12,
    )
}

fn explain_swp(params: &ParameterRecord) -> String {
    format!(
        "💰 **SWP Calculation**\n\n\
         You're planning systematic withdrawals from your corpus for {years} years.\n\n\
         **Key Points:**\n\
         • Initial Corpus: ₹{corpus:.0}\n\
         • Monthly Withdrawal: ₹{withdrawal:.0}\n\
         • Annual Return Rate: {rate}%\n\
         • Withdrawal Period: {years} years\n\n\
         This helps you understand sustainable withdrawal rates from your investments.",
        years = params.years,
        corpus = params.corpus.unwrap_or(0.0),
        withdrawal = params.monthly_withdrawal,
        rate = params.rate,
    )
}

fn explain_emi(params: &ParameterRecord) -> String {
    format!(
        "🏠 **EMI Calculation**\n\n\
         Loan Amount: ₹{principal:.0}\n\
         Interest Rate: {rate}% per annum\n\
         Tenure: {years} years\n\n\
         **EMI Formula:**\n\
         EMI = [P × r × (1 + r)ⁿ] / [(1 + r)ⁿ - 1]\n\
         Where:\n\
         P = Principal Loan Amount\n\
         r = Monthly Interest Rate\n\
         n = Loan Tenure in Months",
        principal = params.principal,
        rate = params.rate,
        years = params.years,
    )
}

fn explain_cagr(params: &ParameterRecord) -> String {
    format!(
        "📊 **CAGR Calculation**\n\n\
         Measuring compound annual growth rate from ₹{beginning:.0} to ₹{ending:.0} over {years} years.\n\n\
         **CAGR Formula:**\n\
         CAGR = (Ending Value / Beginning Value)^(1/Years) - 1\n\n\
         This shows the smoothed annual growth rate of your investment.",
        beginning = params.beginning_value,
        ending = params.ending_value,
        years = params.years,
    )
}

fn explain_lumpsum(params: &ParameterRecord) -> String {
    format!(
        "💎 **Lumpsum Investment**\n\n\
         One-time investment of ₹{principal:.0} for {years} years at {rate}% annual return.\n\n\
         **Future Value Formula:**\n\
         FV = PV × (1 + r)ⁿ\n\
         Where:\n\
         PV = Present Value (Initial Investment)\n\
         r = Annual Rate of Return\n\
         n = Number of Years",
        principal = params.principal,
        years = params.years,
        rate = params.rate,
    )
}

fn explain_fd(params: &ParameterRecord) -> String {
    format!(
        "🏦 **Fixed Deposit**\n\n\
         Fixed Deposit of ₹{principal:.0} for {years} years at {rate}% interest.\n\n\
         **Compound Interest Formula:**\n\
         Maturity Amount = Principal × (1 + r/n)^(n×t)\n\
         Where r is annual rate, n is compounding frequency (quarterly), t is years\n\n\
         Note: This assumes quarterly compounding as per standard FD practices.",
        principal = params.principal,
        years = params.years,
        rate = params.rate,
    )
}

fn explain_rd(params: &ParameterRecord) -> String {
    format!(
        "🔄 **Recurring Deposit**\n\n\
         Monthly investment of ₹{contribution:.0} for {years} years at {rate}% interest.\n\n\
         **RD Formula:**\n\
         Each installment compounds separately based on remaining tenure\n\
         Maturity = Σ [Installment × (1 + r/4)^(quarters remaining)]\n\
         Where r is annual interest rate\n\n\
         Note: Standard RD compounds quarterly.",
        contribution = params.monthly_contribution,
        years = params.years,
        rate = params.rate,
    )
}
