use super::types::{CalculationCategory, ParameterRecord, ResultRecord};

// Degenerate inputs are not special-cased: zero rate, zero years or negative
// amounts may yield zero, infinities or NaN.
pub fn compute(category: CalculationCategory, params: &ParameterRecord) -> ResultRecord {
    match category {
        CalculationCategory::Sip => compute_sip(params),
        CalculationCategory::Swp => compute_swp(params),
        CalculationCategory::Emi => compute_emi(params),
        CalculationCategory::Cagr => compute_cagr(params),
        CalculationCategory::Lumpsum => compute_lumpsum(params),
        CalculationCategory::Fd => compute_fd(params),
        CalculationCategory::Rd => compute_rd(params),
        CalculationCategory::Basic => ResultRecord::default(),
    }
}

fn monthly_rate(params: &ParameterRecord) -> f64 {
    params.rate / 12.0 / 100.0
}

fn months(params: &ParameterRecord) -> i64 {
    i64::from(params.years) * 12
}

fn compute_sip(params: &ParameterRecord) -> ResultRecord {
    let rm = monthly_rate(params);
    let n = months(params) as f64;
    let contribution = params.monthly_contribution;

    let future_value = contribution * (((1.0 + rm).powf(n) - 1.0) / rm) * (1.0 + rm);
    let total = contribution * n;

    ResultRecord {
        final_amount: future_value,
        total_contributed: total,
        net_gain: future_value - total,
        periodic_amount: contribution,
    }
}

fn compute_swp(params: &ParameterRecord) -> ResultRecord {
    let rm = monthly_rate(params);
    let months = months(params);
    let n = months as f64;
    let corpus = params.corpus.unwrap_or(0.0);

    let withdrawal = if params.monthly_withdrawal > 0.0 {
        params.monthly_withdrawal
    } else {
        sustainable_withdrawal(corpus, rm, n)
    };

    let mut balance = corpus;
    for _ in 0..months {
        balance = balance * (1.0 + rm) - withdrawal;
        if balance < 0.0 {
            // Withdrawals never over-draw the corpus.
            balance = 0.0;
            break;
        }
    }

    ResultRecord {
        final_amount: balance,
        total_contributed: corpus,
        net_gain: withdrawal * n - corpus,
        periodic_amount: withdrawal,
    }
}

fn sustainable_withdrawal(corpus: f64, rm: f64, n: f64) -> f64 {
    corpus * rm / (1.0 - (1.0 + rm).powf(-n))
}

fn compute_emi(params: &ParameterRecord) -> ResultRecord {
    let rm = monthly_rate(params);
    let n = months(params) as f64;
    let principal = params.principal;

    let growth = (1.0 + rm).powf(n);
    let emi = principal * rm * growth / (growth - 1.0);
    let total_payment = emi * n;

    ResultRecord {
        final_amount: total_payment,
        total_contributed: principal,
        net_gain: total_payment - principal,
        periodic_amount: emi,
    }
}

fn compute_cagr(params: &ParameterRecord) -> ResultRecord {
    let beginning = params.beginning_value;
    let ending = params.ending_value;
    let years = f64::from(params.years);

    let cagr = ((ending / beginning).powf(1.0 / years) - 1.0) * 100.0;

    ResultRecord {
        final_amount: cagr,
        total_contributed: beginning,
        net_gain: ending - beginning,
        periodic_amount: 0.0,
    }
}

fn compute_lumpsum(params: &ParameterRecord) -> ResultRecord {
    let future_value = params.principal * (1.0 + params.rate / 100.0).powf(f64::from(params.years));

    ResultRecord {
        final_amount: future_value,
        total_contributed: params.principal,
        net_gain: future_value - params.principal,
        periodic_amount: 0.0,
    }
}

fn compute_fd(params: &ParameterRecord) -> ResultRecord {
    let quarterly_rate = params.rate / 4.0;
    let quarters = f64::from(params.years) * 4.0;
    let maturity = params.principal * (1.0 + quarterly_rate / 100.0).powf(quarters);

    ResultRecord {
        final_amount: maturity,
        total_contributed: params.principal,
        net_gain: maturity - params.principal,
        periodic_amount: 0.0,
    }
}

fn compute_rd(params: &ParameterRecord) -> ResultRecord {
    let installment = params.monthly_contribution;
    let quarterly_rate = params.rate / 4.0;
    let months = months(params);

    // Each installment compounds quarterly for the (fractional) quarters left.
    let mut maturity = 0.0;
    for i in 1..=months {
        let quarters_remaining = (months - i + 1) as f64 / 3.0;
        maturity += installment * (1.0 + quarterly_rate / 100.0).powf(quarters_remaining);
    }

    let total = installment * months as f64;

    ResultRecord {
        final_amount: maturity,
        total_contributed: total,
        net_gain: maturity - total,
        periodic_amount: installment,
    }
}
