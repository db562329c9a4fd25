//! Fixed-payment loan mathematics.
//!
//! `(1 + r)^-n` is evaluated as `exp(-n * ln_1p(r))` so that small monthly
//! rates over long terms keep their precision.

/// Converts a nominal annual rate in percent to a monthly fraction.
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 1200.0
}

/// Present value of one currency unit paid monthly for `term_months`.
///
/// Tends to `term_months` as the rate goes to zero.
pub fn annuity_factor(monthly_rate: f64, term_months: u32) -> f64 {
    let n = f64::from(term_months);
    if monthly_rate == 0.0 {
        return n;
    }
    // 1 - (1 + r)^-n
    let discounted = -(-n * monthly_rate.ln_1p()).exp_m1();
    discounted / monthly_rate
}

/// Monthly payment per unit of principal, the reciprocal of the annuity factor.
/// Zero when there is no term to spread the principal over.
pub fn payment_factor(monthly_rate: f64, term_months: u32) -> f64 {
    let factor = annuity_factor(monthly_rate, term_months);
    if factor > 0.0 {
        1.0 / factor
    } else {
        0.0
    }
}

/// Fixed monthly payment of an amortizing loan. Not rounded.
pub fn monthly_payment(principal: f64, annual_rate_percent: f64, term_months: u32) -> f64 {
    let rate = monthly_rate(annual_rate_percent);
    if rate == 0.0 {
        if term_months == 0 {
            return 0.0;
        }
        return principal / f64::from(term_months);
    }
    principal * payment_factor(rate, term_months)
}
