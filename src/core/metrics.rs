use crate::config::toml_config::{DesiredYieldSource, EngineConfig};
use crate::core::loan;
use crate::core::{DerivedResult, ValidInputs, Visibility};

fn percent_of_price(price: f64, part: f64) -> f64 {
    if price > 0.0 {
        (part / price) * 100.0
    } else {
        0.0
    }
}

/// Derives every metric from a valid vector.
///
/// Signed values (capacity, cash flow, reductions) are kept as computed; the
/// returned visibility is left at its default and filled in by the engine.
pub fn derive(inputs: &ValidInputs, config: &EngineConfig) -> DerivedResult {
    let ValidInputs {
        price,
        rent,
        annual_rate_percent,
        term_months,
        income,
        current_monthly_debt,
        max_debt_ratio,
        rent_inclusion_ratio,
    } = *inputs;

    let monthly_rate = loan::monthly_rate(annual_rate_percent);
    let monthly_payment = loan::monthly_payment(price, annual_rate_percent, term_months);

    // own situation
    let capacity_from_income = max_debt_ratio * income;
    let remaining_own_capacity = (capacity_from_income - current_monthly_debt).max(0.0);
    let current_debt_ratio = if income > 0.0 {
        current_monthly_debt / income
    } else {
        0.0
    };

    // rental
    let project_only_debt_ratio = if rent > 0.0 { monthly_payment / rent } else { 0.0 };
    let rental_borrowing_capacity = max_debt_ratio * (rent_inclusion_ratio * rent);
    let combined_capacity =
        capacity_from_income + rental_borrowing_capacity - monthly_payment - current_monthly_debt;
    let cash_flow = rent - monthly_payment;
    let gross_yield = if price > 0.0 && rent > 0.0 {
        (rent * 12.0 / price) * 100.0
    } else {
        0.0
    };

    // target price
    let annuity_factor = loan::annuity_factor(monthly_rate, term_months);
    let desired_yield = match config.policy.desired_yield {
        DesiredYieldSource::Fixed => config.defaults.desired_yield * 100.0,
        DesiredYieldSource::Derived => {
            let coverage = max_debt_ratio * annuity_factor;
            if coverage > 0.0 {
                (12.0 / coverage) * 100.0
            } else {
                0.0
            }
        }
    };
    let target_price = if desired_yield > 0.0 && rent > 0.0 {
        (rent * 12.0) / (desired_yield / 100.0)
    } else {
        0.0
    };
    // no target price, nothing to reduce towards
    let target_reduction_percent = if target_price > 0.0 {
        percent_of_price(price, price - target_price)
    } else {
        0.0
    };

    // negotiation
    let household_income = rent + income;
    let combined_debt_ratio = if household_income > 0.0 {
        (monthly_payment + current_monthly_debt) / household_income
    } else {
        0.0
    };
    let acceptable_monthly_payment = max_debt_ratio * household_income - current_monthly_debt;
    let payment_factor = loan::payment_factor(monthly_rate, term_months);
    let acceptable_price = if acceptable_monthly_payment > 0.0 && payment_factor > 0.0 {
        acceptable_monthly_payment / payment_factor
    } else {
        0.0
    };
    let minimum_reduction_percent = percent_of_price(price, price - acceptable_price);

    DerivedResult {
        monthly_rate,
        monthly_payment,
        current_debt_ratio,
        project_only_debt_ratio,
        combined_debt_ratio,
        capacity_from_income,
        remaining_own_capacity,
        rental_borrowing_capacity,
        combined_capacity,
        cash_flow,
        gross_yield,
        annuity_factor,
        desired_yield,
        target_price,
        target_reduction_percent,
        acceptable_monthly_payment,
        acceptable_price,
        minimum_reduction_percent,
        visibility: Visibility::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ValidInputs {
        ValidInputs {
            price: 200000.0,
            rent: 800.0,
            annual_rate_percent: 3.5,
            term_months: 240,
            income: 3000.0,
            current_monthly_debt: 200.0,
            max_debt_ratio: 0.35,
            rent_inclusion_ratio: 0.7,
        }
    }

    fn close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} +/- {}, got {}",
            expected,
            tolerance,
            actual
        );
    }

    #[test]
    fn test_reference_scenario() {
        let result = derive(&inputs(), &EngineConfig::default());

        close(result.monthly_rate, 0.0029167, 1e-7);
        close(result.monthly_payment, 1159.92, 0.01);
        close(result.cash_flow, -359.92, 0.01);
        close(result.gross_yield, 4.8, 1e-9);
        close(result.capacity_from_income, 1050.0, 1e-9);
        close(result.remaining_own_capacity, 850.0, 1e-9);
        close(result.current_debt_ratio, 0.0666667, 1e-6);
        close(result.project_only_debt_ratio, 1.44990, 1e-4);
        close(result.rental_borrowing_capacity, 196.0, 1e-9);
        close(result.combined_capacity, -113.92, 0.01);
        close(result.annuity_factor, 172.4258, 1e-3);
        close(result.desired_yield, 19.8843, 1e-3);
        close(result.target_price, 48279.2, 0.1);
        close(result.target_reduction_percent, 75.8604, 1e-3);
        close(result.combined_debt_ratio, 0.357874, 1e-5);
        close(result.acceptable_monthly_payment, 1130.0, 1e-9);
        close(result.acceptable_price, 194841.1, 0.1);
        close(result.minimum_reduction_percent, 2.57944, 1e-4);
    }

    #[test]
    fn test_no_rent_falls_back_to_zero() {
        let mut no_rent = inputs();
        no_rent.rent = 0.0;
        let result = derive(&no_rent, &EngineConfig::default());

        assert_eq!(result.gross_yield, 0.0);
        assert_eq!(result.project_only_debt_ratio, 0.0);
        assert_eq!(result.target_price, 0.0);
        assert_eq!(result.rental_borrowing_capacity, 0.0);
        assert_eq!(result.target_reduction_percent, 0.0);
        assert!((result.cash_flow + result.monthly_payment).abs() < 1e-9);
    }

    #[test]
    fn test_zero_income_and_rent() {
        let mut broke = inputs();
        broke.rent = 0.0;
        broke.income = 0.0;
        let result = derive(&broke, &EngineConfig::default());

        assert_eq!(result.current_debt_ratio, 0.0);
        assert_eq!(result.combined_debt_ratio, 0.0);
        assert_eq!(result.remaining_own_capacity, 0.0);
        assert_eq!(result.acceptable_monthly_payment, -200.0);
        assert_eq!(result.acceptable_price, 0.0);
        assert_eq!(result.minimum_reduction_percent, 100.0);
    }

    #[test]
    fn test_zero_debt_ratio_has_no_desired_yield() {
        let mut cautious = inputs();
        cautious.max_debt_ratio = 0.0;
        let result = derive(&cautious, &EngineConfig::default());

        assert_eq!(result.desired_yield, 0.0);
        assert_eq!(result.target_price, 0.0);
        assert_eq!(result.target_reduction_percent, 0.0);
        assert_eq!(result.acceptable_price, 0.0);
        assert!(result.desired_yield.is_finite());
    }

    #[test]
    fn test_fixed_desired_yield() {
        let mut config = EngineConfig::default();
        config.policy.desired_yield = DesiredYieldSource::Fixed;
        let result = derive(&inputs(), &config);

        close(result.desired_yield, 5.0, 1e-12);
        close(result.target_price, 192000.0, 1e-6);
        close(result.target_reduction_percent, 4.0, 1e-9);
    }

    #[test]
    fn test_target_price_yields_desired_yield() {
        let result = derive(&inputs(), &EngineConfig::default());
        let yield_at_target = inputs().rent * 12.0 / result.target_price * 100.0;
        close(yield_at_target, result.desired_yield, 1e-9);
    }

    #[test]
    fn test_acceptable_price_meets_debt_ratio() {
        let result = derive(&inputs(), &EngineConfig::default());
        let payment = loan::monthly_payment(result.acceptable_price, 3.5, 240);
        close(payment, result.acceptable_monthly_payment, 1e-6);
    }
}
