use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{apply_percent, percent_of, Money, Percent};

use super::financing::Amortizer;
use super::inputs::PropertyInputs;
use super::operating::PipelineOutcome;

/// Ceiling for compounded values and rents (AED 10^20). Long holds at high
/// growth saturate here instead of leaving the Decimal range.
pub const PROJECTION_CEILING: Money = dec!(100_000_000_000_000_000_000);

/// End-of-year position for one year of the holding period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    /// 1-indexed
    pub year: u32,
    pub property_value: Money,
    pub annual_rent: Money,
    pub effective_rental_income: Money,
    pub operating_expenses: Money,
    pub noi: Money,
    pub debt_service: Money,
    pub interest_paid: Money,
    pub principal_repaid: Money,
    pub remaining_loan_balance: Money,
    pub equity: Money,
    pub cash_flow: Money,
    pub cumulative_cash_flow: Money,
    pub selling_fee: Money,
    pub sale_proceeds: Money,
    pub total_return: Money,
    pub roi_percent: Percent,
}

/// Project the holding period year by year.
///
/// Values and rents compound from today with an end-of-year convention, so
/// year 1 already carries one year of growth. The loan is amortized month by
/// month across years. Service charge is held flat; maintenance follows the
/// property value and management follows the rent.
pub fn project_years(
    inputs: &PropertyInputs,
    base: &PipelineOutcome,
    selling_fee_percent: Percent,
) -> Vec<YearProjection> {
    let years = inputs.holding_period_years;
    let capital_growth = Decimal::ONE + inputs.capital_growth_percent / Decimal::ONE_HUNDRED;
    let rent_growth = Decimal::ONE + inputs.rent_growth_percent / Decimal::ONE_HUNDRED;
    let initial_investment = base.upfront_costs.total_initial_investment;

    let mut amortizer = Amortizer::from_inputs(inputs, &base.financing);
    let mut property_value = inputs.purchase_price;
    let mut annual_rent = base.operating.gross_annual_rental_income;
    let mut cumulative_cash_flow = Decimal::ZERO;
    let mut projections = Vec::with_capacity(years as usize);

    for year in 1..=years {
        property_value = compound(property_value, capital_growth);
        annual_rent = compound(annual_rent, rent_growth);

        let vacancy = apply_percent(annual_rent, inputs.vacancy_rate_percent);
        let effective = annual_rent - vacancy;
        let operating_expenses = inputs.service_charge_annual
            + apply_percent(property_value, inputs.annual_maintenance_percent)
            + apply_percent(annual_rent, inputs.property_management_fee_percent);
        let noi = effective - operating_expenses;

        let loan_year = amortizer.advance_year();
        let cash_flow = noi - loan_year.debt_service;
        cumulative_cash_flow += cash_flow;

        let remaining = loan_year.closing_balance;
        let selling_fee = apply_percent(property_value, selling_fee_percent);
        let sale_proceeds = property_value - remaining - selling_fee;
        let total_return = sale_proceeds + cumulative_cash_flow - initial_investment;

        projections.push(YearProjection {
            year,
            property_value,
            annual_rent,
            effective_rental_income: effective,
            operating_expenses,
            noi,
            debt_service: loan_year.debt_service,
            interest_paid: loan_year.interest_paid,
            principal_repaid: loan_year.principal_repaid,
            remaining_loan_balance: remaining,
            equity: property_value - remaining,
            cash_flow,
            cumulative_cash_flow,
            selling_fee,
            sale_proceeds,
            total_return,
            roi_percent: percent_of(total_return, initial_investment),
        });
    }

    projections
}

/// One year of growth, clamped to `±PROJECTION_CEILING`.
fn compound(value: Money, factor: Decimal) -> Money {
    match value.checked_mul(factor) {
        Some(grown) => grown.clamp(-PROJECTION_CEILING, PROJECTION_CEILING),
        None if value.is_sign_negative() != factor.is_sign_negative() => -PROJECTION_CEILING,
        None => PROJECTION_CEILING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{DEFAULT_OTHER_CLOSING_COSTS, DEFAULT_SELLING_FEE_PERCENT};
    use crate::investment::financing::amortize;
    use crate::investment::operating::run_pipeline;
    use rust_decimal_macros::dec;

    fn sample_inputs() -> PropertyInputs {
        PropertyInputs::builder()
            .purchase_price(dec!(1_200_000))
            .down_payment_percent(dec!(35))
            .mortgage_interest_rate(dec!(5.25))
            .mortgage_term_years(25)
            .expected_monthly_rent(dec!(8500))
            .service_charge_annual(dec!(13_500))
            .annual_maintenance_percent(dec!(1))
            .property_management_fee_percent(dec!(5))
            .dld_fee_percent(dec!(4))
            .agent_fee_percent(dec!(2))
            .capital_growth_percent(dec!(3))
            .rent_growth_percent(dec!(2))
            .vacancy_rate_percent(dec!(5))
            .holding_period_years(5)
            .build()
            .unwrap()
    }

    fn project(inputs: &PropertyInputs) -> Vec<YearProjection> {
        let base = run_pipeline(inputs, DEFAULT_OTHER_CLOSING_COSTS);
        project_years(inputs, &base, DEFAULT_SELLING_FEE_PERCENT)
    }

    #[test]
    fn test_one_record_per_year_ascending() {
        let years = project(&sample_inputs());
        assert_eq!(years.len(), 5);
        let numbers: Vec<u32> = years.iter().map(|y| y.year).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_year_one_includes_growth() {
        let years = project(&sample_inputs());
        assert_eq!(years[0].property_value, dec!(1_236_000));
        assert_eq!(years[0].annual_rent, dec!(104_040));
    }

    #[test]
    fn test_balance_matches_monthly_amortization() {
        let inputs = sample_inputs();
        let years = project(&inputs);
        for y in &years {
            let state = amortize(dec!(780_000), dec!(5.25), 25, y.year * 12);
            assert_eq!(y.remaining_loan_balance, state.outstanding_balance);
        }
        assert!(years[4].remaining_loan_balance < years[0].remaining_loan_balance);
    }

    #[test]
    fn test_cumulative_cash_flow_accumulates() {
        let years = project(&sample_inputs());
        let mut running = Decimal::ZERO;
        for y in &years {
            running += y.cash_flow;
            assert_eq!(y.cumulative_cash_flow, running);
        }
    }

    #[test]
    fn test_exit_math_identity() {
        let inputs = sample_inputs();
        let base = run_pipeline(&inputs, DEFAULT_OTHER_CLOSING_COSTS);
        let years = project_years(&inputs, &base, DEFAULT_SELLING_FEE_PERCENT);
        let initial = base.upfront_costs.total_initial_investment;
        for y in &years {
            let expected = y.sale_proceeds + y.cumulative_cash_flow - initial;
            assert!((y.total_return - expected).abs() < dec!(1));
            let expected_roi = y.total_return / initial * dec!(100);
            assert!((y.roi_percent - expected_roi).abs() < dec!(0.01));
            assert_eq!(y.selling_fee, y.property_value * dec!(0.02));
        }
    }

    #[test]
    fn test_loan_paid_off_within_holding_period() {
        let mut inputs = sample_inputs();
        inputs.mortgage_term_years = 2;
        inputs.holding_period_years = 4;
        let base = run_pipeline(&inputs, DEFAULT_OTHER_CLOSING_COSTS);
        let years = project_years(&inputs, &base, DEFAULT_SELLING_FEE_PERCENT);
        assert!(years[1].remaining_loan_balance < dec!(0.01));
        assert_eq!(years[2].debt_service, Decimal::ZERO);
        assert_eq!(years[3].cash_flow, years[3].noi);
        assert_eq!(years[3].equity, years[3].property_value - years[3].remaining_loan_balance);
    }

    #[test]
    fn test_zero_investment_roi_is_zero() {
        let mut inputs = sample_inputs();
        inputs.purchase_price = Decimal::ZERO;
        let base = run_pipeline(&inputs, Decimal::ZERO);
        let years = project_years(&inputs, &base, DEFAULT_SELLING_FEE_PERCENT);
        assert!(years.iter().all(|y| y.roi_percent.is_zero()));
    }

    #[test]
    fn test_runaway_growth_saturates_at_ceiling() {
        let mut inputs = sample_inputs();
        inputs.capital_growth_percent = dec!(15);
        inputs.holding_period_years = 400;
        let years = project(&inputs);
        assert_eq!(years.len(), 400);
        let last = &years[399];
        assert_eq!(last.property_value, PROJECTION_CEILING);
        assert!(last.sale_proceeds > Decimal::ZERO);
        assert!(years.windows(2).all(|w| w[1].property_value >= w[0].property_value));
    }

    #[test]
    fn test_compound_clamps_both_signs() {
        assert_eq!(compound(Decimal::MAX, dec!(2)), PROJECTION_CEILING);
        assert_eq!(compound(Decimal::MIN, dec!(2)), -PROJECTION_CEILING);
        assert_eq!(compound(dec!(100), dec!(1.1)), dec!(110));
    }
}
