use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{apply_percent, percent_of, ratio, Money, Percent};

use super::inputs::PropertyInputs;
use super::operating::PipelineOutcome;

/// Occupancy and rent levels at which annual cash flow is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenAnalysis {
    /// Unclamped; above 100 means no occupancy level covers the costs
    pub break_even_occupancy_raw_percent: Percent,
    /// `break_even_occupancy_raw_percent` clamped to [0, 100] for display
    pub break_even_occupancy_percent: Percent,
    /// False when there is no net rent to solve against; both occupancy
    /// figures are then 0
    pub occupancy_solvable: bool,
    pub occupancy_achievable: bool,
    /// Monthly rent that zeroes cash flow at the configured vacancy rate.
    /// `None` when vacancy and management fees retain none of the rent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_even_monthly_rent: Option<Money>,
    /// How far current rent sits above break-even rent, percent of current rent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_headroom_percent: Option<Percent>,
}

/// Solution of the occupancy equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupancySolution {
    pub raw_percent: Percent,
    pub clamped_percent: Percent,
    pub solvable: bool,
    pub achievable: bool,
}

/// Cost and income terms of the break-even equations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakEvenTerms {
    /// R: gross annual rent at full occupancy
    pub gross_annual_rent: Money,
    /// M: management fee as a fraction
    pub management_fraction: Decimal,
    /// F: service charge plus maintenance
    pub fixed_annual_costs: Money,
    /// L: annual mortgage payment
    pub annual_mortgage_payment: Money,
}

impl BreakEvenTerms {
    pub fn from_outcome(inputs: &PropertyInputs, base: &PipelineOutcome) -> Self {
        Self {
            gross_annual_rent: base.operating.gross_annual_rental_income,
            management_fraction: inputs.property_management_fee_percent / Decimal::ONE_HUNDRED,
            fixed_annual_costs: base.operating.annual_service_charge
                + base.operating.annual_maintenance_costs,
            annual_mortgage_payment: base.financing.annual_mortgage_payment,
        }
    }
}

/// Annual cash flow at a given occupancy: `R·O·(1 − M) − F − L`.
pub fn cash_flow_at_occupancy(terms: &BreakEvenTerms, occupancy_percent: Percent) -> Money {
    apply_percent(terms.gross_annual_rent, occupancy_percent)
        * (Decimal::ONE - terms.management_fraction)
        - terms.fixed_annual_costs
        - terms.annual_mortgage_payment
}

/// Solve `R·O·(1 − M) − F − L = 0` for O, in percent.
///
/// With no net rent (`R·(1 − M) ≤ 0`) the equation has no solution: both
/// figures are 0 and the property only breaks even if it has no costs.
pub fn break_even_occupancy(terms: &BreakEvenTerms) -> OccupancySolution {
    let costs = terms.fixed_annual_costs + terms.annual_mortgage_payment;
    let denominator = terms.gross_annual_rent * (Decimal::ONE - terms.management_fraction);

    if denominator <= Decimal::ZERO {
        return OccupancySolution {
            raw_percent: Decimal::ZERO,
            clamped_percent: Decimal::ZERO,
            solvable: false,
            achievable: costs <= Decimal::ZERO,
        };
    }

    let raw = percent_of(costs, denominator);
    OccupancySolution {
        raw_percent: raw,
        clamped_percent: raw.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
        solvable: true,
        achievable: raw <= Decimal::ONE_HUNDRED,
    }
}

/// Monthly rent at which `12·r·(1 − v) − 12·r·M − F − L = 0`, i.e. the
/// operating pipeline's cash flow is zero at the configured vacancy.
/// `None` when vacancy and management retain no rent and there are costs to
/// cover.
pub fn break_even_monthly_rent(
    terms: &BreakEvenTerms,
    vacancy_rate_percent: Percent,
) -> Option<Money> {
    let costs = terms.fixed_annual_costs + terms.annual_mortgage_payment;
    if costs <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }
    let retained = Decimal::ONE - vacancy_rate_percent / Decimal::ONE_HUNDRED
        - terms.management_fraction;
    if retained <= Decimal::ZERO {
        return None;
    }
    Some(ratio(costs, dec!(12) * retained))
}

pub fn analyze_break_even(inputs: &PropertyInputs, base: &PipelineOutcome) -> BreakEvenAnalysis {
    let terms = BreakEvenTerms::from_outcome(inputs, base);
    let occupancy = break_even_occupancy(&terms);
    let rent = break_even_monthly_rent(&terms, inputs.vacancy_rate_percent);
    let headroom = rent.map(|r| {
        percent_of(
            inputs.expected_monthly_rent - r,
            inputs.expected_monthly_rent,
        )
    });

    BreakEvenAnalysis {
        break_even_occupancy_raw_percent: occupancy.raw_percent,
        break_even_occupancy_percent: occupancy.clamped_percent,
        occupancy_solvable: occupancy.solvable,
        occupancy_achievable: occupancy.achievable,
        break_even_monthly_rent: rent,
        rent_headroom_percent: headroom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::DEFAULT_OTHER_CLOSING_COSTS;
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
            .vacancy_rate_percent(dec!(5))
            .holding_period_years(5)
            .build()
            .unwrap()
    }

    fn terms_for(inputs: &PropertyInputs) -> BreakEvenTerms {
        let base = run_pipeline(inputs, DEFAULT_OTHER_CLOSING_COSTS);
        BreakEvenTerms::from_outcome(inputs, &base)
    }

    #[test]
    fn test_occupancy_substitution() {
        let terms = terms_for(&sample_inputs());
        let solution = break_even_occupancy(&terms);
        let raw = solution.raw_percent;
        assert!(solution.solvable && solution.achievable);
        assert!(cash_flow_at_occupancy(&terms, raw).abs() < dec!(100));
        assert!(cash_flow_at_occupancy(&terms, raw - dec!(5)) < Decimal::ZERO);
        assert!(cash_flow_at_occupancy(&terms, raw + dec!(5)) > Decimal::ZERO);
    }

    #[test]
    fn test_rent_substitution_through_pipeline() {
        let inputs = sample_inputs();
        let terms = terms_for(&inputs);
        let rent = break_even_monthly_rent(&terms, inputs.vacancy_rate_percent).unwrap();

        let mut at_break_even = inputs.clone();
        at_break_even.expected_monthly_rent = rent;
        let outcome = run_pipeline(&at_break_even, DEFAULT_OTHER_CLOSING_COSTS);
        assert!(outcome.operating.annual_cash_flow.abs() < dec!(100));
    }

    #[test]
    fn test_unachievable_occupancy_keeps_raw_value() {
        let mut inputs = sample_inputs();
        inputs.expected_monthly_rent = dec!(3000);
        let terms = terms_for(&inputs);
        let solution = break_even_occupancy(&terms);
        assert!(solution.raw_percent > dec!(100));
        assert_eq!(solution.clamped_percent, dec!(100));
        assert!(solution.solvable);
        assert!(!solution.achievable);
    }

    #[test]
    fn test_zero_rent_resolves_to_zero() {
        let mut inputs = sample_inputs();
        inputs.expected_monthly_rent = Decimal::ZERO;
        let terms = terms_for(&inputs);
        let solution = break_even_occupancy(&terms);
        assert_eq!(solution.raw_percent, Decimal::ZERO);
        assert_eq!(solution.clamped_percent, Decimal::ZERO);
        assert!(!solution.solvable);
        assert!(!solution.achievable);
    }

    #[test]
    fn test_no_costs_breaks_even_at_zero() {
        let inputs = PropertyInputs::builder()
            .purchase_price(dec!(500_000))
            .expected_monthly_rent(dec!(3000))
            .mortgage_term_years(25)
            .holding_period_years(5)
            .build()
            .unwrap();
        let terms = terms_for(&inputs);
        let solution = break_even_occupancy(&terms);
        assert_eq!(solution.raw_percent, Decimal::ZERO);
        assert!(solution.achievable);
        assert_eq!(break_even_monthly_rent(&terms, Decimal::ZERO), Some(Decimal::ZERO));
        assert_eq!(break_even_monthly_rent(&terms, dec!(100)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_full_vacancy_has_no_break_even_rent() {
        let terms = terms_for(&sample_inputs());
        assert_eq!(break_even_monthly_rent(&terms, dec!(100)), None);
        assert_eq!(break_even_monthly_rent(&terms, dec!(95)), None);
    }

    #[test]
    fn test_full_vacancy_reports_no_headroom() {
        let mut inputs = sample_inputs();
        inputs.vacancy_rate_percent = dec!(100);
        let base = run_pipeline(&inputs, DEFAULT_OTHER_CLOSING_COSTS);
        let analysis = analyze_break_even(&inputs, &base);
        assert_eq!(analysis.break_even_monthly_rent, None);
        assert_eq!(analysis.rent_headroom_percent, None);
    }

    #[test]
    fn test_headroom_positive_when_rent_covers_costs() {
        let inputs = sample_inputs();
        let base = run_pipeline(&inputs, DEFAULT_OTHER_CLOSING_COSTS);
        let analysis = analyze_break_even(&inputs, &base);
        assert!(analysis.break_even_monthly_rent.unwrap() < inputs.expected_monthly_rent);
        assert!(analysis.rent_headroom_percent.unwrap() > Decimal::ZERO);
    }
}
