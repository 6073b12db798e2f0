use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::{AssumptionConfig, BASE_CASE_INDEX, SCENARIO_POINTS};
use crate::types::{Money, Percent};

use super::inputs::PropertyInputs;
use super::operating::run_pipeline;

pub const BASE_CASE_LABEL: &str = "Base Case";

/// Which single input a scenario axis varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensitivityAxis {
    MonthlyRent,
    VacancyRate,
    InterestRate,
}

/// One point on a sensitivity axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub label: String,
    /// The substituted input value (AED for rent, percent for vacancy/rate)
    pub input_value: Decimal,
    pub annual_cash_flow: Money,
    pub monthly_cash_flow: Money,
    pub cash_on_cash_return: Percent,
}

/// Three axes of five scenarios each, base case at `BASE_CASE_INDEX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAnalysis {
    pub rent_scenarios: Vec<ScenarioResult>,
    pub vacancy_scenarios: Vec<ScenarioResult>,
    pub interest_rate_scenarios: Vec<ScenarioResult>,
    pub base_case_index: usize,
}

pub fn analyze_sensitivity(
    inputs: &PropertyInputs,
    config: &AssumptionConfig,
) -> SensitivityAnalysis {
    SensitivityAnalysis {
        rent_scenarios: run_axis(inputs, config, SensitivityAxis::MonthlyRent),
        vacancy_scenarios: run_axis(inputs, config, SensitivityAxis::VacancyRate),
        interest_rate_scenarios: run_axis(inputs, config, SensitivityAxis::InterestRate),
        base_case_index: BASE_CASE_INDEX,
    }
}

/// Evaluate every point of one axis by re-running the full pipeline with the
/// single varied input substituted.
pub fn run_axis(
    inputs: &PropertyInputs,
    config: &AssumptionConfig,
    axis: SensitivityAxis,
) -> Vec<ScenarioResult> {
    let offsets = match axis {
        SensitivityAxis::MonthlyRent => &config.sensitivity.rent_change_percent,
        SensitivityAxis::VacancyRate => &config.sensitivity.vacancy_change_points,
        SensitivityAxis::InterestRate => &config.sensitivity.interest_change_points,
    };

    let mut scenarios = Vec::with_capacity(SCENARIO_POINTS);
    for (index, &offset) in offsets.iter().enumerate() {
        let mut varied = inputs.clone();
        let value = match axis {
            SensitivityAxis::MonthlyRent => {
                varied.expected_monthly_rent = inputs.expected_monthly_rent
                    * (Decimal::ONE + offset / Decimal::ONE_HUNDRED);
                varied.expected_monthly_rent
            }
            SensitivityAxis::VacancyRate => {
                varied.vacancy_rate_percent = (inputs.vacancy_rate_percent + offset)
                    .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
                varied.vacancy_rate_percent
            }
            SensitivityAxis::InterestRate => {
                varied.mortgage_interest_rate =
                    (inputs.mortgage_interest_rate + offset).max(Decimal::ZERO);
                varied.mortgage_interest_rate
            }
        };

        let outcome = run_pipeline(&varied, config.other_closing_costs);
        scenarios.push(ScenarioResult {
            label: scenario_label(axis, index, offset, value),
            input_value: value,
            annual_cash_flow: outcome.operating.annual_cash_flow,
            monthly_cash_flow: outcome.operating.monthly_cash_flow,
            cash_on_cash_return: outcome.ratios.cash_on_cash_return,
        });
    }
    scenarios
}

fn scenario_label(axis: SensitivityAxis, index: usize, offset: Decimal, value: Decimal) -> String {
    if index == BASE_CASE_INDEX {
        return BASE_CASE_LABEL.to_string();
    }
    match axis {
        SensitivityAxis::MonthlyRent => {
            let sign = if offset > Decimal::ZERO { "+" } else { "" };
            format!("{sign}{}%", offset.normalize())
        }
        SensitivityAxis::VacancyRate => format!("{:.1}% vacancy", value),
        SensitivityAxis::InterestRate => format!("{:.2}% rate", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
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
            .vacancy_rate_percent(dec!(5))
            .holding_period_years(5)
            .build()
            .unwrap()
    }

    #[test]
    fn test_rent_labels() {
        let config = AssumptionConfig::default();
        let rent = run_axis(&sample_inputs(), &config, SensitivityAxis::MonthlyRent);
        let labels: Vec<&str> = rent.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["-10%", "-5%", "Base Case", "+5%", "+10%"]);
        assert_eq!(rent[0].input_value, dec!(7650));
        assert_eq!(rent[4].input_value, dec!(9350));
    }

    #[test]
    fn test_base_case_matches_primary_pipeline() {
        let inputs = sample_inputs();
        let config = AssumptionConfig::default();
        let base = run_pipeline(&inputs, config.other_closing_costs);
        let analysis = analyze_sensitivity(&inputs, &config);
        for axis in [
            &analysis.rent_scenarios,
            &analysis.vacancy_scenarios,
            &analysis.interest_rate_scenarios,
        ] {
            assert_eq!(axis.len(), SCENARIO_POINTS);
            let point = &axis[BASE_CASE_INDEX];
            assert_eq!(point.label, BASE_CASE_LABEL);
            assert_eq!(point.annual_cash_flow, base.operating.annual_cash_flow);
            assert_eq!(point.cash_on_cash_return, base.ratios.cash_on_cash_return);
        }
    }

    #[test]
    fn test_rent_axis_monotonic_increasing() {
        let config = AssumptionConfig::default();
        let rent = run_axis(&sample_inputs(), &config, SensitivityAxis::MonthlyRent);
        assert!(rent.windows(2).all(|w| w[0].annual_cash_flow < w[1].annual_cash_flow));
    }

    #[test]
    fn test_vacancy_axis_clamped_and_monotonic() {
        let config = AssumptionConfig::default();
        let vacancy = run_axis(&sample_inputs(), &config, SensitivityAxis::VacancyRate);
        let values: Vec<Decimal> = vacancy.iter().map(|s| s.input_value).collect();
        assert_eq!(values, vec![dec!(0), dec!(0), dec!(5), dec!(10), dec!(15)]);
        assert!(vacancy
            .windows(2)
            .all(|w| w[0].annual_cash_flow >= w[1].annual_cash_flow));
        assert_eq!(vacancy[0].label, "0.0% vacancy");
    }

    #[test]
    fn test_interest_axis_reprices_mortgage() {
        let config = AssumptionConfig::default();
        let rates = run_axis(&sample_inputs(), &config, SensitivityAxis::InterestRate);
        assert_eq!(rates[0].input_value, dec!(4.25));
        assert_eq!(rates[4].input_value, dec!(6.25));
        assert_eq!(rates[1].label, "4.75% rate");
        assert!(rates.windows(2).all(|w| w[0].annual_cash_flow > w[1].annual_cash_flow));
    }

    #[test]
    fn test_interest_axis_floors_at_zero() {
        let mut inputs = sample_inputs();
        inputs.mortgage_interest_rate = dec!(0.25);
        let config = AssumptionConfig::default();
        let rates = run_axis(&inputs, &config, SensitivityAxis::InterestRate);
        assert_eq!(rates[0].input_value, Decimal::ZERO);
        assert_eq!(rates[1].input_value, Decimal::ZERO);
    }
}
