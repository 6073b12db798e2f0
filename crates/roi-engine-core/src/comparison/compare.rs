use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::assumptions::AssumptionConfig;
use crate::error::RoiError;
use crate::investment::{calculate_roi_with, PropertyInputs};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RoiResult;

/// Properties to compare under one set of assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub properties: Vec<PropertyInputs>,
    #[serde(default)]
    pub assumptions: AssumptionConfig,
}

/// Headline figures for one property, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub purchase_price: Money,
    pub total_initial_investment: Money,
    pub gross_rental_yield: Percent,
    pub net_rental_yield: Percent,
    pub cap_rate: Percent,
    pub cash_on_cash_return: Percent,
    pub monthly_cash_flow: Money,
    pub break_even_occupancy_percent: Percent,
    /// Unclamped break-even occupancy, meaningful only when achievable
    pub break_even_occupancy_raw_percent: Percent,
    pub occupancy_achievable: bool,
    pub holding_period_years: u32,
    pub horizon_roi_percent: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity_irr_percent: Option<Percent>,
}

/// Index into `rows` of the best property on each measure. Ties go to the
/// earlier property. Only properties that can break even at or below full
/// occupancy compete on break-even occupancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonLeaders {
    pub highest_net_yield: usize,
    pub highest_cash_on_cash: usize,
    pub highest_monthly_cash_flow: usize,
    pub highest_horizon_roi: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_break_even_occupancy: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub rows: Vec<ComparisonRow>,
    pub leaders: ComparisonLeaders,
}

/// Run the engine once per property and tabulate the results side by side.
pub fn compare_properties(
    input: &ComparisonInput,
) -> RoiResult<ComputationOutput<ComparisonReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.properties.is_empty() {
        return Err(RoiError::InsufficientData(
            "At least one property is required for a comparison".into(),
        ));
    }
    input.assumptions.validate()?;

    let mut rows = Vec::with_capacity(input.properties.len());
    for (i, property) in input.properties.iter().enumerate() {
        property.validate().map_err(|e| match e {
            RoiError::InvalidInput { field, reason } => RoiError::InvalidInput {
                field: format!("properties[{i}].{field}"),
                reason,
            },
            other => other,
        })?;

        let results = calculate_roi_with(property, &input.assumptions);
        let name = property.display_name();
        if results.operating.annual_cash_flow < Decimal::ZERO {
            warnings.push(format!("{name}: negative annual cash flow"));
        }

        rows.push(ComparisonRow {
            name,
            purchase_price: property.purchase_price,
            total_initial_investment: results.upfront_costs.total_initial_investment,
            gross_rental_yield: results.ratios.gross_rental_yield,
            net_rental_yield: results.ratios.net_rental_yield,
            cap_rate: results.ratios.cap_rate,
            cash_on_cash_return: results.ratios.cash_on_cash_return,
            monthly_cash_flow: results.operating.monthly_cash_flow,
            break_even_occupancy_percent: results.break_even.break_even_occupancy_percent,
            break_even_occupancy_raw_percent: results.break_even.break_even_occupancy_raw_percent,
            occupancy_achievable: results.break_even.occupancy_achievable,
            holding_period_years: property.holding_period_years,
            horizon_roi_percent: results.exit_summary.roi_percent,
            equity_irr_percent: results.exit_summary.equity_irr_percent,
        });
    }

    if rows
        .windows(2)
        .any(|w| w[0].holding_period_years != w[1].holding_period_years)
    {
        warnings.push(
            "Holding periods differ — horizon ROI figures are not directly comparable".into(),
        );
    }

    let leaders = ComparisonLeaders {
        highest_net_yield: best_by(&rows, |r| r.net_rental_yield),
        highest_cash_on_cash: best_by(&rows, |r| r.cash_on_cash_return),
        highest_monthly_cash_flow: best_by(&rows, |r| r.monthly_cash_flow),
        highest_horizon_roi: best_by(&rows, |r| r.horizon_roi_percent),
        lowest_break_even_occupancy: lowest_achievable_break_even(&rows),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    debug!(properties = rows.len(), elapsed_us = elapsed, "comparison built");

    Ok(with_metadata(
        "Side-by-side property comparison",
        &input.assumptions,
        warnings,
        elapsed,
        ComparisonReport { rows, leaders },
    ))
}

/// Index of the first row with the largest key.
fn best_by(rows: &[ComparisonRow], key: impl Fn(&ComparisonRow) -> Decimal) -> usize {
    let mut best = 0;
    for (i, row) in rows.iter().enumerate().skip(1) {
        if key(row) > key(&rows[best]) {
            best = i;
        }
    }
    best
}

/// Index of the first achievable row with the lowest raw break-even
/// occupancy, if any row can break even.
fn lowest_achievable_break_even(rows: &[ComparisonRow]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, row) in rows.iter().enumerate() {
        if !row.occupancy_achievable {
            continue;
        }
        let beats_best = best.map_or(true, |b| {
            row.break_even_occupancy_raw_percent < rows[b].break_even_occupancy_raw_percent
        });
        if beats_best {
            best = Some(i);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn property(name: &str, price: Decimal, rent: Decimal) -> PropertyInputs {
        PropertyInputs::builder()
            .property_name(name)
            .purchase_price(price)
            .down_payment_percent(dec!(25))
            .mortgage_interest_rate(dec!(4.5))
            .mortgage_term_years(25)
            .expected_monthly_rent(rent)
            .service_charge_annual(dec!(10_000))
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

    #[test]
    fn test_rows_follow_input_order() {
        let input = ComparisonInput {
            properties: vec![
                property("JVC Studio", dec!(550_000), dec!(4200)),
                property("Downtown 1BR", dec!(1_400_000), dec!(8000)),
            ],
            assumptions: AssumptionConfig::default(),
        };
        let report = compare_properties(&input).unwrap().result;
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].name, "JVC Studio");
        assert_eq!(report.rows[1].name, "Downtown 1BR");
    }

    #[test]
    fn test_leaders_pick_higher_yield() {
        let input = ComparisonInput {
            properties: vec![
                property("Low yield", dec!(1_400_000), dec!(7000)),
                property("High yield", dec!(600_000), dec!(5000)),
            ],
            assumptions: AssumptionConfig::default(),
        };
        let report = compare_properties(&input).unwrap().result;
        assert_eq!(report.leaders.highest_net_yield, 1);
        assert_eq!(report.leaders.highest_cash_on_cash, 1);
        assert_eq!(report.leaders.lowest_break_even_occupancy, Some(1));
    }

    #[test]
    fn test_property_without_rent_never_leads_break_even() {
        let input = ComparisonInput {
            properties: vec![
                property("Good", dec!(700_000), dec!(5000)),
                property("No rent", dec!(700_000), Decimal::ZERO),
            ],
            assumptions: AssumptionConfig::default(),
        };
        let report = compare_properties(&input).unwrap().result;
        assert!(report.rows[0].occupancy_achievable);
        assert!(!report.rows[1].occupancy_achievable);
        assert_eq!(report.leaders.lowest_break_even_occupancy, Some(0));
    }

    #[test]
    fn test_no_leader_when_nothing_breaks_even() {
        let input = ComparisonInput {
            properties: vec![
                property("Vacant lot", dec!(700_000), Decimal::ZERO),
                property("Underpriced rent", dec!(2_000_000), dec!(1000)),
            ],
            assumptions: AssumptionConfig::default(),
        };
        let report = compare_properties(&input).unwrap().result;
        assert_eq!(report.leaders.lowest_break_even_occupancy, None);
    }

    #[test]
    fn test_empty_comparison_rejected() {
        let input = ComparisonInput {
            properties: vec![],
            assumptions: AssumptionConfig::default(),
        };
        assert!(matches!(
            compare_properties(&input),
            Err(RoiError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_invalid_property_error_names_index() {
        let mut bad = property("Bad", dec!(500_000), dec!(3000));
        bad.vacancy_rate_percent = dec!(150);
        let input = ComparisonInput {
            properties: vec![property("Good", dec!(500_000), dec!(3000)), bad],
            assumptions: AssumptionConfig::default(),
        };
        let err = compare_properties(&input).unwrap_err();
        assert!(err.to_string().contains("properties[1].vacancy_rate_percent"));
    }

    #[test]
    fn test_mixed_holding_periods_warn() {
        let mut short = property("Short hold", dec!(700_000), dec!(5000));
        short.holding_period_years = 3;
        let input = ComparisonInput {
            properties: vec![property("Five years", dec!(700_000), dec!(5000)), short],
            assumptions: AssumptionConfig::default(),
        };
        let output = compare_properties(&input).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("Holding periods differ")));
    }
}
