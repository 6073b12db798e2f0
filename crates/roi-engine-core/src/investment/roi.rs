use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::assumptions::AssumptionConfig;
use crate::format::format_multiple;
use crate::time_value;
use crate::types::{ratio, with_metadata, ComputationOutput, Money, Multiple, Percent};
use crate::RoiResult;

use super::break_even::{analyze_break_even, BreakEvenAnalysis};
use super::costs::UpfrontCosts;
use super::financing::FinancingTerms;
use super::inputs::PropertyInputs;
use super::operating::{run_pipeline, OperatingStatement, ReturnRatios};
use super::projection::{project_years, YearProjection};
use super::sensitivity::{analyze_sensitivity, SensitivityAnalysis};

const METHODOLOGY: &str = "Buy-to-let ROI analysis (levered cash flow, end-of-year growth, monthly amortization)";

/// Minimum holding period that unlocks the five-year report sections.
pub const FIVE_YEAR_VIEW_YEARS: u32 = 5;

/// Per-square-foot figures, present only when an area is supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerAreaMetrics {
    pub price_per_sqft: Money,
    pub annual_rent_per_sqft: Money,
    pub service_charge_per_sqft: Money,
}

/// Sale economics at the end of the holding period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitSummary {
    pub holding_period_years: u32,
    pub exit_property_value: Money,
    pub sale_proceeds: Money,
    pub cumulative_cash_flow: Money,
    pub total_return: Money,
    pub roi_percent: Percent,
    /// (sale proceeds + cumulative cash flow) / initial investment
    pub equity_multiple: Multiple,
    /// Annual IRR on the equity invested; `None` when it cannot be solved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity_irr_percent: Option<Percent>,
}

/// Everything derived from one [`PropertyInputs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
    pub financing: FinancingTerms,
    pub upfront_costs: UpfrontCosts,
    pub operating: OperatingStatement,
    pub ratios: ReturnRatios,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_area: Option<PerAreaMetrics>,
    pub projections: Vec<YearProjection>,
    pub exit_summary: ExitSummary,
    pub sensitivity: SensitivityAnalysis,
    pub break_even: BreakEvenAnalysis,
    pub has_five_year_view: bool,
}

/// Run the engine with the default system assumptions.
///
/// Never fails for inputs within [`PropertyInputs::validate`]'s ranges:
/// degenerate values (zero price, zero rent, cash purchase, zero rate)
/// resolve to zero or clamped figures, and compounding that would leave the
/// Decimal range saturates. Calling it twice with the same inputs gives equal results.
pub fn calculate_roi(inputs: &PropertyInputs) -> CalculationResults {
    calculate_roi_with(inputs, &AssumptionConfig::default())
}

/// Run the engine with explicit system assumptions.
pub fn calculate_roi_with(inputs: &PropertyInputs, config: &AssumptionConfig) -> CalculationResults {
    let base = run_pipeline(inputs, config.other_closing_costs);
    let projections = project_years(inputs, &base, config.selling_fee_percent);
    let exit_summary = summarise_exit(inputs, &base.upfront_costs, &projections);
    let sensitivity = analyze_sensitivity(inputs, config);
    let break_even = analyze_break_even(inputs, &base);
    let per_area = per_area_metrics(inputs, &base.operating);

    CalculationResults {
        financing: base.financing,
        upfront_costs: base.upfront_costs,
        operating: base.operating,
        ratios: base.ratios,
        per_area,
        projections,
        exit_summary,
        sensitivity,
        break_even,
        has_five_year_view: inputs.holding_period_years >= FIVE_YEAR_VIEW_YEARS,
    }
}

/// Validate inputs and assumptions, run the engine and attach warnings for
/// figures that deserve a second look.
pub fn analyze_property(
    inputs: &PropertyInputs,
    config: &AssumptionConfig,
) -> RoiResult<ComputationOutput<CalculationResults>> {
    let start = Instant::now();
    inputs.validate()?;
    config.validate()?;

    let results = calculate_roi_with(inputs, config);
    let warnings = collect_warnings(inputs, config, &results);
    for w in &warnings {
        warn!(property = %inputs.display_name(), "{w}");
    }

    let elapsed = start.elapsed().as_micros() as u64;
    debug!(
        property = %inputs.display_name(),
        net_yield = %results.ratios.net_rental_yield.round_dp(2),
        annual_cash_flow = %results.operating.annual_cash_flow.round_dp(0),
        elapsed_us = elapsed,
        "property analysed"
    );

    Ok(with_metadata(
        METHODOLOGY,
        &serde_json::json!({
            "inputs": inputs,
            "assumptions": config,
        }),
        warnings,
        elapsed,
        results,
    ))
}

fn per_area_metrics(inputs: &PropertyInputs, operating: &OperatingStatement) -> Option<PerAreaMetrics> {
    let area = inputs.area_sqft.filter(|a| *a > Decimal::ZERO)?;
    Some(PerAreaMetrics {
        price_per_sqft: ratio(inputs.purchase_price, area),
        annual_rent_per_sqft: ratio(operating.gross_annual_rental_income, area),
        service_charge_per_sqft: ratio(operating.annual_service_charge, area),
    })
}

fn summarise_exit(
    inputs: &PropertyInputs,
    upfront_costs: &UpfrontCosts,
    projections: &[YearProjection],
) -> ExitSummary {
    let initial = upfront_costs.total_initial_investment;
    let Some(last) = projections.last() else {
        return ExitSummary {
            holding_period_years: 0,
            exit_property_value: inputs.purchase_price,
            sale_proceeds: Decimal::ZERO,
            cumulative_cash_flow: Decimal::ZERO,
            total_return: Decimal::ZERO,
            roi_percent: Decimal::ZERO,
            equity_multiple: Decimal::ZERO,
            equity_irr_percent: None,
        };
    };

    let equity_multiple = ratio(last.sale_proceeds + last.cumulative_cash_flow, initial);

    ExitSummary {
        holding_period_years: last.year,
        exit_property_value: last.property_value,
        sale_proceeds: last.sale_proceeds,
        cumulative_cash_flow: last.cumulative_cash_flow,
        total_return: last.total_return,
        roi_percent: last.roi_percent,
        equity_multiple,
        equity_irr_percent: equity_irr(initial, projections),
    }
}

/// IRR of [-initial, CF1, ..., CFn + sale proceeds], in percent.
fn equity_irr(initial: Money, projections: &[YearProjection]) -> Option<Percent> {
    if initial <= Decimal::ZERO {
        return None;
    }
    let mut flows = Vec::with_capacity(projections.len() + 1);
    flows.push(-initial);
    for (i, year) in projections.iter().enumerate() {
        let mut flow = year.cash_flow;
        if i + 1 == projections.len() {
            flow += year.sale_proceeds;
        }
        flows.push(flow);
    }
    time_value::irr(&flows, dec!(0.08))
        .ok()
        .map(|rate| rate * Decimal::ONE_HUNDRED)
}

fn collect_warnings(
    inputs: &PropertyInputs,
    config: &AssumptionConfig,
    results: &CalculationResults,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if results.operating.annual_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative annual cash flow of {} — the property needs a monthly top-up",
            results.operating.annual_cash_flow.round_dp(0)
        ));
    }

    if !results.break_even.occupancy_solvable {
        warnings.push("No rental income to cover running costs and debt service".into());
    } else if !results.break_even.occupancy_achievable {
        warnings.push(format!(
            "Break-even occupancy of {:.1}% cannot be reached at current rent",
            results.break_even.break_even_occupancy_raw_percent
        ));
    }
    if results.break_even.break_even_monthly_rent.is_none() {
        warnings.push(
            "Vacancy and management fees absorb all rent — no rent level breaks even".into(),
        );
    }

    let dscr = results.ratios.debt_service_coverage_ratio;
    if dscr > Decimal::ZERO && dscr < config.dscr_warning_threshold {
        warnings.push(format!(
            "DSCR of {} is below {} — lender covenant risk",
            format_multiple(dscr),
            format_multiple(config.dscr_warning_threshold)
        ));
    }

    if results.financing.loan_to_value_percent > config.ltv_warning_percent {
        warnings.push(format!(
            "LTV of {:.1}% exceeds {}% — above UAE mortgage caps for most buyers",
            results.financing.loan_to_value_percent, config.ltv_warning_percent
        ));
    }

    if inputs.vacancy_rate_percent > config.vacancy_warning_percent {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds {}% — above typical market norms",
            inputs.vacancy_rate_percent, config.vacancy_warning_percent
        ));
    }

    if results.upfront_costs.total_initial_investment > Decimal::ZERO
        && results.exit_summary.equity_irr_percent.is_none()
    {
        warnings.push("Equity IRR could not be solved for this cash-flow profile".into());
    }

    warnings
}
