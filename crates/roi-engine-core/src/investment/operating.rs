//! Today's income, expenses, NOI, cash flow and headline ratios.
//!
//! [`run_pipeline`] is the single path from inputs to cash flow. The primary
//! calculation, every sensitivity scenario and the break-even checks all go
//! through it, so they cannot drift apart.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{apply_percent, percent_of, ratio, Money, Multiple, Percent};

use super::costs::{calculate_upfront_costs, UpfrontCosts};
use super::financing::{calculate_financing, FinancingTerms};
use super::inputs::PropertyInputs;

/// Year-one operating statement, before any growth is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingStatement {
    pub gross_annual_rental_income: Money,
    pub vacancy_amount: Money,
    pub effective_annual_rental_income: Money,
    pub annual_service_charge: Money,
    pub annual_maintenance_costs: Money,
    /// Charged on gross rent, not on collected rent
    pub annual_property_management_fee: Money,
    pub total_annual_operating_expenses: Money,
    pub net_operating_income: Money,
    pub annual_cash_flow: Money,
    pub monthly_cash_flow: Money,
}

/// Yield and return ratios, all in percent except the multiples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRatios {
    pub gross_rental_yield: Percent,
    pub net_rental_yield: Percent,
    pub cash_on_cash_return: Percent,
    /// NOI / price. Identical to `net_rental_yield` on this unlevered basis;
    /// reported separately because reports label it separately.
    pub cap_rate: Percent,
    /// NOI / annual debt service, zero for a cash purchase
    pub debt_service_coverage_ratio: Multiple,
    /// Operating expenses as a percent of collected rent
    pub operating_expense_ratio: Percent,
    /// Price / gross annual rent
    pub gross_rent_multiplier: Multiple,
}

/// Everything the pipeline derives from one set of inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub financing: FinancingTerms,
    pub upfront_costs: UpfrontCosts,
    pub operating: OperatingStatement,
    pub ratios: ReturnRatios,
}

/// Financing → upfront costs → income/expenses → NOI/cash flow → ratios.
pub fn run_pipeline(inputs: &PropertyInputs, other_closing_costs: Money) -> PipelineOutcome {
    let financing = calculate_financing(inputs);
    let upfront_costs =
        calculate_upfront_costs(inputs, financing.down_payment_amount, other_closing_costs);
    let operating = operating_statement(inputs, financing.annual_mortgage_payment);
    let ratios = return_ratios(inputs, &financing, &upfront_costs, &operating);

    PipelineOutcome {
        financing,
        upfront_costs,
        operating,
        ratios,
    }
}

pub fn operating_statement(
    inputs: &PropertyInputs,
    annual_mortgage_payment: Money,
) -> OperatingStatement {
    let gross = inputs.expected_monthly_rent * dec!(12);
    let vacancy_amount = apply_percent(gross, inputs.vacancy_rate_percent);
    let effective = gross - vacancy_amount;

    let service_charge = inputs.service_charge_annual;
    let maintenance = apply_percent(inputs.purchase_price, inputs.annual_maintenance_percent);
    let management = apply_percent(gross, inputs.property_management_fee_percent);
    let total_expenses = service_charge + maintenance + management;

    let noi = effective - total_expenses;
    let annual_cash_flow = noi - annual_mortgage_payment;

    OperatingStatement {
        gross_annual_rental_income: gross,
        vacancy_amount,
        effective_annual_rental_income: effective,
        annual_service_charge: service_charge,
        annual_maintenance_costs: maintenance,
        annual_property_management_fee: management,
        total_annual_operating_expenses: total_expenses,
        net_operating_income: noi,
        annual_cash_flow,
        monthly_cash_flow: annual_cash_flow / dec!(12),
    }
}

pub fn return_ratios(
    inputs: &PropertyInputs,
    financing: &FinancingTerms,
    upfront_costs: &UpfrontCosts,
    operating: &OperatingStatement,
) -> ReturnRatios {
    let net_yield = percent_of(operating.net_operating_income, inputs.purchase_price);

    let dscr = ratio(
        operating.net_operating_income,
        financing.annual_mortgage_payment,
    );
    let grm = ratio(inputs.purchase_price, operating.gross_annual_rental_income);

    ReturnRatios {
        gross_rental_yield: percent_of(
            operating.gross_annual_rental_income,
            inputs.purchase_price,
        ),
        net_rental_yield: net_yield,
        cash_on_cash_return: percent_of(
            operating.annual_cash_flow,
            upfront_costs.total_initial_investment,
        ),
        cap_rate: net_yield,
        debt_service_coverage_ratio: dscr,
        operating_expense_ratio: percent_of(
            operating.total_annual_operating_expenses,
            operating.effective_annual_rental_income,
        ),
        gross_rent_multiplier: grm,
    }
}
