use serde::{Deserialize, Serialize};

use crate::types::{apply_percent, Money};

use super::inputs::PropertyInputs;

/// Cash required at purchase on top of the down payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpfrontCosts {
    pub dld_fee: Money,
    pub agent_fee: Money,
    pub other_closing_costs: Money,
    pub total_upfront_costs: Money,
    /// Down payment plus all upfront costs
    pub total_initial_investment: Money,
}

pub fn calculate_upfront_costs(
    inputs: &PropertyInputs,
    down_payment_amount: Money,
    other_closing_costs: Money,
) -> UpfrontCosts {
    let dld_fee = apply_percent(inputs.purchase_price, inputs.dld_fee_percent);
    let agent_fee = apply_percent(inputs.purchase_price, inputs.agent_fee_percent);
    let total_upfront_costs = dld_fee + agent_fee + other_closing_costs;

    UpfrontCosts {
        dld_fee,
        agent_fee,
        other_closing_costs,
        total_upfront_costs,
        total_initial_investment: down_payment_amount + total_upfront_costs,
    }
}
