use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::RoiError;
use crate::types::Money;
use crate::RoiResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;

/// NPV and its derivative with respect to the rate, in one pass.
/// `None` if an intermediate value leaves the Decimal range.
fn npv_and_derivative(cash_flows: &[Money], rate: Decimal) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut npv_val = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount.checked_mul(one_plus_r)?;
        }
        if discount.is_zero() {
            return None;
        }
        npv_val = npv_val.checked_add(cf.checked_div(discount)?)?;
        if t > 0 {
            let t_dec = Decimal::from(t as i64);
            let term = t_dec
                .checked_mul(*cf)?
                .checked_div(discount.checked_mul(one_plus_r)?)?;
            dnpv = dnpv.checked_sub(term)?;
        }
    }

    Some((npv_val, dnpv))
}

/// Internal Rate of Return (decimal, 0.12 = 12%) using Newton-Raphson.
pub fn irr(cash_flows: &[Money], guess: Decimal) -> RoiResult<Decimal> {
    if cash_flows.len() < 2 {
        return Err(RoiError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let has_outflow = cash_flows.iter().any(|cf| cf.is_sign_negative() && !cf.is_zero());
    let has_inflow = cash_flows.iter().any(|cf| cf.is_sign_positive() && !cf.is_zero());
    if !has_outflow || !has_inflow {
        return Err(RoiError::InsufficientData(
            "IRR requires at least one negative and one positive cash flow".into(),
        ));
    }

    let mut rate = guess;

    for i in 0..MAX_IRR_ITERATIONS {
        let Some((npv_val, dnpv)) = npv_and_derivative(cash_flows, rate) else {
            return Err(RoiError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: Decimal::MAX,
            });
        };

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        if dnpv.is_zero() {
            return Err(RoiError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: npv_val,
            });
        }

        let Some(step) = npv_val.checked_div(dnpv) else {
            return Err(RoiError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: npv_val,
            });
        };
        rate -= step;

        // Guard against divergence
        if rate < dec!(-0.9) {
            rate = dec!(-0.9);
        } else if rate > dec!(10.0) {
            rate = dec!(10.0);
        }
    }

    Err(RoiError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta: npv_and_derivative(cash_flows, rate)
            .map(|(value, _)| value)
            .unwrap_or(Decimal::MAX),
    })
}
