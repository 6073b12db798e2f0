use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{apply_percent, percent_of, Money, Percent};

use super::inputs::PropertyInputs;

/// Loan sizing and repayment terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub loan_amount: Money,
    pub down_payment_amount: Money,
    pub monthly_mortgage_payment: Money,
    pub annual_mortgage_payment: Money,
    pub loan_to_value_percent: Percent,
    pub term_months: u32,
}

/// Position of a loan after a number of monthly payments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationState {
    pub months_elapsed: u32,
    pub outstanding_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// Interest, principal and payments over one year of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct YearAmortization {
    pub interest_paid: Money,
    pub principal_repaid: Money,
    pub debt_service: Money,
    pub closing_balance: Money,
}

pub fn calculate_financing(inputs: &PropertyInputs) -> FinancingTerms {
    let down_payment_amount = apply_percent(inputs.purchase_price, inputs.down_payment_percent);
    let loan_amount = inputs.purchase_price - down_payment_amount;
    let monthly = monthly_payment(
        loan_amount,
        inputs.mortgage_interest_rate,
        inputs.mortgage_term_years,
    );

    FinancingTerms {
        loan_amount,
        down_payment_amount,
        monthly_mortgage_payment: monthly,
        annual_mortgage_payment: monthly * dec!(12),
        loan_to_value_percent: percent_of(loan_amount, inputs.purchase_price),
        term_months: inputs.mortgage_term_years.saturating_mul(12),
    }
}

/// Monthly rate as a decimal fraction from an annual percentage.
fn monthly_rate(annual_rate_percent: Percent) -> Decimal {
    annual_rate_percent / dec!(100) / dec!(12)
}

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1)
///
/// Zero rate falls back to straight-line repayment; a zero loan or a zero
/// term pays nothing. When `(1+r)^n` outgrows the Decimal range the payment
/// is the interest-only limit `P * r`.
pub fn monthly_payment(principal: Money, annual_rate_percent: Percent, term_years: u32) -> Money {
    let total_months = term_years.saturating_mul(12);
    if principal <= Decimal::ZERO || total_months == 0 {
        return Decimal::ZERO;
    }

    let r = monthly_rate(annual_rate_percent);
    if r <= Decimal::ZERO {
        return principal / Decimal::from(total_months);
    }

    // (1 + r)^n via iterative multiplication
    let growth = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..total_months {
        match compound.checked_mul(growth) {
            Some(next) => compound = next,
            // (1+r)^n / ((1+r)^n - 1) is 1 at this size: interest only
            None => return principal * r,
        }
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return principal / Decimal::from(total_months);
    }

    principal * r * (compound / denominator)
}

/// Month-by-month amortization of a fixed-payment loan.
#[derive(Debug, Clone)]
pub(crate) struct Amortizer {
    balance: Money,
    payment: Money,
    rate: Decimal,
    months_remaining: u32,
    state: AmortizationState,
}

impl Amortizer {
    pub fn new(loan_amount: Money, annual_rate_percent: Percent, term_years: u32) -> Self {
        let balance = loan_amount.max(Decimal::ZERO);
        Self {
            balance,
            payment: monthly_payment(balance, annual_rate_percent, term_years),
            rate: monthly_rate(annual_rate_percent).max(Decimal::ZERO),
            months_remaining: term_years.saturating_mul(12),
            state: AmortizationState {
                months_elapsed: 0,
                outstanding_balance: balance,
                cumulative_interest: Decimal::ZERO,
                cumulative_principal: Decimal::ZERO,
            },
        }
    }

    pub fn from_inputs(inputs: &PropertyInputs, financing: &FinancingTerms) -> Self {
        Self::new(
            financing.loan_amount,
            inputs.mortgage_interest_rate,
            inputs.mortgage_term_years,
        )
    }

    /// Apply one monthly payment. Returns (interest, principal, payment made).
    pub fn step_month(&mut self) -> (Money, Money, Money) {
        self.state.months_elapsed += 1;
        if self.months_remaining == 0 {
            return (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        }
        self.months_remaining -= 1;

        let interest = self.balance * self.rate;
        let principal = (self.payment - interest).min(self.balance).max(Decimal::ZERO);
        self.balance = (self.balance - principal).max(Decimal::ZERO);

        self.state.outstanding_balance = self.balance;
        self.state.cumulative_interest += interest;
        self.state.cumulative_principal += principal;

        (interest, principal, self.payment)
    }

    pub fn advance_year(&mut self) -> YearAmortization {
        let mut year = YearAmortization::default();
        for _ in 0..12 {
            let (interest, principal, paid) = self.step_month();
            year.interest_paid += interest;
            year.principal_repaid += principal;
            year.debt_service += paid;
        }
        year.closing_balance = self.balance;
        year
    }

    pub fn state(&self) -> AmortizationState {
        self.state
    }
}

/// Loan position after `months` payments, evaluated month by month.
pub fn amortize(
    loan_amount: Money,
    annual_rate_percent: Percent,
    term_years: u32,
    months: u32,
) -> AmortizationState {
    let mut amortizer = Amortizer::new(loan_amount, annual_rate_percent, term_years);
    for _ in 0..months {
        amortizer.step_month();
    }
    amortizer.state()
}
