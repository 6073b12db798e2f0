use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values, in AED. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed in percentage points (5.25 = 5.25%), matching how
/// investors quote yields and rates. Convert with `/ 100` before multiplying.
pub type Percent = Decimal;

/// Multiples (e.g. 11.8x gross rent multiplier)
pub type Multiple = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// `numerator / denominator`, or zero when the denominator is zero. A quotient
/// beyond the Decimal range saturates at `Decimal::MAX` / `Decimal::MIN`.
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .unwrap_or_else(|| saturated(numerator.is_sign_negative() != denominator.is_sign_negative()))
}

/// `part / whole × 100`, or zero when `whole` is zero. Saturates like [`ratio`].
pub fn percent_of(part: Money, whole: Money) -> Percent {
    let quotient = ratio(part, whole);
    quotient
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or_else(|| saturated(quotient.is_sign_negative()))
}

fn saturated(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// `amount × pct / 100`
pub fn apply_percent(amount: Money, pct: Percent) -> Money {
    amount * pct / Decimal::ONE_HUNDRED
}
