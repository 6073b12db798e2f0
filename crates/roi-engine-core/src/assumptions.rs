//! System assumptions that sit outside the per-property inputs.
//!
//! Every figure here has a named default so reports stay reproducible, but a
//! caller can override any of them (the CLI reads an `--assumptions` YAML/JSON
//! file) without touching calculation code.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RoiError;
use crate::types::{Money, Percent};
use crate::RoiResult;

/// Estimated conveyancing, trustee and registration costs on a Dubai purchase
/// beyond the DLD and agency fees, in AED.
pub const DEFAULT_OTHER_CLOSING_COSTS: Money = dec!(5000);

/// Broker commission and transfer costs assumed on exit, percent of sale value.
pub const DEFAULT_SELLING_FEE_PERCENT: Percent = dec!(2);

/// Number of points on each sensitivity axis.
pub const SCENARIO_POINTS: usize = 5;

/// Position of the unmodified input on every sensitivity axis.
pub const BASE_CASE_INDEX: usize = 2;

/// Offsets applied to the base input on each sensitivity axis.
///
/// Rent offsets are relative (percent of the base rent); vacancy and interest
/// offsets are absolute percentage points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityBands {
    pub rent_change_percent: [Percent; SCENARIO_POINTS],
    pub vacancy_change_points: [Percent; SCENARIO_POINTS],
    pub interest_change_points: [Percent; SCENARIO_POINTS],
}

impl Default for SensitivityBands {
    fn default() -> Self {
        Self {
            rent_change_percent: [dec!(-10), dec!(-5), dec!(0), dec!(5), dec!(10)],
            vacancy_change_points: [dec!(-10), dec!(-5), dec!(0), dec!(5), dec!(10)],
            interest_change_points: [dec!(-1), dec!(-0.5), dec!(0), dec!(0.5), dec!(1)],
        }
    }
}

impl SensitivityBands {
    pub fn validate(&self) -> RoiResult<()> {
        validate_band("sensitivity.rent_change_percent", &self.rent_change_percent)?;
        validate_band(
            "sensitivity.vacancy_change_points",
            &self.vacancy_change_points,
        )?;
        validate_band(
            "sensitivity.interest_change_points",
            &self.interest_change_points,
        )?;
        if self.rent_change_percent[0] <= dec!(-100) {
            return Err(RoiError::invalid(
                "sensitivity.rent_change_percent",
                "Rent cannot be reduced by 100% or more",
            ));
        }
        Ok(())
    }
}

fn validate_band(field: &str, band: &[Percent; SCENARIO_POINTS]) -> RoiResult<()> {
    if !band[BASE_CASE_INDEX].is_zero() {
        return Err(RoiError::invalid(
            field,
            format!("Offset at index {BASE_CASE_INDEX} must be 0 (the base case)"),
        ));
    }
    if band.windows(2).any(|w| w[0] >= w[1]) {
        return Err(RoiError::invalid(field, "Offsets must be strictly increasing"));
    }
    Ok(())
}

/// Assumptions shared by every property in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssumptionConfig {
    /// Fixed closing costs added to the upfront cash requirement
    pub other_closing_costs: Money,
    /// Selling costs deducted from the sale value at exit
    pub selling_fee_percent: Percent,
    /// Sensitivity axis offsets
    pub sensitivity: SensitivityBands,
    /// DSCR below this triggers a lender-covenant warning
    pub dscr_warning_threshold: Decimal,
    /// LTV above this (percent) triggers a leverage warning
    pub ltv_warning_percent: Percent,
    /// Vacancy above this (percent) triggers a market-norm warning
    pub vacancy_warning_percent: Percent,
}

impl Default for AssumptionConfig {
    fn default() -> Self {
        Self {
            other_closing_costs: DEFAULT_OTHER_CLOSING_COSTS,
            selling_fee_percent: DEFAULT_SELLING_FEE_PERCENT,
            sensitivity: SensitivityBands::default(),
            dscr_warning_threshold: dec!(1.2),
            ltv_warning_percent: dec!(80),
            vacancy_warning_percent: dec!(15),
        }
    }
}

impl AssumptionConfig {
    pub fn validate(&self) -> RoiResult<()> {
        if self.other_closing_costs < Decimal::ZERO {
            return Err(RoiError::invalid(
                "other_closing_costs",
                "Closing costs cannot be negative",
            ));
        }
        if self.selling_fee_percent < Decimal::ZERO || self.selling_fee_percent > dec!(100) {
            return Err(RoiError::invalid(
                "selling_fee_percent",
                "Selling fee must be between 0% and 100%",
            ));
        }
        self.sensitivity.validate()
    }
}
