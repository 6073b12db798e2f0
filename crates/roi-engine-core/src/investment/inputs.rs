use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RoiError;
use crate::types::{Money, Percent};
use crate::RoiResult;

/// Largest accepted price, monthly rent or annual service charge (AED 10^12).
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000);
/// Highest accepted annual mortgage rate, percent.
pub const MAX_MORTGAGE_RATE_PERCENT: Percent = dec!(100);
pub const MAX_MORTGAGE_TERM_YEARS: u32 = 50;
pub const MAX_HOLDING_PERIOD_YEARS: u32 = 100;
/// Highest accepted annual capital or rent growth, percent.
pub const MAX_GROWTH_PERCENT: Percent = dec!(100);

/// Purchase, financing and rental assumptions for a single property.
///
/// Percentages are in percentage points (`dec!(5.25)` means 5.25%). Records
/// built through [`PropertyInputs::builder`] are range-checked; records
/// deserialised from JSON should be checked with [`PropertyInputs::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInputs {
    /// Display name, not used in calculations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    /// Apartment, villa, townhouse, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Community / area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Listing URL the figures were taken from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_url: Option<String>,
    /// Built-up area in square feet, only used for per-area metrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sqft: Option<Decimal>,
    pub purchase_price: Money,
    pub down_payment_percent: Percent,
    /// Annual mortgage rate
    pub mortgage_interest_rate: Percent,
    pub mortgage_term_years: u32,
    pub expected_monthly_rent: Money,
    pub service_charge_annual: Money,
    /// Percent of property value spent on maintenance each year
    pub annual_maintenance_percent: Percent,
    /// Percent of gross (not vacancy-adjusted) rent
    pub property_management_fee_percent: Percent,
    /// Dubai Land Department transfer fee, percent of price
    pub dld_fee_percent: Percent,
    /// Buyer's agency fee, percent of price
    pub agent_fee_percent: Percent,
    pub capital_growth_percent: Percent,
    pub rent_growth_percent: Percent,
    pub vacancy_rate_percent: Percent,
    pub holding_period_years: u32,
}

impl PropertyInputs {
    pub fn builder() -> PropertyInputsBuilder {
        PropertyInputsBuilder::default()
    }

    /// Check every field against its allowed range.
    ///
    /// Amounts are capped at [`MAX_AMOUNT`], fee percentages at 100, the rate
    /// at [`MAX_MORTGAGE_RATE_PERCENT`], growth at [`MAX_GROWTH_PERCENT`], the
    /// term at [`MAX_MORTGAGE_TERM_YEARS`] and the holding period at
    /// [`MAX_HOLDING_PERIOD_YEARS`].
    pub fn validate(&self) -> RoiResult<()> {
        if self.purchase_price <= Decimal::ZERO {
            return Err(RoiError::invalid(
                "purchase_price",
                "Purchase price must be positive",
            ));
        }
        check_range("purchase_price", self.purchase_price, MAX_AMOUNT)?;
        check_range("down_payment_percent", self.down_payment_percent, dec!(100))?;
        check_range(
            "mortgage_interest_rate",
            self.mortgage_interest_rate,
            MAX_MORTGAGE_RATE_PERCENT,
        )?;
        check_years(
            "mortgage_term_years",
            self.mortgage_term_years,
            MAX_MORTGAGE_TERM_YEARS,
        )?;
        check_range("expected_monthly_rent", self.expected_monthly_rent, MAX_AMOUNT)?;
        check_range("service_charge_annual", self.service_charge_annual, MAX_AMOUNT)?;
        check_range(
            "annual_maintenance_percent",
            self.annual_maintenance_percent,
            dec!(100),
        )?;
        check_range(
            "property_management_fee_percent",
            self.property_management_fee_percent,
            dec!(100),
        )?;
        check_range("dld_fee_percent", self.dld_fee_percent, dec!(100))?;
        check_range("agent_fee_percent", self.agent_fee_percent, dec!(100))?;
        check_growth("capital_growth_percent", self.capital_growth_percent)?;
        check_growth("rent_growth_percent", self.rent_growth_percent)?;
        check_range("vacancy_rate_percent", self.vacancy_rate_percent, dec!(100))?;
        check_years(
            "holding_period_years",
            self.holding_period_years,
            MAX_HOLDING_PERIOD_YEARS,
        )?;
        if let Some(area) = self.area_sqft {
            check_non_negative("area_sqft", area)?;
        }
        Ok(())
    }

    /// Label used in comparison tables and log lines.
    pub fn display_name(&self) -> String {
        match (&self.property_name, &self.location) {
            (Some(name), _) => name.clone(),
            (None, Some(location)) => location.clone(),
            (None, None) => format!("Property @ {}", self.purchase_price.round_dp(0)),
        }
    }
}

fn check_non_negative(field: &str, value: Decimal) -> RoiResult<()> {
    if value < Decimal::ZERO {
        return Err(RoiError::invalid(field, "Value cannot be negative"));
    }
    Ok(())
}

fn check_years(field: &str, value: u32, max: u32) -> RoiResult<()> {
    if value == 0 || value > max {
        return Err(RoiError::invalid(
            field,
            format!("Value must be between 1 and {max} years"),
        ));
    }
    Ok(())
}

fn check_growth(field: &str, value: Percent) -> RoiResult<()> {
    if value <= dec!(-100) || value > MAX_GROWTH_PERCENT {
        return Err(RoiError::invalid(
            field,
            format!("Growth must be greater than -100% and at most {MAX_GROWTH_PERCENT}%"),
        ));
    }
    Ok(())
}

fn check_range(field: &str, value: Decimal, max: Decimal) -> RoiResult<()> {
    if value < Decimal::ZERO || value > max {
        return Err(RoiError::invalid(
            field,
            format!("Value must be between 0 and {max}"),
        ));
    }
    Ok(())
}

/// Builder for [`PropertyInputs`].
///
/// Purchase price, mortgage term and holding period have no sensible default
/// and must be set; everything else starts at zero (a cash purchase with no
/// costs, growth or vacancy).
#[derive(Debug, Clone, Default)]
pub struct PropertyInputsBuilder {
    property_name: Option<String>,
    property_type: Option<String>,
    location: Option<String>,
    listing_url: Option<String>,
    area_sqft: Option<Decimal>,
    purchase_price: Option<Money>,
    down_payment_percent: Option<Percent>,
    mortgage_interest_rate: Option<Percent>,
    mortgage_term_years: Option<u32>,
    expected_monthly_rent: Option<Money>,
    service_charge_annual: Option<Money>,
    annual_maintenance_percent: Option<Percent>,
    property_management_fee_percent: Option<Percent>,
    dld_fee_percent: Option<Percent>,
    agent_fee_percent: Option<Percent>,
    capital_growth_percent: Option<Percent>,
    rent_growth_percent: Option<Percent>,
    vacancy_rate_percent: Option<Percent>,
    holding_period_years: Option<u32>,
}

macro_rules! setter {
    ($name:ident, $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.$name = Some(value);
            self
        }
    };
}

impl PropertyInputsBuilder {
    pub fn property_name(mut self, name: impl Into<String>) -> Self {
        self.property_name = Some(name.into());
        self
    }

    pub fn property_type(mut self, kind: impl Into<String>) -> Self {
        self.property_type = Some(kind.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn listing_url(mut self, url: impl Into<String>) -> Self {
        self.listing_url = Some(url.into());
        self
    }

    setter!(area_sqft, Decimal);
    setter!(purchase_price, Money);
    setter!(down_payment_percent, Percent);
    setter!(mortgage_interest_rate, Percent);
    setter!(mortgage_term_years, u32);
    setter!(expected_monthly_rent, Money);
    setter!(service_charge_annual, Money);
    setter!(annual_maintenance_percent, Percent);
    setter!(property_management_fee_percent, Percent);
    setter!(dld_fee_percent, Percent);
    setter!(agent_fee_percent, Percent);
    setter!(capital_growth_percent, Percent);
    setter!(rent_growth_percent, Percent);
    setter!(vacancy_rate_percent, Percent);
    setter!(holding_period_years, u32);

    pub fn build(self) -> RoiResult<PropertyInputs> {
        let inputs = PropertyInputs {
            property_name: self.property_name,
            property_type: self.property_type,
            location: self.location,
            listing_url: self.listing_url,
            area_sqft: self.area_sqft,
            purchase_price: self
                .purchase_price
                .ok_or_else(|| RoiError::invalid("purchase_price", "Purchase price is required"))?,
            down_payment_percent: self.down_payment_percent.unwrap_or(dec!(100)),
            mortgage_interest_rate: self.mortgage_interest_rate.unwrap_or_default(),
            mortgage_term_years: self.mortgage_term_years.ok_or_else(|| {
                RoiError::invalid("mortgage_term_years", "Mortgage term is required")
            })?,
            expected_monthly_rent: self.expected_monthly_rent.unwrap_or_default(),
            service_charge_annual: self.service_charge_annual.unwrap_or_default(),
            annual_maintenance_percent: self.annual_maintenance_percent.unwrap_or_default(),
            property_management_fee_percent: self
                .property_management_fee_percent
                .unwrap_or_default(),
            dld_fee_percent: self.dld_fee_percent.unwrap_or_default(),
            agent_fee_percent: self.agent_fee_percent.unwrap_or_default(),
            capital_growth_percent: self.capital_growth_percent.unwrap_or_default(),
            rent_growth_percent: self.rent_growth_percent.unwrap_or_default(),
            vacancy_rate_percent: self.vacancy_rate_percent.unwrap_or_default(),
            holding_period_years: self.holding_period_years.ok_or_else(|| {
                RoiError::invalid("holding_period_years", "Holding period is required")
            })?,
        };
        inputs.validate()?;
        Ok(inputs)
    }
}
