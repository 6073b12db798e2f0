use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use roi_engine_core::investment::analyze_property;
use roi_engine_core::investment::sensitivity::{ScenarioResult, SensitivityAxis};
use roi_engine_core::{AssumptionConfig, PropertyInputs};

use crate::input;

/// Property assumptions, from a JSON file, piped stdin, or individual flags
#[derive(Args, Debug, Clone)]
pub struct PropertyArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Property name shown in reports
    #[arg(long)]
    pub name: Option<String>,

    /// Built-up area in square feet
    #[arg(long)]
    pub area_sqft: Option<Decimal>,

    /// Purchase price (AED)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment, percent of price
    #[arg(long, default_value = "25")]
    pub down_payment: Decimal,

    /// Annual mortgage interest rate, percent
    #[arg(long, default_value = "0")]
    pub rate: Decimal,

    /// Mortgage term in years
    #[arg(long, default_value_t = 25)]
    pub term: u32,

    /// Expected monthly rent (AED)
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Annual service charge (AED)
    #[arg(long, default_value = "0")]
    pub service_charge: Decimal,

    /// Annual maintenance, percent of property value
    #[arg(long, default_value = "1")]
    pub maintenance: Decimal,

    /// Property management fee, percent of gross rent
    #[arg(long, default_value = "5")]
    pub management_fee: Decimal,

    /// DLD transfer fee, percent of price
    #[arg(long, default_value = "4")]
    pub dld_fee: Decimal,

    /// Agency fee, percent of price
    #[arg(long, default_value = "2")]
    pub agent_fee: Decimal,

    /// Annual capital growth, percent
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub capital_growth: Decimal,

    /// Annual rent growth, percent
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub rent_growth: Decimal,

    /// Vacancy rate, percent
    #[arg(long, default_value = "5")]
    pub vacancy: Decimal,

    /// Holding period in years
    #[arg(long, default_value_t = 5)]
    pub holding_years: u32,
}

impl PropertyArgs {
    fn resolve(&self) -> Result<PropertyInputs, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return Ok(input::file::read_json(path)?);
        }
        if let Some(inputs) = input::stdin::read_piped::<PropertyInputs>()? {
            return Ok(inputs);
        }

        let price = self.price.ok_or("--price is required (or provide --input)")?;
        let rent = self.rent.ok_or("--rent is required (or provide --input)")?;

        let mut builder = PropertyInputs::builder()
            .purchase_price(price)
            .down_payment_percent(self.down_payment)
            .mortgage_interest_rate(self.rate)
            .mortgage_term_years(self.term)
            .expected_monthly_rent(rent)
            .service_charge_annual(self.service_charge)
            .annual_maintenance_percent(self.maintenance)
            .property_management_fee_percent(self.management_fee)
            .dld_fee_percent(self.dld_fee)
            .agent_fee_percent(self.agent_fee)
            .capital_growth_percent(self.capital_growth)
            .rent_growth_percent(self.rent_growth)
            .vacancy_rate_percent(self.vacancy)
            .holding_period_years(self.holding_years);
        if let Some(ref name) = self.name {
            builder = builder.property_name(name.clone());
        }
        if let Some(area) = self.area_sqft {
            builder = builder.area_sqft(area);
        }
        Ok(builder.build()?)
    }
}

/// Arguments for the full analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub property: PropertyArgs,
}

/// Arguments for the year-by-year projection
#[derive(Args)]
pub struct ProjectionArgs {
    #[command(flatten)]
    pub property: PropertyArgs,
}

/// Arguments for the sensitivity tables
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub property: PropertyArgs,
}

/// Arguments for break-even analysis
#[derive(Args)]
pub struct BreakEvenArgs {
    #[command(flatten)]
    pub property: PropertyArgs,
}

pub fn run_analyze(
    args: AnalyzeArgs,
    assumptions: &AssumptionConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = args.property.resolve()?;
    let result = analyze_property(&inputs, assumptions)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_projection(
    args: ProjectionArgs,
    assumptions: &AssumptionConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = args.property.resolve()?;
    let output = analyze_property(&inputs, assumptions)?;
    reshape(&output, &output.result.projections)
}

/// One row of the flattened sensitivity table.
#[derive(Serialize)]
struct SensitivityRow<'a> {
    axis: SensitivityAxis,
    #[serde(flatten)]
    scenario: &'a ScenarioResult,
}

pub fn run_sensitivity(
    args: SensitivityArgs,
    assumptions: &AssumptionConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = args.property.resolve()?;
    let output = analyze_property(&inputs, assumptions)?;
    let s = &output.result.sensitivity;

    let rows: Vec<SensitivityRow> = [
        (SensitivityAxis::MonthlyRent, &s.rent_scenarios),
        (SensitivityAxis::VacancyRate, &s.vacancy_scenarios),
        (SensitivityAxis::InterestRate, &s.interest_rate_scenarios),
    ]
    .into_iter()
    .flat_map(|(axis, scenarios)| {
        scenarios
            .iter()
            .map(move |scenario| SensitivityRow { axis, scenario })
    })
    .collect();

    reshape(&output, &rows)
}

pub fn run_break_even(
    args: BreakEvenArgs,
    assumptions: &AssumptionConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = args.property.resolve()?;
    let output = analyze_property(&inputs, assumptions)?;
    reshape(&output, &output.result.break_even)
}

/// Keep the envelope (methodology, warnings, metadata) but swap in a slice of
/// the result.
fn reshape<T: Serialize>(
    envelope: &impl Serialize,
    section: &T,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = serde_json::to_value(envelope)?;
    value["result"] = serde_json::to_value(section)?;
    Ok(value)
}
