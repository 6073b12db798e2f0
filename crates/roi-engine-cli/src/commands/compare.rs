use clap::Args;
use serde_json::Value;

use roi_engine_core::comparison::compare::{self, ComparisonInput};
use roi_engine_core::{AssumptionConfig, PropertyInputs};

use crate::input;

/// Arguments for a side-by-side comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON array of properties, or an object with `properties`
    /// and optional `assumptions`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(
    args: CompareArgs,
    assumptions: &AssumptionConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: Value = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_piped::<Value>()? {
        data
    } else {
        return Err("--input <file.json> or stdin required for comparison".into());
    };

    let comparison = comparison_input(raw, assumptions)?;
    let result = compare::compare_properties(&comparison)?;
    Ok(serde_json::to_value(result)?)
}

/// Accept a bare array of properties, or an object with `properties` and
/// optional `assumptions`. Assumptions in the object override the
/// `--assumptions` flag.
fn comparison_input(
    raw: Value,
    assumptions: &AssumptionConfig,
) -> Result<ComparisonInput, Box<dyn std::error::Error>> {
    let carries_assumptions = raw.get("assumptions").is_some();
    let comparison = match raw {
        Value::Object(_) if carries_assumptions => serde_json::from_value::<ComparisonInput>(raw)?,
        Value::Object(mut map) => {
            let properties = map
                .remove("properties")
                .ok_or("comparison input needs a `properties` array")?;
            ComparisonInput {
                properties: serde_json::from_value::<Vec<PropertyInputs>>(properties)?,
                assumptions: assumptions.clone(),
            }
        }
        other => ComparisonInput {
            properties: serde_json::from_value::<Vec<PropertyInputs>>(other)?,
            assumptions: assumptions.clone(),
        },
    };
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn property_json(name: &str) -> Value {
        json!({
            "property_name": name,
            "purchase_price": "900000", "down_payment_percent": "25",
            "mortgage_interest_rate": "4.5", "mortgage_term_years": 25,
            "expected_monthly_rent": "6000", "service_charge_annual": "9000",
            "annual_maintenance_percent": "1", "property_management_fee_percent": "5",
            "dld_fee_percent": "4", "agent_fee_percent": "2",
            "capital_growth_percent": "3", "rent_growth_percent": "2",
            "vacancy_rate_percent": "5", "holding_period_years": 5
        })
    }

    fn flag_assumptions() -> AssumptionConfig {
        AssumptionConfig {
            selling_fee_percent: dec!(3),
            ..AssumptionConfig::default()
        }
    }

    #[test]
    fn test_bare_array_uses_flag_assumptions() {
        let raw = json!([property_json("A"), property_json("B")]);
        let input = comparison_input(raw, &flag_assumptions()).unwrap();
        assert_eq!(input.properties.len(), 2);
        assert_eq!(input.assumptions.selling_fee_percent, dec!(3));
    }

    #[test]
    fn test_object_without_assumptions_uses_flag_assumptions() {
        let raw = json!({ "properties": [property_json("A")] });
        let input = comparison_input(raw, &flag_assumptions()).unwrap();
        assert_eq!(input.properties[0].property_name.as_deref(), Some("A"));
        assert_eq!(input.assumptions.selling_fee_percent, dec!(3));
    }

    #[test]
    fn test_object_assumptions_override_flag() {
        let raw = json!({
            "properties": [property_json("A")],
            "assumptions": { "selling_fee_percent": "1.5" }
        });
        let input = comparison_input(raw, &flag_assumptions()).unwrap();
        assert_eq!(input.assumptions.selling_fee_percent, dec!(1.5));
        assert_eq!(
            input.assumptions.other_closing_costs,
            AssumptionConfig::default().other_closing_costs
        );
    }

    #[test]
    fn test_object_without_properties_is_rejected() {
        let err = comparison_input(json!({ "rows": [] }), &flag_assumptions()).unwrap_err();
        assert!(err.to_string().contains("properties"));
    }
}
