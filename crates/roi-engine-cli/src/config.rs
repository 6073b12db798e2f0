use roi_engine_core::AssumptionConfig;
use std::env;
use tracing::debug;

use crate::input;

pub const ASSUMPTIONS_ENV: &str = "ROI_ASSUMPTIONS";

/// Resolve system assumptions: `--assumptions` flag, then `ROI_ASSUMPTIONS`,
/// then built-in defaults. YAML is chosen by `.yaml`/`.yml` extension.
pub fn load_assumptions(
    path: Option<&str>,
) -> Result<AssumptionConfig, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => Some(p.to_string()),
        None => env::var(ASSUMPTIONS_ENV).ok().filter(|p| !p.trim().is_empty()),
    };

    let config: AssumptionConfig = match path {
        Some(ref p) if is_yaml(p) => input::file::read_yaml(p)?,
        Some(ref p) => input::file::read_json(p)?,
        None => AssumptionConfig::default(),
    };
    config.validate()?;

    debug!(source = path.as_deref().unwrap_or("defaults"), "assumptions loaded");
    Ok(config)
}

fn is_yaml(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_yaml_extension_detection() {
        assert!(is_yaml("assumptions.yaml"));
        assert!(is_yaml("CONFIG.YML"));
        assert!(!is_yaml("assumptions.json"));
    }

    #[test]
    fn test_yaml_assumptions_parse() {
        let yaml = "other_closing_costs: 7500\nselling_fee_percent: 2.5\n";
        let config: AssumptionConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.other_closing_costs, dec!(7500));
        assert_eq!(config.selling_fee_percent, dec!(2.5));
        assert!(config.validate().is_ok());
    }
}
