pub mod assumptions;
pub mod error;
pub mod format;
pub mod investment;
pub mod time_value;
pub mod types;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use assumptions::AssumptionConfig;
pub use error::RoiError;
pub use format::{format_currency, format_multiple, format_percent};
pub use investment::{
    analyze_property, calculate_roi, calculate_roi_with, CalculationResults, PropertyInputs,
};
pub use types::*;

/// Standard result type for all roi-engine operations
pub type RoiResult<T> = Result<T, RoiError>;
