pub mod break_even;
pub mod costs;
pub mod financing;
pub mod inputs;
pub mod operating;
pub mod projection;
pub mod roi;
pub mod sensitivity;

pub use inputs::{PropertyInputs, PropertyInputsBuilder};
pub use roi::{analyze_property, calculate_roi, calculate_roi_with, CalculationResults};
