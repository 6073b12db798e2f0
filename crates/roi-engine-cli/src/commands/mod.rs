pub mod analysis;
pub mod compare;
