//! CLI command implementations

pub mod generate;
pub mod presets;

mod reporting;
