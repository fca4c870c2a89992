/// Tabular input validation.
pub mod dataset;
