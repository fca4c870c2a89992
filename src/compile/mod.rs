/// Ordered layer plan derived from a run configuration.
pub mod plan;
