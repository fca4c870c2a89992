/// Externally sourced default parameters.
pub mod defaults;

/// Defaults/CLI merge into one immutable run configuration.
pub mod resolve;
