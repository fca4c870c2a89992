/// Closing steps: rasterization and scratch purge.
pub mod finalize;

/// External rasterizer boundary.
pub mod rasterize;
