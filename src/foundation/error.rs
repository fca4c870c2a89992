use std::path::PathBuf;

/// Convenience result type used across velomap.
pub type VelomapResult<T> = Result<T, VelomapError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum VelomapError {
    /// A required input path does not resolve to a readable regular file.
    #[error("missing file: '{0}'")]
    MissingFile(PathBuf),

    /// Rows of a tabular input do not all share one common field count.
    #[error("inconsistent fields in '{path}': rows carry {counts:?} fields")]
    InconsistentFields {
        /// Offending input file.
        path: PathBuf,
        /// Distinct per-row field counts observed, ascending.
        counts: Vec<usize>,
    },

    /// A tabular input has a uniform field count, but not the expected one.
    #[error("wrong field count in '{path}': expected {expected}, found {found}")]
    WrongFieldCount {
        /// Offending input file.
        path: PathBuf,
        /// Field count the dataset class requires.
        expected: usize,
        /// Field count actually observed (0 for an empty table).
        found: usize,
    },

    /// More datasets of one class than the palette can identify.
    #[error("palette exhausted: {datasets} datasets but palette holds {capacity} colors")]
    PaletteExhausted {
        /// Number of datasets requesting a color.
        datasets: usize,
        /// Palette capacity.
        capacity: usize,
    },

    /// Missing required configuration source, or a mandatory user-requested
    /// asset that is absent or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// An external renderer step completed with a non-zero status.
    #[error("draw call '{op}' failed with status {status}: {detail}")]
    DrawCall {
        /// Renderer operation name (GMT module).
        op: String,
        /// Exit status reported by the external command.
        status: i32,
        /// Captured diagnostic (stderr tail or spawn error).
        detail: String,
    },

    /// The external rasterizer failed; the vector artifact is unaffected.
    #[error("rasterization failed: {0}")]
    Rasterization(String),

    /// A write was attempted against the artifact in the wrong state.
    #[error("artifact protocol violation: {0}")]
    Protocol(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VelomapError {
    /// Build a [`VelomapError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`VelomapError::Rasterization`] value.
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    /// Build a [`VelomapError::Protocol`] value.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Build a [`VelomapError::DrawCall`] value.
    pub fn draw_call(op: impl Into<String>, status: i32, detail: impl Into<String>) -> Self {
        Self::DrawCall {
            op: op.into(),
            status,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
