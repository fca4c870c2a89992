//! Velomap renders composite GPS velocity / strain-rate maps by driving the
//! external GMT plotting engine through a strict sequence of layer calls, all
//! appending into one shared PostScript artifact.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: defaults file + CLI overrides -> immutable [`RunConfiguration`]
//!    (inputs validated, colors assigned, optional features downgraded)
//! 2. **Compile**: `RunConfiguration -> LayerPlan` (ordered, inspectable layer list)
//! 3. **Draw**: the orchestrator interprets the plan against the [`Renderer`],
//!    type-checking every write through the [`Artifact`] state machine
//! 4. **Finalize**: optional JPEG rasterization, scratch purge
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Immutable configuration**: the resolved configuration is built once and
//!   never mutated downstream.
//! - **Single writer, strict order**: the artifact has exactly one writer and
//!   emission order is load-bearing; the first failing call aborts the run.
//! - **Explicit protocol**: create/append/close is a typed state machine, not
//!   implicit call-order knowledge.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compile;
mod config;
mod export;
mod foundation;
mod input;
mod render;

pub use compile::plan::{BasemapKind, Layer, LayerPlan, compile_plan};
pub use config::defaults::Defaults;
pub use config::resolve::{
    JpegExport, Overrides, RunConfiguration, ScratchPaths, StrainConfig, TopographyAssets,
    VelocityDataset, resolve,
};
pub use export::finalize::{FinalOutputs, finalize};
pub use export::rasterize::{MagickRasterizer, Rasterizer};
pub use foundation::core::{Color, Region};
pub use foundation::error::{VelomapError, VelomapResult};
pub use foundation::palette::{Palette, assign};
pub use input::dataset::{DatasetFile, STRAIN_FIELDS, VELOCITY_FIELDS, validate};
pub use render::artifact::{Artifact, ArtifactState};
pub use render::call::{CallInput, CallTarget, DrawCall, GmtRenderer, Renderer, WriteMode};
pub use render::lower::{Lowering, VelocityClass};
pub use render::pipeline::{render_map, run_plan};
