use crate::compile::plan::{self, LayerPlan};
use crate::config::resolve::RunConfiguration;
use crate::export::finalize::{self, FinalOutputs};
use crate::export::rasterize::Rasterizer;
use crate::foundation::error::{VelomapError, VelomapResult};
use crate::render::artifact::Artifact;
use crate::render::call::{CallTarget, Renderer};
use crate::render::lower::Lowering;

/// Execute a layer plan against the external renderer.
///
/// Strictly sequential: each call must complete before the next is issued,
/// since every call appends a byte range to the single shared artifact.
/// Every artifact-targeted call is checked through the [`Artifact`] state
/// machine before it runs, so protocol violations surface as typed errors
/// instead of a silently corrupt page.
///
/// Fail-fast: the first failing call aborts the run. The partial artifact is
/// left on disk but is unusable; no retry, no partial-output recovery.
#[tracing::instrument(skip_all)]
pub fn run_plan<R: Renderer>(
    cfg: &RunConfiguration,
    plan: &LayerPlan,
    renderer: &mut R,
) -> VelomapResult<Artifact> {
    let lowering = Lowering::new(cfg);
    let mut artifact = Artifact::new(&cfg.artifact_path);

    for layer in &plan.layers {
        tracing::debug!(?layer, "drawing layer");
        for call in lowering.lower(*layer)? {
            if let CallTarget::Artifact { mode, keep_open } = call.target {
                artifact.record_write(mode, keep_open)?;
            }
            renderer.draw(&call, artifact.path())?;
        }
    }

    if !artifact.is_closed() {
        return Err(VelomapError::protocol(
            "plan finished without closing the page",
        ));
    }
    Ok(artifact)
}

/// Full pipeline: compile the plan, draw every layer, finalize.
///
/// This is the one entry point the binary uses; tests drive the pieces
/// individually.
pub fn render_map<R: Renderer, Z: Rasterizer>(
    cfg: &RunConfiguration,
    renderer: &mut R,
    rasterizer: &mut Z,
) -> VelomapResult<FinalOutputs> {
    let layer_plan = plan::compile_plan(cfg);
    tracing::info!(
        layers = layer_plan.len(),
        artifact = %cfg.artifact_path.display(),
        "starting render"
    );
    let artifact = run_plan(cfg, &layer_plan, renderer)?;
    finalize::finalize(&artifact, cfg, rasterizer)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
