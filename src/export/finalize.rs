use std::path::PathBuf;

use crate::config::resolve::RunConfiguration;
use crate::export::rasterize::Rasterizer;
use crate::foundation::error::{VelomapError, VelomapResult};
use crate::render::artifact::Artifact;

/// Paths of the finished outputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalOutputs {
    /// The closed vector artifact, always produced.
    pub vector: PathBuf,
    /// The raster export, only when jpeg export was enabled.
    pub raster: Option<PathBuf>,
}

/// Finalize a closed artifact: optional rasterization, then scratch purge.
///
/// Only legal once the orchestrator reached the closed state. A rasterizer
/// failure is reported as [`VelomapError::Rasterization`] but never unwinds
/// the already-closed vector artifact; the scratch purge runs on every path
/// and swallows its own failures.
#[tracing::instrument(skip_all)]
pub fn finalize<Z: Rasterizer>(
    artifact: &Artifact,
    cfg: &RunConfiguration,
    rasterizer: &mut Z,
) -> VelomapResult<FinalOutputs> {
    if !artifact.is_closed() {
        purge_scratch(cfg);
        return Err(VelomapError::protocol(
            "finalize called before the page was closed",
        ));
    }

    let raster = match &cfg.jpeg {
        Some(jpeg) => {
            let result = rasterizer.rasterize(artifact.path(), &cfg.raster_path, jpeg.quality);
            if let Err(err) = result {
                // The vector artifact is already complete; rasterization is
                // strictly additive.
                purge_scratch(cfg);
                return Err(err);
            }
            tracing::info!(raster = %cfg.raster_path.display(), "raster export written");
            Some(cfg.raster_path.clone())
        }
        None => None,
    };

    purge_scratch(cfg);
    Ok(FinalOutputs {
        vector: artifact.path().to_path_buf(),
        raster,
    })
}

/// Best-effort removal of transient intermediates.
fn purge_scratch(cfg: &RunConfiguration) {
    for path in cfg.scratch.all() {
        if let Err(err) = std::fs::remove_file(path)
            && path.exists()
        {
            tracing::debug!(path = %path.display(), %err, "scratch purge skipped");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/finalize.rs"]
mod tests;
