use std::path::{Path, PathBuf};
use std::process::Command;

use crate::foundation::error::{VelomapError, VelomapResult};

/// Abstract raster converter for the closed vector artifact.
pub trait Rasterizer {
    /// Convert `source` into `target` at the given JPEG quality.
    fn rasterize(&mut self, source: &Path, target: &Path, quality: u8) -> VelomapResult<()>;
}

/// Production rasterizer spawning ImageMagick `convert`.
#[derive(Clone, Debug)]
pub struct MagickRasterizer {
    convert_bin: PathBuf,
    density: u32,
}

impl MagickRasterizer {
    /// Rasterizer using `convert` from `PATH` at the given density (dpi).
    pub fn new(density: u32) -> Self {
        Self {
            convert_bin: PathBuf::from("convert"),
            density,
        }
    }

    /// Rasterizer using an explicit convert binary path.
    pub fn with_binary(convert_bin: impl Into<PathBuf>, density: u32) -> Self {
        Self {
            convert_bin: convert_bin.into(),
            density,
        }
    }
}

impl Rasterizer for MagickRasterizer {
    fn rasterize(&mut self, source: &Path, target: &Path, quality: u8) -> VelomapResult<()> {
        let output = Command::new(&self.convert_bin)
            .arg("-density")
            .arg(self.density.to_string())
            .arg(source)
            .arg("-quality")
            .arg(quality.to_string())
            .arg(target)
            .output()
            .map_err(|e| {
                VelomapError::rasterization(format!(
                    "failed to spawn '{}': {e}",
                    self.convert_bin.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VelomapError::rasterization(format!(
                "convert exited with status {}: {}",
                output.status.code().unwrap_or(1),
                stderr.trim()
            )));
        }
        Ok(())
    }
}
