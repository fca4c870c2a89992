use std::path::{Path, PathBuf};

use crate::foundation::core::Region;
use crate::foundation::error::{VelomapError, VelomapResult};

/// Externally sourced default parameters.
///
/// Loaded from a JSON key-value file that is required to exist; every key is
/// optional in the file and falls back to the built-in default below, so the
/// layering is built-in < file < CLI override.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Defaults {
    /// Default geographic window.
    #[serde(default = "default_region")]
    pub region: Region,
    /// Mercator projection scale in centimeters per degree.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// GMT frame annotation spec (the `-B` payload).
    #[serde(default = "default_frame")]
    pub frame: String,
    /// Bathymetry grid drawn under the sea when topography is enabled.
    #[serde(default = "default_bathymetry_grid")]
    pub bathymetry_grid: PathBuf,
    /// Topography grid drawn over land when topography is enabled.
    #[serde(default = "default_topography_grid")]
    pub topography_grid: PathBuf,
    /// Optional illumination (gradient) grid for raster shading.
    #[serde(default)]
    pub illumination_grid: Option<PathBuf>,
    /// Fault trace catalogue.
    #[serde(default = "default_faults_file")]
    pub faults_file: PathBuf,
    /// Logo raster placed on the finished map.
    #[serde(default = "default_logo_file")]
    pub logo_file: PathBuf,
    /// Velocity vector scale (cm per mm/yr).
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f64,
    /// Strain-rate axis scale (cm per 100 nstrain/yr).
    #[serde(default = "default_strain_scale")]
    pub strain_scale: f64,
    /// JPEG quality passed to the rasterizer.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Raster density in dots per inch.
    #[serde(default = "default_jpeg_density")]
    pub jpeg_density: u32,
    /// Output base name; derives the vector and raster file names.
    #[serde(default = "default_out_base")]
    pub out_base: String,
}

fn default_region() -> Region {
    // Aegean / Anatolia window, the typical use of this tool.
    Region {
        west: 18.0,
        east: 47.0,
        south: 32.0,
        north: 45.0,
    }
}

fn default_scale() -> f64 {
    0.6
}

fn default_frame() -> String {
    "a4f2".to_string()
}

fn default_bathymetry_grid() -> PathBuf {
    PathBuf::from("grids/bathymetry.grd")
}

fn default_topography_grid() -> PathBuf {
    PathBuf::from("grids/topography.grd")
}

fn default_faults_file() -> PathBuf {
    PathBuf::from("assets/faults.dat")
}

fn default_logo_file() -> PathBuf {
    PathBuf::from("assets/logo.eps")
}

fn default_velocity_scale() -> f64 {
    0.05
}

fn default_strain_scale() -> f64 {
    0.4
}

fn default_jpeg_quality() -> u8 {
    90
}

fn default_jpeg_density() -> u32 {
    300
}

fn default_out_base() -> String {
    "velomap".to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            region: default_region(),
            scale: default_scale(),
            frame: default_frame(),
            bathymetry_grid: default_bathymetry_grid(),
            topography_grid: default_topography_grid(),
            illumination_grid: None,
            faults_file: default_faults_file(),
            logo_file: default_logo_file(),
            velocity_scale: default_velocity_scale(),
            strain_scale: default_strain_scale(),
            jpeg_quality: default_jpeg_quality(),
            jpeg_density: default_jpeg_density(),
            out_base: default_out_base(),
        }
    }
}

impl Defaults {
    /// Load the required defaults source file.
    ///
    /// A missing or malformed source is a fatal configuration error; there is
    /// no silent fallback to built-ins for the file itself.
    pub fn from_path(path: &Path) -> VelomapResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            VelomapError::config(format!(
                "defaults source '{}' is required: {e}",
                path.display()
            ))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            VelomapError::config(format!(
                "defaults source '{}' is malformed: {e}",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/defaults.rs"]
mod tests;
