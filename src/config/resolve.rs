use std::path::PathBuf;

use crate::config::defaults::Defaults;
use crate::foundation::core::{Color, Region};
use crate::foundation::error::{VelomapError, VelomapResult};
use crate::foundation::palette::{self, Palette};
use crate::input::dataset::{self, DatasetFile, STRAIN_FIELDS, VELOCITY_FIELDS};

/// Explicit CLI overrides, highest-precedence configuration layer.
///
/// The binary fills this from clap; keeping it a plain struct keeps
/// resolution testable without argv.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    /// Replacement geographic window.
    pub region: Option<Region>,
    /// Replacement projection scale (cm per degree).
    pub scale: Option<f64>,
    /// Replacement frame annotation spec.
    pub frame: Option<String>,
    /// Map title, free text.
    pub title: Option<String>,
    /// Horizontal velocity files, in user-supplied order.
    pub horizontal_files: Vec<PathBuf>,
    /// Vertical velocity files, in user-supplied order.
    pub vertical_files: Vec<PathBuf>,
    /// Replacement velocity vector scale.
    pub velocity_scale: Option<f64>,
    /// Strain-rate input file.
    pub strain_file: Option<PathBuf>,
    /// Replacement strain axis scale.
    pub strain_scale: Option<f64>,
    /// Draw shaded topography/bathymetry under the basemap.
    pub topography: bool,
    /// Draw the fault trace catalogue.
    pub faults: bool,
    /// Label stations with their site ids.
    pub labels: bool,
    /// Draw the dataset legend box.
    pub legend: bool,
    /// Place the logo on the finished map.
    pub logo: bool,
    /// Rasterize the closed artifact to JPEG.
    pub jpeg: bool,
    /// Replacement output base name.
    pub out_base: Option<String>,
}

/// One velocity dataset paired with its assigned visual identity.
#[derive(Clone, Debug)]
pub struct VelocityDataset {
    /// Validated tabular input.
    pub data: DatasetFile,
    /// Positional palette color for every glyph of this dataset.
    pub color: Color,
}

/// Validated strain-rate input plus its axis scale.
#[derive(Clone, Debug)]
pub struct StrainConfig {
    /// Validated tabular input.
    pub data: DatasetFile,
    /// Axis scale in cm per 100 nstrain/yr.
    pub scale: f64,
}

/// Raster assets backing a topography basemap.
#[derive(Clone, Debug)]
pub struct TopographyAssets {
    /// Bathymetry grid (sea).
    pub bathymetry: PathBuf,
    /// Topography grid (land).
    pub topography: PathBuf,
    /// Optional illumination grid for shading.
    pub illumination: Option<PathBuf>,
}

/// JPEG export parameters for the finalizer.
#[derive(Clone, Copy, Debug)]
pub struct JpegExport {
    /// Compression quality, 0-100.
    pub quality: u8,
    /// Raster density in dots per inch.
    pub density: u32,
}

/// Transient files produced during a run and purged by the finalizer.
#[derive(Clone, Debug)]
pub struct ScratchPaths {
    /// Generated bathymetry color table.
    pub bathymetry_cpt: PathBuf,
    /// Generated topography color table.
    pub topography_cpt: PathBuf,
    /// Generated legend descriptor.
    pub legend_spec: PathBuf,
}

impl ScratchPaths {
    /// Scratch paths derived from the output base name.
    pub fn for_base(base: &str) -> Self {
        Self {
            bathymetry_cpt: PathBuf::from(format!("{base}.bathy.cpt")),
            topography_cpt: PathBuf::from(format!("{base}.topo.cpt")),
            legend_spec: PathBuf::from(format!("{base}.legend")),
        }
    }

    /// All scratch paths, for the finalizer purge.
    pub fn all(&self) -> [&PathBuf; 3] {
        [
            &self.bathymetry_cpt,
            &self.topography_cpt,
            &self.legend_spec,
        ]
    }
}

/// Immutable snapshot of all resolved run parameters.
///
/// Built once by [`resolve`], read-only afterwards; every downstream
/// component borrows it.
#[derive(Clone, Debug)]
pub struct RunConfiguration {
    /// Geographic window.
    pub region: Region,
    /// Mercator scale in cm per degree.
    pub scale: f64,
    /// Frame annotation spec.
    pub frame: String,
    /// Optional map title.
    pub title: Option<String>,
    /// Topography basemap assets; `None` draws a plain coastline basemap.
    pub topography: Option<TopographyAssets>,
    /// Fault catalogue; `None` skips the layer.
    pub faults: Option<PathBuf>,
    /// Horizontal velocity datasets with assigned colors, user order.
    pub horizontal: Vec<VelocityDataset>,
    /// Vertical velocity datasets with assigned colors, user order.
    pub vertical: Vec<VelocityDataset>,
    /// Velocity vector scale.
    pub velocity_scale: f64,
    /// Strain-rate layer input, if requested.
    pub strain: Option<StrainConfig>,
    /// Label stations with their site ids.
    pub labels: bool,
    /// Draw the dataset legend box.
    pub legend: bool,
    /// Logo asset; `None` skips the layer.
    pub logo: Option<PathBuf>,
    /// JPEG export parameters, if requested.
    pub jpeg: Option<JpegExport>,
    /// Vector artifact path, `{base}.ps`.
    pub artifact_path: PathBuf,
    /// Raster output path, `{base}.jpg`.
    pub raster_path: PathBuf,
    /// Transient files purged by the finalizer.
    pub scratch: ScratchPaths,
}

/// Merge defaults and CLI overrides into one immutable [`RunConfiguration`].
///
/// Mandatory data features (velocity and strain files the user explicitly
/// requested) fail the run when absent or invalid. Optional decorative
/// features (topography, faults, logo) downgrade to disabled with a warning
/// when their assets are missing. Palette capacity is checked here, per
/// dataset class, so a run that cannot color every dataset fails before the
/// artifact is ever created.
#[tracing::instrument(skip(defaults, ovr, palette))]
pub fn resolve(
    defaults: &Defaults,
    ovr: Overrides,
    palette: &Palette,
) -> VelomapResult<RunConfiguration> {
    let region = ovr.region.unwrap_or(defaults.region);
    let scale = ovr.scale.unwrap_or(defaults.scale);
    if scale <= 0.0 {
        return Err(VelomapError::config(format!(
            "projection scale must be positive, got {scale}"
        )));
    }
    let frame = ovr.frame.unwrap_or_else(|| defaults.frame.clone());

    let topography = if ovr.topography {
        let assets = TopographyAssets {
            bathymetry: defaults.bathymetry_grid.clone(),
            topography: defaults.topography_grid.clone(),
            illumination: defaults.illumination_grid.clone(),
        };
        if assets.bathymetry.is_file() && assets.topography.is_file() {
            Some(assets)
        } else {
            tracing::warn!(
                bathymetry = %assets.bathymetry.display(),
                topography = %assets.topography.display(),
                "topography grids unavailable, downgrading to coastline-only basemap"
            );
            None
        }
    } else {
        None
    };

    let faults = if ovr.faults {
        if defaults.faults_file.is_file() {
            Some(defaults.faults_file.clone())
        } else {
            tracing::warn!(
                faults = %defaults.faults_file.display(),
                "fault catalogue unavailable, disabling fault layer"
            );
            None
        }
    } else {
        None
    };

    let logo = if ovr.logo {
        if defaults.logo_file.is_file() {
            Some(defaults.logo_file.clone())
        } else {
            tracing::warn!(
                logo = %defaults.logo_file.display(),
                "logo asset unavailable, disabling logo layer"
            );
            None
        }
    } else {
        None
    };

    // Mandatory data features: validate every file up front, then color the
    // class. Both must pass before any drawing call is issued.
    let horizontal = resolve_velocity_class(&ovr.horizontal_files, palette)?;
    let vertical = resolve_velocity_class(&ovr.vertical_files, palette)?;

    let strain = match ovr.strain_file {
        Some(path) => {
            let data = dataset::validate(&path, STRAIN_FIELDS)?;
            Some(StrainConfig {
                data,
                scale: ovr.strain_scale.unwrap_or(defaults.strain_scale),
            })
        }
        None => None,
    };

    let jpeg = ovr.jpeg.then_some(JpegExport {
        quality: defaults.jpeg_quality,
        density: defaults.jpeg_density,
    });

    let out_base = ovr.out_base.unwrap_or_else(|| defaults.out_base.clone());
    if out_base.is_empty() {
        return Err(VelomapError::config("output base name must not be empty"));
    }

    Ok(RunConfiguration {
        region,
        scale,
        frame,
        title: ovr.title,
        topography,
        faults,
        horizontal,
        vertical,
        velocity_scale: ovr.velocity_scale.unwrap_or(defaults.velocity_scale),
        strain,
        labels: ovr.labels,
        legend: ovr.legend,
        logo,
        jpeg,
        artifact_path: PathBuf::from(format!("{out_base}.ps")),
        raster_path: PathBuf::from(format!("{out_base}.jpg")),
        scratch: ScratchPaths::for_base(&out_base),
    })
}

fn resolve_velocity_class(
    files: &[PathBuf],
    palette: &Palette,
) -> VelomapResult<Vec<VelocityDataset>> {
    let mut validated = Vec::with_capacity(files.len());
    for path in files {
        validated.push(dataset::validate(path, VELOCITY_FIELDS)?);
    }
    let colors = palette::assign(validated.len(), palette)?;
    Ok(validated
        .into_iter()
        .zip(colors)
        .map(|(data, color)| VelocityDataset { data, color })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/config/resolve.rs"]
mod tests;
