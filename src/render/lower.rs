use anyhow::Context as _;

use crate::compile::plan::{BasemapKind, Layer};
use crate::config::resolve::{RunConfiguration, StrainConfig, VelocityDataset};
use crate::foundation::error::{VelomapError, VelomapResult};
use crate::input::dataset::DatasetFile;
use crate::render::call::{CallInput, CallTarget, DrawCall, WriteMode};

/// Velocity dataset class; decides marker shape and scale-bar row shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VelocityClass {
    /// East/north horizontal velocities.
    Horizontal,
    /// Up-component velocities drawn as north-pointing vectors.
    Vertical,
}

/// Reference magnitude annotated on the velocity scale bars, mm/yr.
const SCALE_BAR_MM_YR: f64 = 20.0;

/// Reference magnitude annotated on the strain scale glyphs, nstrain/yr.
const SCALE_STRAIN_NSTRAIN_YR: f64 = 100.0;

/// Lowers layer descriptors into ordered draw calls against one
/// configuration.
pub struct Lowering<'a> {
    cfg: &'a RunConfiguration,
}

impl<'a> Lowering<'a> {
    /// Lowering bound to a resolved configuration.
    pub fn new(cfg: &'a RunConfiguration) -> Self {
        Self { cfg }
    }

    /// Ordered draw calls for one layer.
    ///
    /// Call order within the returned vector is visual stacking order and
    /// must be preserved by the orchestrator.
    pub fn lower(&self, layer: Layer) -> VelomapResult<Vec<DrawCall>> {
        match layer {
            Layer::Basemap(BasemapKind::Coastline) => Ok(self.coastline_basemap()),
            Layer::Basemap(BasemapKind::Topography) => self.topography_basemap(),
            Layer::Faults => Ok(self.faults()),
            Layer::HorizontalVelocity { index } => {
                let ds = self.dataset(&self.cfg.horizontal, index, "horizontal")?;
                self.velocity(ds, VelocityClass::Horizontal)
            }
            Layer::VerticalVelocity { index } => {
                let ds = self.dataset(&self.cfg.vertical, index, "vertical")?;
                self.velocity(ds, VelocityClass::Vertical)
            }
            Layer::HorizontalScaleBar => Ok(vec![self.scale_bar(VelocityClass::Horizontal)]),
            Layer::VerticalScaleBar => Ok(vec![self.scale_bar(VelocityClass::Vertical)]),
            Layer::Strain => {
                let strain = self.cfg.strain.as_ref().ok_or_else(|| {
                    VelomapError::protocol("strain layer planned without strain configuration")
                })?;
                Ok(self.strain(strain))
            }
            Layer::Legend => self.legend(),
            Layer::Logo => {
                let logo = self.cfg.logo.as_ref().ok_or_else(|| {
                    VelomapError::protocol("logo layer planned without logo asset")
                })?;
                Ok(vec![DrawCall::new(
                    "psimage",
                    ["-Dx0.25c/0.25c+w2.5c"],
                    CallInput::File(logo.clone()),
                    overlay(),
                )])
            }
            Layer::Close => Ok(vec![DrawCall::new(
                "psxy",
                [self.cfg.region.gmt_arg(), self.proj_arg(), "-T".to_string()],
                CallInput::None,
                CallTarget::Artifact {
                    mode: WriteMode::Append,
                    keep_open: false,
                },
            )]),
        }
    }

    fn dataset(
        &self,
        class: &'a [VelocityDataset],
        index: usize,
        name: &str,
    ) -> VelomapResult<&'a VelocityDataset> {
        class.get(index).ok_or_else(|| {
            VelomapError::protocol(format!("{name} velocity layer index {index} out of range"))
        })
    }

    fn proj_arg(&self) -> String {
        format!("-Jm{}c", self.cfg.scale)
    }

    fn window_args(&self) -> [String; 2] {
        [self.cfg.region.gmt_arg(), self.proj_arg()]
    }

    fn frame_args(&self) -> Vec<String> {
        let mut args = vec![format!("-B{}", self.cfg.frame)];
        if let Some(title) = &self.cfg.title {
            args.push(format!("-B+t{title}"));
        }
        args
    }

    /// Plain basemap: one coastline call carrying the create-mode write.
    fn coastline_basemap(&self) -> Vec<DrawCall> {
        let [region, proj] = self.window_args();
        let mut args = vec![
            region,
            proj,
            "-Df".to_string(),
            "-Ggray85".to_string(),
            "-Slightblue".to_string(),
            "-W0.5p,black".to_string(),
        ];
        args.extend(self.frame_args());
        vec![DrawCall::new(
            "pscoast",
            args,
            CallInput::None,
            CallTarget::Artifact {
                mode: WriteMode::Create,
                keep_open: true,
            },
        )]
    }

    /// Shaded relief composite: eight ordered sub-calls, each of which must
    /// succeed before the next is issued.
    fn topography_basemap(&self) -> VelomapResult<Vec<DrawCall>> {
        let topo = self.cfg.topography.as_ref().ok_or_else(|| {
            VelomapError::protocol("topography basemap planned without raster assets")
        })?;
        let [region, proj] = self.window_args();
        let bathy_cpt = self.cfg.scratch.bathymetry_cpt.display().to_string();
        let topo_cpt = self.cfg.scratch.topography_cpt.display().to_string();

        let illum_arg = topo
            .illumination
            .as_ref()
            .map(|grid| format!("-I{}", grid.display()));
        let mut bathy_image = vec![region.clone(), proj.clone(), format!("-C{bathy_cpt}")];
        let mut land_image = vec![region.clone(), proj.clone(), format!("-C{topo_cpt}")];
        if let Some(illum) = &illum_arg {
            bathy_image.push(illum.clone());
            land_image.push(illum.clone());
        }

        let mut frame = vec![region.clone(), proj.clone()];
        frame.extend(self.frame_args());

        Ok(vec![
            // Bathymetry color table.
            DrawCall::new(
                "makecpt",
                ["-Cabyss", "-T-8000/0/250", "-Z"],
                CallInput::None,
                CallTarget::Scratch(self.cfg.scratch.bathymetry_cpt.clone()),
            ),
            // Bathymetry raster fill; the only create-mode write of the run.
            DrawCall::new(
                "grdimage",
                bathy_image,
                CallInput::File(topo.bathymetry.clone()),
                CallTarget::Artifact {
                    mode: WriteMode::Create,
                    keep_open: true,
                },
            ),
            // Sea mask: clip everything that follows to dry land.
            DrawCall::new(
                "pscoast",
                [region.clone(), proj.clone(), "-Df".into(), "-Gc".into()],
                CallInput::None,
                overlay(),
            ),
            // Land color table.
            DrawCall::new(
                "makecpt",
                ["-Crelief", "-T0/4000/200", "-Z"],
                CallInput::None,
                CallTarget::Scratch(self.cfg.scratch.topography_cpt.clone()),
            ),
            // Land raster fill inside the clip.
            DrawCall::new(
                "grdimage",
                land_image,
                CallInput::File(topo.topography.clone()),
                overlay(),
            ),
            // Land mask release.
            DrawCall::new("pscoast", ["-Q"], CallInput::None, overlay()),
            // Grid and frame.
            DrawCall::new("psbasemap", frame, CallInput::None, overlay()),
            // Coastline outline on top of the rasters.
            DrawCall::new(
                "pscoast",
                [region, proj, "-Df".into(), "-W0.5p,black".into()],
                CallInput::None,
                overlay(),
            ),
        ])
    }

    fn faults(&self) -> Vec<DrawCall> {
        let [region, proj] = self.window_args();
        let input = match &self.cfg.faults {
            Some(path) => CallInput::File(path.clone()),
            None => CallInput::None,
        };
        vec![DrawCall::new(
            "psxy",
            [region, proj, "-W0.8p,saddlebrown".to_string()],
            input,
            overlay(),
        )]
    }

    /// One velocity dataset: markers, wide translucent vector pass, narrow
    /// solid vector pass, then optionally a site-label pass.
    fn velocity(&self, ds: &VelocityDataset, class: VelocityClass) -> VelomapResult<Vec<DrawCall>> {
        let rows = velocity_rows(&ds.data, class)?;
        let [region, proj] = self.window_args();
        let color = ds.color;
        let se_arg = format!("-Se{}/0.95/0", self.cfg.velocity_scale);

        let marker_symbol = match class {
            VelocityClass::Horizontal => "-Sc0.1c",
            VelocityClass::Vertical => "-St0.12c",
        };

        let mut calls = vec![
            DrawCall::new(
                "psxy",
                [
                    region.clone(),
                    proj.clone(),
                    marker_symbol.to_string(),
                    format!("-G{color}"),
                    "-W0.2p,black".to_string(),
                ],
                CallInput::Inline(rows.markers),
                overlay(),
            ),
            // Wide translucent pass shows the error ellipse extent.
            DrawCall::new(
                "psvelo",
                [
                    region.clone(),
                    proj.clone(),
                    se_arg.clone(),
                    "-A9p".to_string(),
                    format!("-W4p,{color}@70"),
                ],
                CallInput::Inline(rows.vectors.clone()),
                overlay(),
            ),
            // Narrow solid pass draws the vector itself.
            DrawCall::new(
                "psvelo",
                [
                    region.clone(),
                    proj.clone(),
                    se_arg,
                    "-A9p+e".to_string(),
                    format!("-W0.8p,{color}"),
                    format!("-G{color}"),
                ],
                CallInput::Inline(rows.vectors),
                overlay(),
            ),
        ];

        if self.cfg.labels {
            calls.push(DrawCall::new(
                "pstext",
                [
                    region,
                    proj,
                    format!("-F+f7p,Helvetica,{color}+jBL"),
                    "-D0.12c/0.12c".to_string(),
                ],
                CallInput::Inline(rows.labels),
                overlay(),
            ));
        }
        Ok(calls)
    }

    /// Fixed scale-bar glyph, one per non-empty velocity class.
    fn scale_bar(&self, class: VelocityClass) -> DrawCall {
        let (fx, fy) = match class {
            VelocityClass::Horizontal => (0.06, 0.05),
            VelocityClass::Vertical => (0.06, 0.11),
        };
        let (lon, lat) = self.cfg.region.inset_point(fx, fy);
        let (ve, vn) = match class {
            VelocityClass::Horizontal => (SCALE_BAR_MM_YR, 0.0),
            VelocityClass::Vertical => (0.0, SCALE_BAR_MM_YR),
        };
        let row = format!("{lon} {lat} {ve} {vn} 0 0 0 {SCALE_BAR_MM_YR}mm/yr\n");
        let [region, proj] = self.window_args();
        DrawCall::new(
            "psvelo",
            [
                region,
                proj,
                format!("-Se{}/0.95/8", self.cfg.velocity_scale),
                "-A9p+e".to_string(),
                "-W0.8p,black".to_string(),
                "-Gblack".to_string(),
            ],
            CallInput::Inline(row),
            overlay(),
        )
    }

    /// Strain layer: compression axes, extension axes, the two scale glyphs,
    /// then the scale-label text, in that fixed order.
    fn strain(&self, strain: &StrainConfig) -> Vec<DrawCall> {
        let [region, proj] = self.window_args();
        let sx_arg = format!("-Sx{}", strain.scale);
        let (lon, lat) = self.cfg.region.inset_point(0.06, 0.17);

        let compression_glyph =
            format!("{lon} {lat} 0 -{SCALE_STRAIN_NSTRAIN_YR} 0\n");
        let extension_glyph = format!("{lon} {lat} {SCALE_STRAIN_NSTRAIN_YR} 0 0\n");
        let label = format!("{lon} {lat} {SCALE_STRAIN_NSTRAIN_YR} nstrain/yr\n");

        vec![
            DrawCall::new(
                "psvelo",
                [region.clone(), proj.clone(), sx_arg.clone(), "-W1.5p,blue".into()],
                CallInput::File(strain.data.path.clone()),
                overlay(),
            ),
            DrawCall::new(
                "psvelo",
                [region.clone(), proj.clone(), sx_arg.clone(), "-W1.5p,red".into()],
                CallInput::File(strain.data.path.clone()),
                overlay(),
            ),
            DrawCall::new(
                "psvelo",
                [region.clone(), proj.clone(), sx_arg.clone(), "-W1.5p,blue".into()],
                CallInput::Inline(compression_glyph),
                overlay(),
            ),
            DrawCall::new(
                "psvelo",
                [region.clone(), proj.clone(), sx_arg, "-W1.5p,red".into()],
                CallInput::Inline(extension_glyph),
                overlay(),
            ),
            DrawCall::new(
                "pstext",
                [
                    region,
                    proj,
                    "-F+f7p,Helvetica,black+jBL".to_string(),
                    "-D0.3c/0c".to_string(),
                ],
                CallInput::Inline(label),
                overlay(),
            ),
        ]
    }

    /// Legend layer: writes the scratch descriptor, then one pslegend call.
    fn legend(&self) -> VelomapResult<Vec<DrawCall>> {
        let mut spec = String::from("H 10p,Helvetica-Bold GPS velocity field\nD 0.1c 0.5p\n");
        for ds in &self.cfg.horizontal {
            spec.push_str(&legend_entry("c 0.12c", ds));
        }
        for ds in &self.cfg.vertical {
            spec.push_str(&legend_entry("t 0.14c", ds));
        }
        if self.cfg.faults.is_some() {
            spec.push_str("S 0.25c - 0.5c - 0.8p,saddlebrown 0.7c faults\n");
        }
        if self.cfg.strain.is_some() {
            spec.push_str("S 0.25c x 0.2c - 1.5p,blue 0.7c strain axes\n");
        }
        std::fs::write(&self.cfg.scratch.legend_spec, &spec)
            .with_context(|| {
                format!(
                    "write legend descriptor '{}'",
                    self.cfg.scratch.legend_spec.display()
                )
            })
            .map_err(VelomapError::Other)?;

        let [region, proj] = self.window_args();
        Ok(vec![DrawCall::new(
            "pslegend",
            [
                region,
                proj,
                "-Dx0.35c/0.35c+w4.5c+jBL".to_string(),
                "-F+p0.5p+gwhite".to_string(),
            ],
            CallInput::File(self.cfg.scratch.legend_spec.clone()),
            overlay(),
        )])
    }
}

fn overlay() -> CallTarget {
    CallTarget::Artifact {
        mode: WriteMode::Append,
        keep_open: true,
    }
}

fn legend_entry(symbol: &str, ds: &VelocityDataset) -> String {
    let name = ds
        .data
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| ds.data.path.display().to_string());
    format!("S 0.25c {symbol} {} 0.25p 0.7c {name}\n", ds.color)
}

/// Row projections of one velocity dataset.
///
/// The on-disk layout is site-id first (site, lat, lon, ve, vn, sve, svn,
/// corr, ...); the renderer consumes lon/lat first, so the rows are
/// re-ordered here and piped inline.
struct VelocityRows {
    markers: String,
    vectors: String,
    labels: String,
}

fn velocity_rows(data: &DatasetFile, class: VelocityClass) -> VelomapResult<VelocityRows> {
    let text = std::fs::read_to_string(&data.path)
        .map_err(|_| VelomapError::MissingFile(data.path.clone()))?;

    let mut markers = String::new();
    let mut vectors = String::new();
    let mut labels = String::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let f: Vec<&str> = line.split_whitespace().collect();
        if f.len() < 8 {
            // Validation already enforced the field count; a shorter row here
            // means the file changed underneath the run.
            return Err(VelomapError::protocol(format!(
                "row of '{}' changed since validation",
                data.path.display()
            )));
        }
        let (site, lat, lon) = (f[0], f[1], f[2]);
        let (ve, vn, sve, svn, corr) = (f[3], f[4], f[5], f[6], f[7]);

        markers.push_str(&format!("{lon} {lat}\n"));
        match class {
            VelocityClass::Horizontal => {
                vectors.push_str(&format!("{lon} {lat} {ve} {vn} {sve} {svn} {corr} {site}\n"));
            }
            // Vertical files carry the up component in the east slot; draw it
            // as a north-pointing vector with its own uncertainty.
            VelocityClass::Vertical => {
                vectors.push_str(&format!("{lon} {lat} 0 {ve} 0 {sve} 0 {site}\n"));
            }
        }
        labels.push_str(&format!("{lon} {lat} {site}\n"));
    }

    Ok(VelocityRows {
        markers,
        vectors,
        labels,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/lower.rs"]
mod tests;
