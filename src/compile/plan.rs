use crate::config::resolve::RunConfiguration;

/// Basemap flavor: plain coastline, or the shaded relief composite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BasemapKind {
    /// Single coastline call with flat land/sea fills.
    Coastline,
    /// Ordered multi-call composite: bathymetry color table, bathymetry
    /// raster, sea mask, land color table, land raster, land mask,
    /// grid/frame, coastline outline.
    Topography,
}

/// One layer descriptor in the ordered rendering plan.
///
/// Per-file velocity layers carry the dataset's position in the
/// user-supplied order; the configuration holds the file and color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// First layer of every plan; the only create-mode write.
    Basemap(BasemapKind),
    /// Fault trace catalogue.
    Faults,
    /// One horizontal velocity dataset.
    HorizontalVelocity {
        /// Position in the user-supplied file order.
        index: usize,
    },
    /// Fixed scale-bar glyph for the horizontal class, after all datasets.
    HorizontalScaleBar,
    /// One vertical velocity dataset.
    VerticalVelocity {
        /// Position in the user-supplied file order.
        index: usize,
    },
    /// Fixed scale-bar glyph for the vertical class, after all datasets.
    VerticalScaleBar,
    /// Strain-rate principal axes plus scale glyphs and label.
    Strain,
    /// Dataset legend box.
    Legend,
    /// Logo raster.
    Logo,
    /// Closing sentinel; the only write that closes the page.
    Close,
}

/// Ordered sequence of enabled layers for one run.
///
/// Invariants: exactly one basemap-class layer first, exactly one
/// [`Layer::Close`] last. Layer order is visual stacking order and is
/// load-bearing; the orchestrator interprets the plan without reordering.
#[derive(Clone, Debug)]
pub struct LayerPlan {
    /// Layers in emission order.
    pub layers: Vec<Layer>,
}

impl LayerPlan {
    /// Number of layers, closing sentinel included.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// A plan always carries at least basemap + close.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Derive the layer plan from a resolved configuration.
///
/// Disabled stages are skipped entirely; a run with every toggle off still
/// plans the basemap and the closing sentinel.
#[tracing::instrument(skip(cfg))]
pub fn compile_plan(cfg: &RunConfiguration) -> LayerPlan {
    let mut layers = Vec::new();

    layers.push(Layer::Basemap(if cfg.topography.is_some() {
        BasemapKind::Topography
    } else {
        BasemapKind::Coastline
    }));

    if cfg.faults.is_some() {
        layers.push(Layer::Faults);
    }

    for index in 0..cfg.horizontal.len() {
        layers.push(Layer::HorizontalVelocity { index });
    }
    if !cfg.horizontal.is_empty() {
        layers.push(Layer::HorizontalScaleBar);
    }

    for index in 0..cfg.vertical.len() {
        layers.push(Layer::VerticalVelocity { index });
    }
    if !cfg.vertical.is_empty() {
        layers.push(Layer::VerticalScaleBar);
    }

    if cfg.strain.is_some() {
        layers.push(Layer::Strain);
    }
    if cfg.legend {
        layers.push(Layer::Legend);
    }
    if cfg.logo.is_some() {
        layers.push(Layer::Logo);
    }

    layers.push(Layer::Close);
    LayerPlan { layers }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
