use super::*;

use std::path::PathBuf;

use crate::config::resolve::{ScratchPaths, StrainConfig, TopographyAssets, VelocityDataset};
use crate::foundation::core::{Color, Region};
use crate::input::dataset::DatasetFile;

fn dataset(name: &str) -> DatasetFile {
    DatasetFile {
        path: PathBuf::from(name),
        fields: 10,
        rows: 2,
    }
}

fn velocity(name: &str, color: &'static str) -> VelocityDataset {
    VelocityDataset {
        data: dataset(name),
        color: Color(color),
    }
}

fn bare_cfg() -> RunConfiguration {
    RunConfiguration {
        region: Region {
            west: 18.0,
            east: 47.0,
            south: 32.0,
            north: 45.0,
        },
        scale: 0.6,
        frame: "a4f2".to_string(),
        title: None,
        topography: None,
        faults: None,
        horizontal: Vec::new(),
        vertical: Vec::new(),
        velocity_scale: 0.05,
        strain: None,
        labels: false,
        legend: false,
        logo: None,
        jpeg: None,
        artifact_path: PathBuf::from("map.ps"),
        raster_path: PathBuf::from("map.jpg"),
        scratch: ScratchPaths::for_base("map"),
    }
}

#[test]
fn all_toggles_off_plans_basemap_and_close_only() {
    let plan = compile_plan(&bare_cfg());
    assert_eq!(
        plan.layers,
        vec![Layer::Basemap(BasemapKind::Coastline), Layer::Close]
    );
}

#[test]
fn topography_selects_the_composite_basemap() {
    let mut cfg = bare_cfg();
    cfg.topography = Some(TopographyAssets {
        bathymetry: PathBuf::from("bathy.grd"),
        topography: PathBuf::from("topo.grd"),
        illumination: None,
    });
    let plan = compile_plan(&cfg);
    assert_eq!(plan.layers[0], Layer::Basemap(BasemapKind::Topography));
}

#[test]
fn full_plan_orders_layers_by_visual_stacking() {
    let mut cfg = bare_cfg();
    cfg.topography = Some(TopographyAssets {
        bathymetry: PathBuf::from("bathy.grd"),
        topography: PathBuf::from("topo.grd"),
        illumination: None,
    });
    cfg.faults = Some(PathBuf::from("faults.dat"));
    cfg.horizontal = vec![velocity("h0.vel", "blue"), velocity("h1.vel", "red")];
    cfg.vertical = vec![velocity("v0.vel", "blue")];
    cfg.strain = Some(StrainConfig {
        data: DatasetFile {
            path: PathBuf::from("strain.dat"),
            fields: 7,
            rows: 3,
        },
        scale: 0.4,
    });
    cfg.legend = true;
    cfg.logo = Some(PathBuf::from("logo.eps"));

    let plan = compile_plan(&cfg);
    assert_eq!(
        plan.layers,
        vec![
            Layer::Basemap(BasemapKind::Topography),
            Layer::Faults,
            Layer::HorizontalVelocity { index: 0 },
            Layer::HorizontalVelocity { index: 1 },
            Layer::HorizontalScaleBar,
            Layer::VerticalVelocity { index: 0 },
            Layer::VerticalScaleBar,
            Layer::Strain,
            Layer::Legend,
            Layer::Logo,
            Layer::Close,
        ]
    );
}

#[test]
fn scale_bars_only_follow_non_empty_classes() {
    let mut cfg = bare_cfg();
    cfg.vertical = vec![velocity("v0.vel", "blue")];
    let plan = compile_plan(&cfg);
    assert!(!plan.layers.contains(&Layer::HorizontalScaleBar));
    assert!(plan.layers.contains(&Layer::VerticalScaleBar));
}

#[test]
fn every_plan_starts_with_a_basemap_and_ends_with_close() {
    for with_extras in [false, true] {
        let mut cfg = bare_cfg();
        if with_extras {
            cfg.faults = Some(PathBuf::from("faults.dat"));
            cfg.legend = true;
        }
        let plan = compile_plan(&cfg);
        assert!(matches!(plan.layers.first(), Some(Layer::Basemap(_))));
        assert_eq!(plan.layers.last(), Some(&Layer::Close));
        let basemaps = plan
            .layers
            .iter()
            .filter(|l| matches!(l, Layer::Basemap(_)))
            .count();
        let closes = plan.layers.iter().filter(|l| **l == Layer::Close).count();
        assert_eq!((basemaps, closes), (1, 1));
    }
}
