use super::*;

use std::path::PathBuf;

use crate::config::resolve::ScratchPaths;
use crate::foundation::core::{Color, Region};

fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_lower").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_velocity(dir: &std::path::Path, name: &str) -> DatasetFile {
    let path = dir.join(name);
    std::fs::write(
        &path,
        "ANKR 39.887 32.758 2.1 -0.4 0.8 0.9 0.02 1995.0 2020.5\n\
         ISTA 41.104 29.019 1.5 -3.2 0.7 0.8 0.01 1999.2 2020.5\n",
    )
    .unwrap();
    DatasetFile {
        path,
        fields: 10,
        rows: 2,
    }
}

fn bare_cfg(dir: &std::path::Path) -> RunConfiguration {
    let base = dir.join("map").display().to_string();
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
        artifact_path: PathBuf::from(format!("{base}.ps")),
        raster_path: PathBuf::from(format!("{base}.jpg")),
        scratch: ScratchPaths::for_base(&base),
    }
}

fn artifact_mode(call: &DrawCall) -> Option<(WriteMode, bool)> {
    match &call.target {
        CallTarget::Artifact { mode, keep_open } => Some((*mode, *keep_open)),
        CallTarget::Scratch(_) => None,
    }
}

#[test]
fn velocity_rows_reorder_site_first_layout_to_lon_lat_first() {
    let dir = fixture_dir("rows");
    let ds = write_velocity(&dir, "gps.vel");
    let rows = velocity_rows(&ds, VelocityClass::Horizontal).unwrap();

    assert_eq!(
        rows.vectors.lines().next().unwrap(),
        "32.758 39.887 2.1 -0.4 0.8 0.9 0.02 ANKR"
    );
    assert_eq!(rows.markers.lines().next().unwrap(), "32.758 39.887");
    assert_eq!(rows.labels.lines().next().unwrap(), "32.758 39.887 ANKR");
    assert_eq!(rows.vectors.lines().count(), 2);
}

#[test]
fn vertical_rows_draw_the_up_component_as_north() {
    let dir = fixture_dir("vertical_rows");
    let ds = write_velocity(&dir, "up.vel");
    let rows = velocity_rows(&ds, VelocityClass::Vertical).unwrap();
    assert_eq!(
        rows.vectors.lines().next().unwrap(),
        "32.758 39.887 0 2.1 0 0.8 0 ANKR"
    );
}

#[test]
fn coastline_basemap_is_one_create_call() {
    let dir = fixture_dir("coastline");
    let mut cfg = bare_cfg(&dir);
    cfg.title = Some("Anatolia".to_string());
    let calls = Lowering::new(&cfg)
        .lower(Layer::Basemap(BasemapKind::Coastline))
        .unwrap();

    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].op, "pscoast");
    assert_eq!(artifact_mode(&calls[0]), Some((WriteMode::Create, true)));
    assert!(calls[0].args.contains(&"-R18/47/32/45".to_string()));
    assert!(calls[0].args.contains(&"-Jm0.6c".to_string()));
    assert!(calls[0].args.contains(&"-Ba4f2".to_string()));
    assert!(calls[0].args.contains(&"-B+tAnatolia".to_string()));
}

#[test]
fn topography_composite_is_eight_ordered_calls() {
    let dir = fixture_dir("topo");
    let mut cfg = bare_cfg(&dir);
    cfg.topography = Some(crate::config::resolve::TopographyAssets {
        bathymetry: dir.join("bathy.grd"),
        topography: dir.join("topo.grd"),
        illumination: Some(dir.join("illum.grd")),
    });
    let calls = Lowering::new(&cfg)
        .lower(Layer::Basemap(BasemapKind::Topography))
        .unwrap();

    let ops: Vec<&str> = calls.iter().map(|c| c.op.as_str()).collect();
    assert_eq!(
        ops,
        [
            "makecpt", "grdimage", "pscoast", "makecpt", "grdimage", "pscoast", "psbasemap",
            "pscoast"
        ]
    );

    // Color tables go to scratch files, not into the page.
    assert!(matches!(calls[0].target, CallTarget::Scratch(_)));
    assert!(matches!(calls[3].target, CallTarget::Scratch(_)));
    // The bathymetry raster performs the only create-mode write.
    assert_eq!(artifact_mode(&calls[1]), Some((WriteMode::Create, true)));
    for call in &calls[2..] {
        assert_ne!(artifact_mode(call), Some((WriteMode::Create, true)));
    }
    // Illumination reaches both raster fills.
    let illum = format!("-I{}", dir.join("illum.grd").display());
    assert!(calls[1].args.contains(&illum));
    assert!(calls[4].args.contains(&illum));
}

#[test]
fn velocity_layer_emits_markers_then_two_vector_passes() {
    let dir = fixture_dir("velocity");
    let mut cfg = bare_cfg(&dir);
    cfg.horizontal = vec![crate::config::resolve::VelocityDataset {
        data: write_velocity(&dir, "gps.vel"),
        color: Color("red"),
    }];

    let calls = Lowering::new(&cfg)
        .lower(Layer::HorizontalVelocity { index: 0 })
        .unwrap();
    let ops: Vec<&str> = calls.iter().map(|c| c.op.as_str()).collect();
    assert_eq!(ops, ["psxy", "psvelo", "psvelo"]);

    // Wide translucent pass first, narrow solid pass second.
    assert!(calls[1].args.iter().any(|a| a == "-W4p,red@70"));
    assert!(calls[2].args.iter().any(|a| a == "-W0.8p,red"));
    for call in &calls {
        assert!(matches!(call.input, CallInput::Inline(_)));
        assert_eq!(artifact_mode(call), Some((WriteMode::Append, true)));
    }
}

#[test]
fn labels_toggle_adds_the_text_pass() {
    let dir = fixture_dir("labels");
    let mut cfg = bare_cfg(&dir);
    cfg.labels = true;
    cfg.horizontal = vec![crate::config::resolve::VelocityDataset {
        data: write_velocity(&dir, "gps.vel"),
        color: Color("blue"),
    }];

    let calls = Lowering::new(&cfg)
        .lower(Layer::HorizontalVelocity { index: 0 })
        .unwrap();
    assert_eq!(calls.last().unwrap().op, "pstext");
    match &calls.last().unwrap().input {
        CallInput::Inline(rows) => assert!(rows.contains("ANKR")),
        other => panic!("expected inline labels, got {other:?}"),
    }
}

#[test]
fn strain_layer_is_axes_glyphs_then_label() {
    let dir = fixture_dir("strain");
    let strain_path = dir.join("strain.dat");
    std::fs::write(&strain_path, "32.0 39.0 12 -44 35 3 ANKR\n").unwrap();
    let mut cfg = bare_cfg(&dir);
    cfg.strain = Some(crate::config::resolve::StrainConfig {
        data: DatasetFile {
            path: strain_path.clone(),
            fields: 7,
            rows: 1,
        },
        scale: 0.4,
    });

    let calls = Lowering::new(&cfg).lower(Layer::Strain).unwrap();
    let ops: Vec<&str> = calls.iter().map(|c| c.op.as_str()).collect();
    assert_eq!(ops, ["psvelo", "psvelo", "psvelo", "psvelo", "pstext"]);
    assert_eq!(calls[0].input, CallInput::File(strain_path.clone()));
    assert_eq!(calls[1].input, CallInput::File(strain_path));
    assert!(matches!(calls[2].input, CallInput::Inline(_)));
    assert!(matches!(calls[3].input, CallInput::Inline(_)));
}

#[test]
fn legend_writes_the_scratch_descriptor() {
    let dir = fixture_dir("legend");
    let mut cfg = bare_cfg(&dir);
    cfg.legend = true;
    cfg.horizontal = vec![crate::config::resolve::VelocityDataset {
        data: write_velocity(&dir, "campaign.vel"),
        color: Color("blue"),
    }];

    let calls = Lowering::new(&cfg).lower(Layer::Legend).unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].op, "pslegend");
    assert_eq!(
        calls[0].input,
        CallInput::File(cfg.scratch.legend_spec.clone())
    );
    let spec = std::fs::read_to_string(&cfg.scratch.legend_spec).unwrap();
    assert!(spec.contains("campaign"));
    assert!(spec.contains("blue"));
}

#[test]
fn close_layer_is_the_only_closing_write() {
    let dir = fixture_dir("close");
    let cfg = bare_cfg(&dir);
    let calls = Lowering::new(&cfg).lower(Layer::Close).unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].args.contains(&"-T".to_string()));
    assert_eq!(artifact_mode(&calls[0]), Some((WriteMode::Append, false)));
}
