use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use velomap::{
    Defaults, GmtRenderer, MagickRasterizer, Overrides, Palette, Region, VelomapError,
};

/// Render a composite GPS velocity / strain-rate map with GMT.
///
/// All drawing is delegated to the system `gmt` binary; JPEG export uses
/// ImageMagick `convert`. With no arguments, usage is shown and the process
/// exits non-success.
#[derive(Parser, Debug)]
#[command(name = "velomap", version, arg_required_else_help = true)]
struct Cli {
    /// Defaults source file (JSON key-value parameters, required to exist).
    #[arg(long, default_value = "velomap.defaults.json")]
    defaults: PathBuf,

    /// Geographic window as west/east/south/north degrees.
    #[arg(long, short = 'R')]
    region: Option<Region>,

    /// Mercator projection scale in cm per degree.
    #[arg(long)]
    scale: Option<f64>,

    /// Frame annotation spec (the -B payload, e.g. a4f2).
    #[arg(long)]
    frame: Option<String>,

    /// Map title.
    #[arg(long)]
    title: Option<String>,

    /// Horizontal velocity file (10 whitespace-delimited fields per row);
    /// repeat for multiple datasets, drawn in the given order.
    #[arg(long = "horizontal", short = 'H', value_name = "FILE")]
    horizontal: Vec<PathBuf>,

    /// Vertical velocity file; repeat for multiple datasets.
    #[arg(long = "vertical", short = 'U', value_name = "FILE")]
    vertical: Vec<PathBuf>,

    /// Velocity vector scale in cm per mm/yr.
    #[arg(long)]
    velocity_scale: Option<f64>,

    /// Strain-rate input file (7 fields per row).
    #[arg(long, value_name = "FILE")]
    strain: Option<PathBuf>,

    /// Strain axis scale in cm per 100 nstrain/yr.
    #[arg(long)]
    strain_scale: Option<f64>,

    /// Draw shaded topography/bathymetry under the basemap.
    #[arg(long, short = 'T')]
    topography: bool,

    /// Draw the fault trace catalogue.
    #[arg(long, short = 'F')]
    faults: bool,

    /// Label stations with their site ids.
    #[arg(long)]
    labels: bool,

    /// Draw the dataset legend box.
    #[arg(long)]
    legend: bool,

    /// Place the logo on the finished map.
    #[arg(long)]
    logo: bool,

    /// Rasterize the finished map to JPEG.
    #[arg(long)]
    jpeg: bool,

    /// Output base name; derives {base}.ps and {base}.jpg.
    #[arg(long, short = 'o', value_name = "BASE")]
    out: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(outputs) => {
            eprintln!("wrote {}", outputs.vector.display());
            if let Some(raster) = outputs.raster {
                eprintln!("wrote {}", raster.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(exit_status(&err))
        }
    }
}

fn run(cli: Cli) -> velomap::VelomapResult<velomap::FinalOutputs> {
    let defaults = Defaults::from_path(&cli.defaults)?;
    let overrides = Overrides {
        region: cli.region,
        scale: cli.scale,
        frame: cli.frame,
        title: cli.title,
        horizontal_files: cli.horizontal,
        vertical_files: cli.vertical,
        velocity_scale: cli.velocity_scale,
        strain_file: cli.strain,
        strain_scale: cli.strain_scale,
        topography: cli.topography,
        faults: cli.faults,
        labels: cli.labels,
        legend: cli.legend,
        logo: cli.logo,
        jpeg: cli.jpeg,
        out_base: cli.out,
    };

    let cfg = velomap::resolve(&defaults, overrides, &Palette::default())?;
    let mut renderer = GmtRenderer::new();
    let mut rasterizer = MagickRasterizer::new(defaults.jpeg_density);
    velomap::render_map(&cfg, &mut renderer, &mut rasterizer)
}

/// Draw-call failures propagate the external command's status; everything
/// else exits 1.
fn exit_status(err: &VelomapError) -> u8 {
    match err {
        VelomapError::DrawCall { status, .. } => (*status).clamp(1, 255) as u8,
        _ => 1,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
