//! plotmap CLI
//!
//! Usage:
//!   plotmap [OPTIONS]
//!
//! With no arguments, reads `map.yaml` and writes `output.svg` in the
//! current directory.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use plotmap::{
    convert_file, rasterize, CanvasSize, RasterConfig, RasterError, RenderConfig, RenderError,
    Stylesheet, SvgConfig,
};

#[derive(Parser)]
#[command(name = "plotmap")]
#[command(version)]
#[command(about = "Render a YAML map description to a transit-style SVG")]
struct Cli {
    /// Map description (YAML or JSON)
    #[arg(short, long, default_value = "map.yaml")]
    input: PathBuf,

    /// SVG output file (overwritten)
    #[arg(short, long, default_value = "output.svg")]
    output: PathBuf,

    /// Stylesheet file with base drawing style (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Canvas width when the map sets none
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Canvas height when the map sets none
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Size the canvas to the drawn content instead
    #[arg(long)]
    fit: bool,

    /// Padding around content with --fit
    #[arg(long, default_value_t = 40.0)]
    padding: f64,

    /// Background colour when the map sets none
    #[arg(long)]
    background: Option<String>,

    /// Write the SVG without indentation or newlines
    #[arg(long)]
    compact: bool,

    /// Also write a bitmap to this path using an external rasterizer
    #[arg(long, value_name = "PNG")]
    raster: Option<PathBuf>,

    /// Rasterizer program, called as `<tool> -o <png> <svg>`
    #[arg(long, default_value = "rsvg-convert")]
    raster_tool: String,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Stylesheet::default(),
    };

    let canvas = if cli.fit {
        CanvasSize::Fit {
            padding: cli.padding,
        }
    } else {
        CanvasSize::Fixed {
            width: cli.width,
            height: cli.height,
        }
    };
    let mut svg = SvgConfig::new()
        .with_canvas(canvas)
        .with_pretty_print(!cli.compact);
    if let Some(bg) = &cli.background {
        svg = svg.with_background(bg.clone());
    }

    let config = RenderConfig::new().with_svg(svg).with_stylesheet(stylesheet);

    if let Err(e) = convert_file(&cli.input, &cli.output, &config) {
        report(&cli, &e);
        std::process::exit(1);
    }
    println!(
        "Rendered {} from {}",
        cli.output.display(),
        cli.input.display()
    );

    if let Some(png) = &cli.raster {
        match rasterize(&cli.output, png, &RasterConfig::new(&cli.raster_tool)) {
            Ok(path) => println!("Rasterized {}", path.display()),
            Err(RasterError::ToolMissing(tool)) => {
                log::warn!("skipping raster output: '{}' is not installed", tool)
            }
            Err(e) => log::warn!("raster output failed: {}", e),
        }
    }
}

/// Print a conversion error, with source context for parse errors
fn report(cli: &Cli, err: &RenderError) {
    if let RenderError::Parse(parse_err) = err {
        if let Ok(source) = fs::read_to_string(&cli.input) {
            let filename = cli.input.display().to_string();
            eprint!("{}", parse_err.format(&source, &filename));
            return;
        }
    }
    eprintln!("Error: {}", err);
}
