//! plotmap - transit-style map diagrams from YAML
//!
//! This library reads a small YAML description of roads, plots and labels
//! and renders it as a static SVG image.
//!
//! # Example
//!
//! ```rust
//! use plotmap::render;
//!
//! let svg = render("roads: [[{x: 0, y: 0}, {x: 10, y: 0}]]").unwrap();
//! assert!(svg.contains(r#"points="0,0 10,0""#));
//! ```

pub mod error;
pub mod geometry;
pub mod model;
pub mod raster;
pub mod renderer;
pub mod stylesheet;

pub use error::ParseError;
pub use geometry::{BoundingBox, Point};
pub use model::{parse, MapDocument};
pub use raster::{rasterize, RasterConfig, RasterError};
pub use renderer::{render_svg, CanvasSize, SvgConfig};
pub use stylesheet::{Style, Stylesheet, StylesheetError};

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while converting a map file
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Base drawing style
    pub stylesheet: Stylesheet,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the stylesheet
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }
}

/// Render YAML source to SVG with default configuration
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, &RenderConfig::default())
}

/// Render YAML source to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use plotmap::{render_with_config, CanvasSize, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_svg(SvgConfig::default().with_canvas(CanvasSize::Fit { padding: 10.0 }));
///
/// let svg = render_with_config("roads: [[[0, 0], [50, 20]]]", &config).unwrap();
/// assert!(svg.contains(r#"viewBox="-10 -10 70 40""#));
/// ```
pub fn render_with_config(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let doc = parse(source)?;
    Ok(render_svg(&doc, &config.svg, &config.stylesheet))
}

/// Read `input`, render it and write the SVG to `output`
///
/// The output is written to a temporary file next to `output` and renamed
/// into place, so on any error an existing `output` is left untouched.
pub fn convert_file(input: &Path, output: &Path, config: &RenderConfig) -> Result<(), RenderError> {
    let source = std::fs::read_to_string(input).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => RenderError::InputNotFound(input.to_path_buf()),
        _ => RenderError::Read {
            path: input.to_path_buf(),
            source: e,
        },
    })?;

    let svg = render_with_config(&source, config)?;
    log::debug!("rendered {} bytes of SVG", svg.len());

    write_atomic(output, svg.as_bytes()).map_err(|e| RenderError::Write {
        path: output.to_path_buf(),
        source: e,
    })
}

fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    // tempfile defaults to 0600; a fresh output gets the usual 0644 less umask
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
