//! SVG renderer for map documents
//!
//! This module takes a parsed MapDocument and produces an SVG string.
//! Output depends only on the document and configuration, so identical
//! input always renders to identical bytes.

pub mod config;
pub mod svg;

pub use config::{CanvasSize, SvgConfig};
pub use svg::{render_svg, SvgBuilder};
