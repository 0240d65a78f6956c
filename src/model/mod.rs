//! Map document model and YAML loading
//!
//! The input is YAML (which also accepts plain JSON). Every top-level
//! section is optional.

pub mod document;

pub use document::{
    Decoration, DecorationShape, Group, Key, KeyItem, Label, Legend, LegendItem, MapDocument,
    MarkerShape, Meta, Plot, Road, Scalar, StyleOverrides, TextAnchor,
};

use crate::error::ParseError;

/// Parse a map document from YAML source
pub fn parse(source: &str) -> Result<MapDocument, ParseError> {
    if source.trim().is_empty() {
        return Ok(MapDocument::default());
    }

    let doc: Option<MapDocument> = serde_yaml::from_str(source).map_err(ParseError::from)?;
    let doc = doc.unwrap_or_default();

    log::debug!(
        "parsed map: {} roads, {} plots, {} labels, {} decorations",
        doc.roads.len(),
        doc.plots.len(),
        doc.labels.len(),
        doc.decorations.len()
    );

    Ok(doc)
}
