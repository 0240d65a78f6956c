//! Stylesheet system for map drawing styles
//!
//! A stylesheet holds the base colours, widths and fonts used when the map
//! document does not say otherwise. Stylesheets are TOML files so one theme
//! can be shared across many maps.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{MarkerShape, StyleOverrides};

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Fully resolved drawing style
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub road_stroke: String,
    pub road_width: f64,
    pub plot_fill: String,
    pub plot_stroke: String,
    pub plot_text: String,
    pub plot_marker: MarkerShape,
    pub label_text: String,
    pub label_font: String,
    pub name_font: String,
    pub legend_font: String,
}

impl Style {
    /// Apply overrides on top of this style, returning the merged result
    pub fn merged(&self, overrides: &StyleOverrides) -> Style {
        fn pick(over: &Option<String>, base: &str) -> String {
            over.clone().unwrap_or_else(|| base.to_string())
        }

        Style {
            road_stroke: pick(&overrides.road_stroke, &self.road_stroke),
            road_width: overrides.road_width.unwrap_or(self.road_width),
            plot_fill: pick(&overrides.plot_fill, &self.plot_fill),
            plot_stroke: pick(&overrides.plot_stroke, &self.plot_stroke),
            plot_text: pick(&overrides.plot_text, &self.plot_text),
            plot_marker: overrides.plot_marker.unwrap_or(self.plot_marker),
            label_text: pick(&overrides.label_text, &self.label_text),
            label_font: pick(&overrides.label_font, &self.label_font),
            name_font: pick(&overrides.name_font, &self.name_font),
            legend_font: pick(&overrides.legend_font, &self.legend_font),
        }
    }
}

/// A named theme: metadata plus the base style
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    pub style: Style,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    style: StyleOverrides,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Transit-map look: dark grey roads, white square plots, navy text
fn base_style() -> Style {
    Style {
        road_stroke: "#4a4a4a".to_string(),
        road_width: 8.0,
        plot_fill: "#ffffff".to_string(),
        plot_stroke: "#1b1b1b".to_string(),
        plot_text: "#1b1b1b".to_string(),
        plot_marker: MarkerShape::Square,
        label_text: "#1d2a44".to_string(),
        label_font: "Helvetica, Arial, sans-serif".to_string(),
        name_font: "Helvetica, Arial, sans-serif".to_string(),
        legend_font: "Helvetica, Arial, sans-serif".to_string(),
    }
}

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    ///
    /// Keys missing from the `[style]` table keep their built-in values.
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            style: base_style().merged(&parsed.style),
        })
    }

    /// Resolve the style for one document: document values win
    pub fn resolve(&self, overrides: &StyleOverrides) -> Style {
        self.style.merged(overrides)
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            style: base_style(),
        }
    }
}
