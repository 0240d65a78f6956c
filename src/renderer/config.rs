//! Configuration for SVG rendering

/// How the canvas size is chosen when the document does not fix it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasSize {
    /// Canvas of exactly this size, origin at the top-left corner
    Fixed { width: f64, height: f64 },
    /// Canvas covering all drawn content plus padding on every side
    Fit { padding: f64 },
}

impl Default for CanvasSize {
    fn default() -> Self {
        CanvasSize::Fixed {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Configuration options for SVG output
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Canvas sizing when `meta.width`/`meta.height` are absent
    pub canvas: CanvasSize,

    /// Background fill used when the document sets none
    pub background: Option<String>,

    /// Whether to include the XML declaration
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            background: None,
            standalone: true,
            pretty_print: true,
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how the canvas is sized
    pub fn with_canvas(mut self, canvas: CanvasSize) -> Self {
        self.canvas = canvas;
        self
    }

    /// Set the fallback background colour
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// Set whether output is standalone
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}
