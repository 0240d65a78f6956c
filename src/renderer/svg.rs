//! SVG generation from map documents

use std::collections::HashMap;
use std::fmt;

use crate::geometry::{format_points, BoundingBox, BoundsTracker, Point};
use crate::model::{
    Decoration, DecorationShape, Group, Key, Label, Legend, MapDocument, MarkerShape, Plot, Road,
};
use crate::stylesheet::{Style, Stylesheet};

use super::{CanvasSize, SvgConfig};

/// Half the side of a square plot marker (and the radius of a round one)
const PLOT_MARKER_HALF: f64 = 12.0;

/// Attribute list written as ` name="value"` pairs with escaped values
#[derive(Debug, Clone, Default)]
pub struct Attrs(Vec<(&'static str, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &'static str, value: impl ToString) -> Self {
        self.0.push((name, value.to_string()));
        self
    }

    /// Set the attribute only when a value is present
    pub fn set_opt(self, name: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.set(name, v),
            None => self,
        }
    }

    pub fn extend(mut self, other: Attrs) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl fmt::Display for Attrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.0 {
            write!(f, r#" {}="{}""#, name, escape_xml(value))?;
        }
        Ok(())
    }
}

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    elements: Vec<String>,
    indent: usize,
    bounds: BoundsTracker,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            elements: vec![],
            indent: 1,
            bounds: BoundsTracker::new(),
        }
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn push_empty(&mut self, tag: &str, attrs: &Attrs) {
        let line = format!("{}<{}{}/>", self.indent_str(), tag, attrs);
        self.elements.push(line);
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64, extra: Attrs) {
        self.bounds.include_box(BoundingBox::new(x, y, w, h));
        let attrs = Attrs::new()
            .set("x", x)
            .set("y", y)
            .set("width", w)
            .set("height", h)
            .extend(extra);
        self.push_empty("rect", &attrs);
    }

    /// Add a circle element
    pub fn add_circle(&mut self, center: Point, r: f64, extra: Attrs) {
        self.bounds
            .include_box(BoundingBox::new(center.x - r, center.y - r, 2.0 * r, 2.0 * r));
        let attrs = Attrs::new()
            .set("cx", center.x)
            .set("cy", center.y)
            .set("r", r)
            .extend(extra);
        self.push_empty("circle", &attrs);
    }

    /// Add a polyline element
    pub fn add_polyline(&mut self, points: &[Point], extra: Attrs) {
        for p in points {
            self.bounds.include_point(*p);
        }
        let attrs = Attrs::new().set("points", format_points(points)).extend(extra);
        self.push_empty("polyline", &attrs);
    }

    /// Add a polygon element
    pub fn add_polygon(&mut self, points: &[Point], extra: Attrs) {
        for p in points {
            self.bounds.include_point(*p);
        }
        let attrs = Attrs::new().set("points", format_points(points)).extend(extra);
        self.push_empty("polygon", &attrs);
    }

    /// Add a line element
    pub fn add_line(&mut self, from: Point, to: Point, extra: Attrs) {
        self.bounds.include_point(from);
        self.bounds.include_point(to);
        let attrs = Attrs::new()
            .set("x1", from.x)
            .set("y1", from.y)
            .set("x2", to.x)
            .set("y2", to.y)
            .extend(extra);
        self.push_empty("line", &attrs);
    }

    /// Add an image element referencing `href`
    pub fn add_image(&mut self, href: &str, bounds: BoundingBox, extra: Attrs) {
        self.bounds.include_box(bounds);
        let attrs = Attrs::new()
            .set("href", href)
            .set("x", bounds.x)
            .set("y", bounds.y)
            .set("width", bounds.width)
            .set("height", bounds.height)
            .extend(extra);
        self.push_empty("image", &attrs);
    }

    /// Add a text element; only its anchor point counts toward the bounds
    pub fn add_text(&mut self, text: &str, at: Point, extra: Attrs) {
        self.bounds.include_point(at);
        let attrs = Attrs::new().set("x", at.x).set("y", at.y).extend(extra);
        self.elements.push(format!(
            "{}<text{}>{}</text>",
            self.indent_str(),
            attrs,
            escape_xml(text)
        ));
    }

    /// Open a group element
    pub fn start_group(&mut self, attrs: Attrs) {
        self.elements
            .push(format!("{}<g{}>", self.indent_str(), attrs));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// The area the document covers for the given canvas sizing
    pub fn viewbox(&self, canvas: CanvasSize) -> BoundingBox {
        match canvas {
            CanvasSize::Fixed { width, height } => BoundingBox::new(0.0, 0.0, width, height),
            CanvasSize::Fit { padding } => self
                .bounds
                .clone()
                .finish()
                .unwrap_or_else(BoundingBox::zero)
                .inflate(padding),
        }
    }

    /// Build the final SVG string
    pub fn build(self, canvas: CanvasSize, background: Option<&str>) -> String {
        let viewbox = self.viewbox(canvas);
        let nl = self.newline();
        let inner_indent = if self.config.pretty_print { "  " } else { "" };

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="{} {} {} {}">"#,
            viewbox.width, viewbox.height, viewbox.x, viewbox.y, viewbox.width, viewbox.height
        ));
        svg.push_str(nl);

        if let Some(fill) = background {
            let attrs = Attrs::new()
                .set("x", viewbox.x)
                .set("y", viewbox.y)
                .set("width", viewbox.width)
                .set("height", viewbox.height)
                .set("fill", fill);
            svg.push_str(&format!("{}<rect{}/>", inner_indent, attrs));
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg.push_str(nl);

        svg
    }
}

/// Render a map document to an SVG string
///
/// Sections are drawn bottom to top: roads, plots, decorations, labels,
/// key, legend. Within a section elements keep their declaration order.
pub fn render_svg(doc: &MapDocument, config: &SvgConfig, stylesheet: &Stylesheet) -> String {
    let style = stylesheet.resolve(&doc.style);

    // later definitions of the same id replace earlier ones
    let groups: HashMap<&str, &Group> = doc.groups.iter().map(|g| (g.id.as_str(), g)).collect();

    let mut builder = SvgBuilder::new(config.clone());

    render_roads(&doc.roads, &style, &mut builder);
    render_plots(&doc.plots, &groups, &style, &mut builder);
    render_decorations(&doc.decorations, &mut builder);
    render_labels(&doc.labels, &style, &mut builder);
    if let Some(key) = &doc.key {
        render_key(key, &style, &mut builder);
    }
    if let Some(legend) = &doc.legend {
        render_legend(legend, &groups, &style, &mut builder);
    }

    let canvas = resolve_canvas(doc, config.canvas);
    let background = doc
        .meta
        .background
        .as_deref()
        .or(config.background.as_deref());

    builder.build(canvas, background)
}

/// Document dimensions take precedence over the configured canvas
fn resolve_canvas(doc: &MapDocument, configured: CanvasSize) -> CanvasSize {
    match (doc.meta.width, doc.meta.height, configured) {
        (Some(width), Some(height), _) => CanvasSize::Fixed { width, height },
        (w, h, CanvasSize::Fixed { width, height }) => CanvasSize::Fixed {
            width: w.unwrap_or(width),
            height: h.unwrap_or(height),
        },
        (_, _, fit) => fit,
    }
}

fn render_roads(roads: &[Road], style: &Style, builder: &mut SvgBuilder) {
    if roads.is_empty() {
        return;
    }

    builder.start_group(
        Attrs::new()
            .set("class", "roads")
            .set("fill", "none")
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round"),
    );
    for road in roads {
        let stroke = road.color.as_deref().unwrap_or(&style.road_stroke);
        let width = road.width.unwrap_or(style.road_width);
        builder.add_polyline(
            &road.points,
            Attrs::new()
                .set("class", "road")
                .set("stroke", stroke)
                .set("stroke-width", width),
        );
    }
    builder.end_group();
}

fn render_plots(
    plots: &[Plot],
    groups: &HashMap<&str, &Group>,
    style: &Style,
    builder: &mut SvgBuilder,
) {
    if plots.is_empty() {
        return;
    }

    builder.start_group(Attrs::new().set("class", "plots"));
    for plot in plots {
        let group = match plot.group.as_deref() {
            Some(id) => {
                let found = groups.get(id).copied();
                if found.is_none() {
                    log::warn!("plot {} references unknown group '{}'", plot.id, id);
                }
                found
            }
            None => None,
        };
        let (fill, text_color) = match group {
            Some(g) => (g.color.as_str(), g.text.as_deref().unwrap_or("#ffffff")),
            None => (style.plot_fill.as_str(), style.plot_text.as_str()),
        };

        let at = plot.position();
        let marker = Attrs::new()
            .set("class", "plot")
            .set("fill", fill)
            .set("stroke", &style.plot_stroke)
            .set("stroke-width", 2);
        match style.plot_marker {
            MarkerShape::Square => builder.add_rect(
                at.x - PLOT_MARKER_HALF,
                at.y - PLOT_MARKER_HALF,
                2.0 * PLOT_MARKER_HALF,
                2.0 * PLOT_MARKER_HALF,
                Attrs::new().set("rx", 4).extend(marker),
            ),
            MarkerShape::Circle => builder.add_circle(at, PLOT_MARKER_HALF, marker),
        }

        builder.add_text(
            plot.id.as_str(),
            Point::new(at.x, at.y + 6.0),
            Attrs::new()
                .set("class", "plot-id")
                .set("text-anchor", "middle")
                .set("font-family", &style.label_font)
                .set("font-size", 12)
                .set("fill", text_color),
        );

        if let Some(name) = plot.name.as_deref().filter(|n| !n.is_empty()) {
            builder.add_text(
                name,
                Point::new(at.x + 18.0, at.y + 4.0),
                Attrs::new()
                    .set("class", "plot-name")
                    .set("font-family", &style.name_font)
                    .set("font-size", 14)
                    .set("fill", &style.label_text),
            );
        }
    }
    builder.end_group();
}

fn render_decorations(decorations: &[Decoration], builder: &mut SvgBuilder) {
    if decorations.is_empty() {
        return;
    }

    builder.start_group(Attrs::new().set("class", "decorations"));
    for deco in decorations {
        let stroke = Attrs::new()
            .set("stroke", &deco.stroke)
            .set("stroke-width", deco.stroke_width);
        match &deco.shape {
            DecorationShape::Polyline(points) => builder.add_polyline(
                points,
                stroke
                    .set("fill", &deco.fill)
                    .set("stroke-linecap", &deco.linecap)
                    .set("stroke-linejoin", &deco.linejoin),
            ),
            DecorationShape::Polygon(points) => builder.add_polygon(
                points,
                stroke
                    .set("fill", &deco.fill)
                    .set("stroke-linejoin", &deco.linejoin),
            ),
            DecorationShape::Line { from, to } => {
                builder.add_line(*from, *to, stroke.set("stroke-linecap", &deco.linecap))
            }
            DecorationShape::Circle { center, r } => {
                builder.add_circle(*center, *r, stroke.set("fill", &deco.fill))
            }
            DecorationShape::Image {
                href,
                x,
                y,
                width,
                height,
                preserve,
            } => match href {
                Some(href) => builder.add_image(
                    href,
                    BoundingBox::new(*x, *y, *width, *height),
                    Attrs::new().set("preserveAspectRatio", preserve),
                ),
                None => log::warn!("skipping image decoration at ({}, {}) without href", x, y),
            },
        }
    }
    builder.end_group();
}

fn render_labels(labels: &[Label], style: &Style, builder: &mut SvgBuilder) {
    if labels.is_empty() {
        return;
    }

    builder.start_group(Attrs::new().set("class", "labels"));
    for label in labels {
        let weight = label
            .weight
            .as_ref()
            .map(|w| w.as_str())
            .filter(|w| !w.is_empty());
        let rotate = label
            .rotate
            .filter(|deg| *deg != 0.0)
            .map(|deg| format!("rotate({} {} {})", deg, label.x, label.y));

        builder.add_text(
            &label.text,
            label.position(),
            Attrs::new()
                .set("class", "label")
                .set("font-family", label.font.as_deref().unwrap_or(&style.label_font))
                .set("font-size", label.size)
                .set("fill", label.color.as_deref().unwrap_or(&style.label_text))
                .set_opt("text-anchor", label.anchor.map(|a| a.as_str()))
                .set_opt("font-weight", weight)
                .set_opt("transform", rotate),
        );
    }
    builder.end_group();
}

fn render_key(key: &Key, style: &Style, builder: &mut SvgBuilder) {
    if key.items.is_empty() {
        return;
    }

    builder.start_group(Attrs::new().set("class", "key"));
    for (idx, item) in key.items.iter().enumerate() {
        if item.text.is_empty() {
            continue;
        }
        let color = item.color.as_deref().unwrap_or(&style.label_text);
        let y = key.y + idx as f64 * key.line_height;
        let text_width = item.text.chars().count() as f64 * key.char_width;
        let rect_w = text_width.max(40.0) + key.pad_x * 2.0;
        let rect_h = key.font_size + key.pad_y * 2.0;

        builder.add_rect(
            key.x,
            y - rect_h / 2.0,
            rect_w,
            rect_h,
            Attrs::new().set("rx", 4).set("fill", color),
        );
        builder.add_text(
            &item.text,
            Point::new(key.x + rect_w / 2.0, y),
            Attrs::new()
                .set("text-anchor", "middle")
                .set("dominant-baseline", "middle")
                .set("font-family", &style.label_font)
                .set("font-size", key.font_size)
                .set("font-weight", 700)
                .set("fill", "#111111"),
        );
    }
    builder.end_group();
}

fn render_legend(
    legend: &Legend,
    groups: &HashMap<&str, &Group>,
    style: &Style,
    builder: &mut SvgBuilder,
) {
    builder.start_group(Attrs::new().set("class", "legend"));
    builder.add_text(
        &legend.title,
        Point::new(legend.x, legend.y),
        Attrs::new()
            .set("font-family", &style.legend_font)
            .set("font-size", 18)
            .set("fill", &style.label_text),
    );

    for (idx, item) in legend.items.iter().enumerate() {
        let Some(group) = item.group.as_deref().and_then(|id| groups.get(id)) else {
            log::warn!("skipping legend item {}: unknown group {:?}", idx, item.group);
            continue;
        };
        let y = legend.y + 12.0 + (idx + 1) as f64 * legend.item_height;

        builder.add_rect(
            legend.x,
            y - legend.swatch + 4.0,
            legend.swatch,
            legend.swatch,
            Attrs::new()
                .set("rx", 3)
                .set("fill", &group.color)
                .set("stroke", &style.plot_stroke)
                .set("stroke-width", 1),
        );
        builder.add_text(
            &format!("{}: {}", group.name, item.label),
            Point::new(legend.x + legend.swatch + 8.0, y + 4.0),
            Attrs::new()
                .set("font-family", &style.legend_font)
                .set("font-size", 14)
                .set("fill", &style.label_text),
        );
    }
    builder.end_group();
}

/// Escape markup characters; characters XML 1.0 cannot carry become U+FFFD
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {
                out.push(char::REPLACEMENT_CHARACTER)
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse;
    use pretty_assertions::assert_eq;

    fn render_doc(source: &str) -> String {
        let doc = parse(source).expect("valid document");
        render_svg(&doc, &SvgConfig::default(), &Stylesheet::default())
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml(r#"it's "x""#), "it&apos;s &quot;x&quot;");
    }

    #[test]
    fn test_escape_xml_replaces_control_characters() {
        assert_eq!(escape_xml("a\u{1}b\u{1b}c"), "a\u{FFFD}b\u{FFFD}c");
        assert_eq!(escape_xml("tab\tline\n"), "tab\tline\n");
        assert_eq!(escape_xml("\u{ffff}Café"), "\u{FFFD}Café");
    }

    #[test]
    fn test_control_characters_in_label_stay_well_formed() {
        let svg = render_doc("labels: [{text: \"a\\x01b\", x: 0, y: 0}]");
        assert!(!svg.contains('\u{1}'));
        assert!(svg.contains(">a\u{FFFD}b</text>"));
    }

    #[test]
    fn test_empty_label_anchor_emits_no_attribute() {
        let svg = render_doc("labels: [{text: West, x: 3, y: 4, anchor: \"\"}]");
        assert!(svg.contains(">West</text>"));
        assert!(!svg.contains("text-anchor"));
    }

    #[test]
    fn test_attrs_display_escapes_values() {
        let attrs = Attrs::new()
            .set("fill", "#fff")
            .set("font-family", "\"Gill Sans\"")
            .set_opt("text-anchor", None::<&str>)
            .set("stroke-width", 2.5);
        assert_eq!(
            attrs.to_string(),
            r##" fill="#fff" font-family="&quot;Gill Sans&quot;" stroke-width="2.5""##
        );
    }

    #[test]
    fn test_builder_fixed_canvas() {
        let builder = SvgBuilder::new(SvgConfig::default().with_standalone(false));
        let svg = builder.build(
            CanvasSize::Fixed {
                width: 100.0,
                height: 50.0,
            },
            None,
        );
        assert!(svg.contains(r#"width="100" height="50" viewBox="0 0 100 50""#));
        assert!(!svg.contains("<?xml"));
    }

    #[test]
    fn test_builder_fit_canvas_uses_content_bounds() {
        let mut builder = SvgBuilder::new(SvgConfig::default());
        builder.add_polyline(
            &[Point::new(10.0, 20.0), Point::new(110.0, 70.0)],
            Attrs::new(),
        );
        let vb = builder.viewbox(CanvasSize::Fit { padding: 10.0 });
        assert_eq!(vb, BoundingBox::new(0.0, 10.0, 120.0, 70.0));
    }

    #[test]
    fn test_builder_fit_canvas_empty() {
        let builder = SvgBuilder::new(SvgConfig::default());
        let vb = builder.viewbox(CanvasSize::Fit { padding: 5.0 });
        assert_eq!(vb, BoundingBox::new(-5.0, -5.0, 10.0, 10.0));
    }

    #[test]
    fn test_group_indentation() {
        let mut builder = SvgBuilder::new(SvgConfig::default().with_standalone(false));
        builder.start_group(Attrs::new());
        builder.add_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Attrs::new());
        builder.end_group();
        let svg = builder.build(CanvasSize::default(), None);
        assert!(svg.contains("\n  <g>\n    <line "));
        assert!(svg.contains("\n  </g>\n</svg>\n"));
    }

    #[test]
    fn test_compact_output_has_no_newlines() {
        let doc = parse("roads: [[[0, 0], [1, 1]]]").unwrap();
        let config = SvgConfig::default().with_pretty_print(false);
        let svg = render_svg(&doc, &config, &Stylesheet::default());
        assert!(!svg.contains('\n'));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_road_overrides() {
        let svg = render_doc("roads: [{points: [[0, 0], [4, 4]], color: '#00ff00', width: 3}]");
        assert!(svg.contains(
            r##"<polyline points="0,0 4,4" class="road" stroke="#00ff00" stroke-width="3"/>"##
        ));
    }

    #[test]
    fn test_plot_square_marker_and_text() {
        let svg = render_doc("plots: [{id: 7, name: Bakery, x: 100, y: 50}]");
        assert!(svg.contains(r#"<rect x="88" y="38" width="24" height="24" rx="4" class="plot""#));
        assert!(svg.contains(">7</text>"));
        assert!(svg.contains(r#"x="118" y="54""#));
        assert!(svg.contains(">Bakery</text>"));
    }

    #[test]
    fn test_plot_circle_marker() {
        let svg = render_doc("style: {plot_marker: circle}\nplots: [{id: 1, x: 10, y: 10}]");
        assert!(svg.contains(r#"<circle cx="10" cy="10" r="12" class="plot""#));
        assert!(!svg.contains("class=\"plot-name\""));
    }

    #[test]
    fn test_plot_group_colors() {
        let svg = render_doc(
            r##"
groups: [{id: g, name: Green, color: "#00aa00"}]
plots: [{id: 1, x: 0, y: 0, group: g}, {id: 2, x: 5, y: 5, group: missing}]
"##,
        );
        assert!(svg.contains(r##"fill="#00aa00""##));
        // group text defaults to white
        assert!(svg.contains(r##"fill="#ffffff">1</text>"##));
        // unknown group falls back to the plot style
        assert!(svg.contains(r##"fill="#1b1b1b">2</text>"##));
    }

    #[test]
    fn test_label_attributes() {
        let svg = render_doc(
            "labels: [{text: 'A & B', x: 5, y: 6, size: 20, anchor: middle, rotate: -30}]",
        );
        assert!(svg.contains(r#"font-size="20""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"font-weight="700""#));
        assert!(svg.contains(r#"transform="rotate(-30 5 6)""#));
        assert!(svg.contains(">A &amp; B</text>"));
    }

    #[test]
    fn test_label_null_weight_omitted() {
        let svg = render_doc("labels: [{text: t, x: 0, y: 0, weight: null}]");
        assert!(!svg.contains("font-weight"));
    }

    #[test]
    fn test_decorations() {
        let svg = render_doc(
            r##"
decorations:
  - {type: line, x1: 0, y1: 0, x2: 10, y2: 10}
  - {type: polygon, points: [[0, 0], [5, 0], [5, 5]], fill: "#eeeeee"}
  - {type: circle, cx: 3, cy: 3, r: 2}
  - {type: image, x: 0, y: 0, width: 10, height: 10}
  - {type: image, href: logo.png, x: 1, y: 2, width: 30, height: 20}
"##,
        );
        assert!(svg.contains(r#"<line x1="0" y1="0" x2="10" y2="10""#));
        assert!(svg.contains(r##"<polygon points="0,0 5,0 5,5" stroke="#111111""##));
        assert!(svg.contains(r#"<circle cx="3" cy="3" r="2""#));
        assert_eq!(svg.matches("<image").count(), 1);
        assert!(svg.contains(
            r#"<image href="logo.png" x="1" y="2" width="30" height="20" preserveAspectRatio="xMidYMid meet"/>"#
        ));
    }

    #[test]
    fn test_key_items() {
        let svg = render_doc("key: {x: 10, y: 100, items: [{text: Bus, color: '#ffcc00'}, {text: ''}, {text: Tram}]}");
        // "Bus" is shorter than the 40px minimum: width 40 + 2 * 8
        assert!(svg.contains(r##"<rect x="10" y="87" width="56" height="26" rx="4" fill="#ffcc00"/>"##));
        // empty items keep their row
        assert!(svg.contains(r#"x="38" y="140""#));
        assert_eq!(svg.matches("dominant-baseline").count(), 2);
    }

    #[test]
    fn test_legend_items() {
        let svg = render_doc(
            r##"
groups: [{id: r, name: Residential, color: "#ff8800"}]
legend:
  x: 20
  y: 30
  title: Zones
  items: [{group: nope, label: skipped}, {group: r, label: Homes}]
"##,
        );
        assert!(svg.contains(">Zones</text>"));
        assert!(svg.contains(">Residential: Homes</text>"));
        assert!(!svg.contains("skipped"));
        // second row: 30 + 12 + 2 * 22
        assert!(svg.contains(r#"<rect x="20" y="76" width="14" height="14" rx="3""#));
    }

    #[test]
    fn test_meta_controls_canvas_and_background() {
        let svg = render_doc("meta: {width: 640, height: 480, background: '#f0f0f0'}");
        assert!(svg.contains(r#"width="640" height="480" viewBox="0 0 640 480""#));
        assert!(svg.contains(r##"<rect x="0" y="0" width="640" height="480" fill="#f0f0f0"/>"##));
    }

    #[test]
    fn test_partial_meta_merges_with_fixed_canvas() {
        let doc = parse("meta: {width: 300}").unwrap();
        assert_eq!(
            resolve_canvas(&doc, CanvasSize::default()),
            CanvasSize::Fixed {
                width: 300.0,
                height: 800.0
            }
        );
        assert_eq!(
            resolve_canvas(&doc, CanvasSize::Fit { padding: 4.0 }),
            CanvasSize::Fit { padding: 4.0 }
        );
    }

    #[test]
    fn test_sections_in_order() {
        let svg = render_doc(
            r#"
labels: [{text: L, x: 0, y: 0}]
plots: [{id: 1, x: 0, y: 0}]
roads: [[[0, 0], [1, 1]]]
"#,
        );
        let roads = svg.find(r#"class="roads""#).unwrap();
        let plots = svg.find(r#"class="plots""#).unwrap();
        let labels = svg.find(r#"class="labels""#).unwrap();
        assert!(roads < plots && plots < labels);
    }
}
