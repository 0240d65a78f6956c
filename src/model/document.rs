//! Document types for map descriptions

use std::fmt;

use serde::de::{self, value::MapAccessDeserializer, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::geometry::{finite, finite_opt, Point};

/// A complete map description: roads, plots, labels and their decorations
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: Meta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: StyleOverrides,
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<Group>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roads: Vec<Road>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plots: Vec<Plot>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub decorations: Vec<Decoration>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub key: Option<Key>,
    #[serde(default)]
    pub legend: Option<Legend>,
}

/// A present-but-empty section (`roads:` or `roads: null`) reads as empty
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Canvas metadata
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Meta {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub background: Option<String>,
}

/// Shape used for plot markers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    #[default]
    Square,
    Circle,
}

/// Per-document style values; unset fields fall through to the stylesheet
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StyleOverrides {
    pub road_stroke: Option<String>,
    pub road_width: Option<f64>,
    pub plot_fill: Option<String>,
    pub plot_stroke: Option<String>,
    pub plot_text: Option<String>,
    pub plot_marker: Option<MarkerShape>,
    pub label_text: Option<String>,
    pub label_font: Option<String>,
    pub name_font: Option<String>,
    pub legend_font: Option<String>,
}

/// A colour class for plots, listed in the legend
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Text colour for plot identifiers drawn on this group's fill
    pub text: Option<String>,
}

/// A string or number in the source, kept as display text
///
/// Plot identifiers and font weights are commonly written as bare numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scalar(pub String);

impl Scalar {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or a number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar::new(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// A connected polyline
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    pub points: Vec<Point>,
    pub color: Option<String>,
    pub width: Option<f64>,
}

impl Road {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            color: None,
            width: None,
        }
    }
}

#[derive(Deserialize)]
struct RoadFields {
    points: Vec<Point>,
    color: Option<String>,
    width: Option<f64>,
}

/// Roads are a bare point list, or `{points, color?, width?}`
impl<'de> Deserialize<'de> for Road {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RoadVisitor;

        impl<'de> Visitor<'de> for RoadVisitor {
            type Value = Road;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list of points or a mapping with `points`")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Road, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut points = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(point) = seq.next_element::<Point>()? {
                    points.push(point);
                }
                Ok(Road::new(points))
            }

            fn visit_map<A>(self, map: A) -> Result<Road, A::Error>
            where
                A: MapAccess<'de>,
            {
                let fields = RoadFields::deserialize(MapAccessDeserializer::new(map))?;
                Ok(Road {
                    points: fields.points,
                    color: fields.color,
                    width: fields.width,
                })
            }
        }

        deserializer.deserialize_any(RoadVisitor)
    }
}

/// A numbered point of interest
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Plot {
    #[serde(alias = "number")]
    pub id: Scalar,
    pub name: Option<String>,
    #[serde(deserialize_with = "finite")]
    pub x: f64,
    #[serde(deserialize_with = "finite")]
    pub y: f64,
    pub group: Option<String>,
}

impl Plot {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Horizontal text alignment relative to the anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// An empty anchor is the same as no anchor
fn empty_as_no_anchor<'de, D>(deserializer: D) -> Result<Option<TextAnchor>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match value.as_str() {
        "" => Ok(None),
        "start" => Ok(Some(TextAnchor::Start)),
        "middle" => Ok(Some(TextAnchor::Middle)),
        "end" => Ok(Some(TextAnchor::End)),
        other => Err(de::Error::unknown_variant(other, &["start", "middle", "end"])),
    }
}

/// Free-standing text
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub text: String,
    #[serde(deserialize_with = "finite")]
    pub x: f64,
    #[serde(deserialize_with = "finite")]
    pub y: f64,
    #[serde(default = "default_label_size")]
    pub size: f64,
    #[serde(default, deserialize_with = "empty_as_no_anchor")]
    pub anchor: Option<TextAnchor>,
    pub color: Option<String>,
    pub font: Option<String>,
    #[serde(default = "default_label_weight")]
    pub weight: Option<Scalar>,
    /// Rotation in degrees about the label position
    pub rotate: Option<f64>,
}

fn default_label_size() -> f64 {
    16.0
}

fn default_label_weight() -> Option<Scalar> {
    Some(Scalar::new("700"))
}

impl Label {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Geometry of a decoration
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationShape {
    Polyline(Vec<Point>),
    Polygon(Vec<Point>),
    Line {
        from: Point,
        to: Point,
    },
    Circle {
        center: Point,
        r: f64,
    },
    Image {
        href: Option<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        preserve: String,
    },
}

/// A thin auxiliary shape drawn between the plots and the labels
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawDecoration")]
pub struct Decoration {
    pub shape: DecorationShape,
    pub stroke: String,
    pub stroke_width: f64,
    pub linecap: String,
    pub linejoin: String,
    pub fill: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DecorationKind {
    #[default]
    Polyline,
    Polygon,
    Line,
    Circle,
    Image,
}

#[derive(Deserialize)]
struct RawDecoration {
    #[serde(rename = "type", default)]
    kind: DecorationKind,
    points: Option<Vec<Point>>,
    #[serde(default, deserialize_with = "finite_opt")]
    x1: Option<f64>,
    #[serde(default, deserialize_with = "finite_opt")]
    y1: Option<f64>,
    #[serde(default, deserialize_with = "finite_opt")]
    x2: Option<f64>,
    #[serde(default, deserialize_with = "finite_opt")]
    y2: Option<f64>,
    #[serde(default, deserialize_with = "finite_opt")]
    cx: Option<f64>,
    #[serde(default, deserialize_with = "finite_opt")]
    cy: Option<f64>,
    #[serde(default, deserialize_with = "finite_opt")]
    r: Option<f64>,
    #[serde(default, deserialize_with = "finite_opt")]
    x: Option<f64>,
    #[serde(default, deserialize_with = "finite_opt")]
    y: Option<f64>,
    // stroke width for outlines, image width for images
    width: Option<f64>,
    height: Option<f64>,
    href: Option<String>,
    preserve: Option<String>,
    stroke: Option<String>,
    linecap: Option<String>,
    linejoin: Option<String>,
    fill: Option<String>,
}

fn required<T>(value: Option<T>, kind: &str, field: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("{} decoration is missing field `{}`", kind, field))
}

impl TryFrom<RawDecoration> for Decoration {
    type Error = String;

    fn try_from(raw: RawDecoration) -> Result<Self, Self::Error> {
        let shape = match raw.kind {
            DecorationKind::Polyline => {
                DecorationShape::Polyline(required(raw.points, "polyline", "points")?)
            }
            DecorationKind::Polygon => {
                DecorationShape::Polygon(required(raw.points, "polygon", "points")?)
            }
            DecorationKind::Line => DecorationShape::Line {
                from: Point::new(
                    required(raw.x1, "line", "x1")?,
                    required(raw.y1, "line", "y1")?,
                ),
                to: Point::new(
                    required(raw.x2, "line", "x2")?,
                    required(raw.y2, "line", "y2")?,
                ),
            },
            DecorationKind::Circle => DecorationShape::Circle {
                center: Point::new(
                    required(raw.cx, "circle", "cx")?,
                    required(raw.cy, "circle", "cy")?,
                ),
                r: required(raw.r, "circle", "r")?,
            },
            DecorationKind::Image => DecorationShape::Image {
                href: raw.href.filter(|h| !h.is_empty()),
                x: required(raw.x, "image", "x")?,
                y: required(raw.y, "image", "y")?,
                width: required(raw.width, "image", "width")?,
                height: required(raw.height, "image", "height")?,
                preserve: raw
                    .preserve
                    .unwrap_or_else(|| "xMidYMid meet".to_string()),
            },
        };

        let stroke_width = match shape {
            DecorationShape::Image { .. } => 2.0,
            _ => raw.width.unwrap_or(2.0),
        };

        Ok(Decoration {
            shape,
            stroke: raw.stroke.unwrap_or_else(|| "#111111".to_string()),
            stroke_width,
            linecap: raw.linecap.unwrap_or_else(|| "round".to_string()),
            linejoin: raw.linejoin.unwrap_or_else(|| "round".to_string()),
            fill: raw.fill.unwrap_or_else(|| "none".to_string()),
        })
    }
}

/// A column of coloured pills explaining map colours
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Key {
    #[serde(default = "default_key_x", deserialize_with = "finite")]
    pub x: f64,
    #[serde(default = "default_key_y", deserialize_with = "finite")]
    pub y: f64,
    #[serde(default = "default_key_line_height")]
    pub line_height: f64,
    #[serde(default = "default_key_pad_x")]
    pub pad_x: f64,
    #[serde(default = "default_key_pad_y")]
    pub pad_y: f64,
    #[serde(default = "default_key_font_size")]
    pub font_size: f64,
    /// Estimated glyph width used to size each pill
    #[serde(default = "default_key_char_width")]
    pub char_width: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<KeyItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyItem {
    #[serde(default)]
    pub text: String,
    pub color: Option<String>,
}

fn default_key_x() -> f64 {
    900.0
}

fn default_key_y() -> f64 {
    70.0
}

fn default_key_line_height() -> f64 {
    20.0
}

fn default_key_pad_x() -> f64 {
    8.0
}

fn default_key_pad_y() -> f64 {
    6.0
}

fn default_key_font_size() -> f64 {
    14.0
}

fn default_key_char_width() -> f64 {
    8.0
}

/// Group swatches with a title
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Legend {
    #[serde(deserialize_with = "finite")]
    pub x: f64,
    #[serde(deserialize_with = "finite")]
    pub y: f64,
    #[serde(default = "default_legend_title")]
    pub title: String,
    #[serde(default = "default_legend_swatch")]
    pub swatch: f64,
    #[serde(default = "default_legend_item_height")]
    pub item_height: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<LegendItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegendItem {
    pub group: Option<String>,
    #[serde(default)]
    pub label: String,
}

fn default_legend_title() -> String {
    "Legend".to_string()
}

fn default_legend_swatch() -> f64 {
    14.0
}

fn default_legend_item_height() -> f64 {
    22.0
}
