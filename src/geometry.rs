//! Points and bounding boxes in canvas pixel coordinates

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

/// A 2D point in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

fn check_finite<E: de::Error>(value: f64) -> Result<f64, E> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(E::custom(format!("coordinate must be a finite number, got {}", value)))
    }
}

/// `deserialize_with` helper rejecting NaN and infinities
pub(crate) fn finite<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    check_finite(f64::deserialize(deserializer)?)
}

pub(crate) fn finite_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)?
        .map(check_finite)
        .transpose()
}

/// Points are written either as `[x, y]` or as `{x: .., y: ..}`
impl<'de> Deserialize<'de> for Point {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PointVisitor;

        impl<'de> Visitor<'de> for PointVisitor {
            type Value = Point;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a point as [x, y] or {x, y}")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Point, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let x: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"a point with 2 coordinates"))?;
                let y: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &"a point with 2 coordinates"))?;
                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(3, &"a point with 2 coordinates"));
                }
                Ok(Point::new(check_finite(x)?, check_finite(y)?))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Point, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut x = None;
                let mut y = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "x" => x = Some(map.next_value::<f64>()?),
                        "y" => y = Some(map.next_value::<f64>()?),
                        _ => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                let x = x.ok_or_else(|| de::Error::missing_field("x"))?;
                let y = y.ok_or_else(|| de::Error::missing_field("y"))?;
                Ok(Point::new(check_finite(x)?, check_finite(y)?))
            }
        }

        deserializer.deserialize_any(PointVisitor)
    }
}

/// An axis-aligned box covering part of the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Zero-sized box sitting on a single point
    pub fn at(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Compute the union of two bounding boxes (smallest box containing both)
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    /// Expand this bounding box to include a point
    pub fn expand_to_include(&self, point: Point) -> BoundingBox {
        let x = self.x.min(point.x);
        let y = self.y.min(point.y);
        let right = self.right().max(point.x);
        let bottom = self.bottom().max(point.y);
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    /// Grow the box by `amount` on every side
    pub fn inflate(&self, amount: f64) -> BoundingBox {
        BoundingBox::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// Accumulates the extent of everything drawn on the canvas
#[derive(Debug, Clone, Default)]
pub struct BoundsTracker {
    bounds: Option<BoundingBox>,
}

impl BoundsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_point(&mut self, point: Point) {
        self.bounds = Some(match self.bounds {
            Some(b) => b.expand_to_include(point),
            None => BoundingBox::at(point),
        });
    }

    pub fn include_box(&mut self, other: BoundingBox) {
        self.bounds = Some(match self.bounds {
            Some(b) => b.union(&other),
            None => other,
        });
    }

    /// The accumulated bounds, or `None` when nothing was included
    pub fn finish(self) -> Option<BoundingBox> {
        self.bounds
    }
}

/// Format a point list for a `points` attribute: `x1,y1 x2,y2 ...`
pub fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
