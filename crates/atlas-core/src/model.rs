//! Core data model for Atlas map documents.
//!
//! Shapes live in *normalized* space: every coordinate is a percentage
//! (0–100) of the map image's width or height, never pixels. A `Shape` is
//! either an open `Path` or a closed `Area`; both are an ordered point list
//! plus display metadata. Shapes are plain values. Edits build new values
//! (see `edit.rs`) and the owning store swaps them in wholesale.

use crate::id::{MarkerId, ShapeId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

/// Fewest points a path can be edited down to.
pub const MIN_PATH_POINTS: usize = 2;
/// Fewest points an area can be edited down to.
pub const MIN_AREA_POINTS: usize = 3;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0], serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let digits = hex
            .bytes()
            .map(hex_val)
            .collect::<Option<SmallVec<[u8; 8]>>>()?;

        let channels: SmallVec<[u8; 4]> = match digits.len() {
            3 | 4 => digits.iter().map(|d| d * 17).collect(),
            6 | 8 => digits.chunks(2).map(|p| (p[0] << 4) | p[1]).collect(),
            _ => return None,
        };
        let alpha = channels.get(3).copied().unwrap_or(255);
        Some(Self::rgba(
            channels[0] as f32 / 255.0,
            channels[1] as f32 / 255.0,
            channels[2] as f32 / 255.0,
            alpha as f32 / 255.0,
        ))
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (byte(self.r), byte(self.g), byte(self.b), byte(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{s}`")))
    }
}

// ─── Points ──────────────────────────────────────────────────────────────

/// A position in normalized map space (percent of width / height).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Boundary points of a shape. Most hand-drawn shapes stay small.
pub type PointList = SmallVec<[Point; 8]>;

// ─── Shapes ──────────────────────────────────────────────────────────────

/// How a path's stroke is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeType {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Stroke width a path gets when the document doesn't say.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Path-or-area discriminant, carrying the kind-specific fields.
///
/// Documents never store this. A shape's kind is the collection it sits
/// in (`Layer::paths` or `Layer::areas`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    /// Open polyline.
    Path {
        stroke_width: f64,
        stroke_type: StrokeType,
    },
    /// Closed polygon: the last point connects back to the first.
    Area,
}

impl ShapeKind {
    pub fn path() -> Self {
        ShapeKind::Path {
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_type: StrokeType::Solid,
        }
    }
}

/// A path or area: an ordered point sequence plus metadata.
///
/// Serialized only through its owning layer (see `map.rs`), which knows
/// the kind from the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub name: String,
    pub description: String,
    /// Falls back to the owning layer's color when `None`.
    pub color: Option<Color>,
    pub points: PointList,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            color: None,
            points: PointList::new(),
            kind,
        }
    }

    pub fn path(id: ShapeId, name: impl Into<String>, points: &[Point]) -> Self {
        Self::new(id, ShapeKind::path(), name).with_points(points)
    }

    pub fn area(id: ShapeId, name: impl Into<String>, points: &[Point]) -> Self {
        Self::new(id, ShapeKind::Area, name).with_points(points)
    }

    pub fn with_points(mut self, points: &[Point]) -> Self {
        self.points = PointList::from_slice(points);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn is_area(&self) -> bool {
        matches!(self.kind, ShapeKind::Area)
    }

    /// Whether the boundary wraps from the last point back to the first.
    pub fn is_closed(&self) -> bool {
        self.is_area()
    }

    /// Minimum vertex count for this shape's kind.
    pub fn min_points(&self) -> usize {
        match self.kind {
            ShapeKind::Path { .. } => MIN_PATH_POINTS,
            ShapeKind::Area => MIN_AREA_POINTS,
        }
    }

    /// Whether one more vertex can be removed without breaking the minimum.
    pub fn can_delete_point(&self) -> bool {
        self.points.len() > self.min_points()
    }
}

// ─── Markers ─────────────────────────────────────────────────────────────

/// A single point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: MarkerId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub x: f64,
    pub y: f64,
    /// Falls back to the owning layer's icon when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl Marker {
    pub fn new(id: MarkerId, name: impl Into<String>, at: Point) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            x: at.x,
            y: at.y,
            icon_url: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
