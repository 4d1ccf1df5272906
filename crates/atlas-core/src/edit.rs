//! Shape edits as pure value transforms.
//!
//! Every operation takes a `&Shape` and returns a freshly built one; the
//! input is never touched. A rejected edit returns `None`. Rejections are
//! routine (a stale index, a delete button racing its own disable), so
//! callers treat them as no-ops, not errors.

use crate::geometry::locate_insertion_index;
use crate::model::{Color, Point, Shape, ShapeKind, StrokeType};

/// Insert `point` so that it lands at `index` in the point list.
///
/// Rejected when the shape has fewer than two points or `index` is past
/// the end.
pub fn insert_point(shape: &Shape, index: usize, point: Point) -> Option<Shape> {
    if shape.points.len() < 2 || index > shape.points.len() {
        log::debug!("insert_point rejected on {:?} at {index}", shape.id);
        return None;
    }
    let mut next = shape.clone();
    next.points.insert(index, point);
    Some(next)
}

/// Insert `point` between the endpoints of its nearest boundary segment.
pub fn insert_point_near(shape: &Shape, point: Point) -> Option<Shape> {
    let index = locate_insertion_index(point, &shape.points, shape.is_closed())?;
    insert_point(shape, index, point)
}

/// Remove the vertex at `index`.
///
/// Rejected when `index` is out of bounds or the shape would drop below
/// its kind's minimum vertex count.
pub fn delete_point(shape: &Shape, index: usize) -> Option<Shape> {
    if index >= shape.points.len() || !shape.can_delete_point() {
        log::debug!("delete_point rejected on {:?} at {index}", shape.id);
        return None;
    }
    let mut next = shape.clone();
    next.points.remove(index);
    Some(next)
}

/// Reposition the vertex at `index`. Out-of-bounds indices are rejected.
pub fn move_point(shape: &Shape, index: usize, point: Point) -> Option<Shape> {
    if index >= shape.points.len() {
        log::debug!("move_point rejected on {:?} at {index}", shape.id);
        return None;
    }
    let mut next = shape.clone();
    next.points[index] = point;
    Some(next)
}

/// Partial metadata update. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the override so the layer color applies again.
    pub color: Option<Option<Color>>,
    /// Path only.
    pub stroke_width: Option<f64>,
    /// Path only.
    pub stroke_type: Option<StrokeType>,
}

impl MetadataPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Merge `patch` into a copy of `shape`. Points are never touched, and
/// stroke fields are ignored for areas.
pub fn update_metadata(shape: &Shape, patch: &MetadataPatch) -> Shape {
    let mut next = shape.clone();
    if let Some(name) = &patch.name {
        next.name = name.clone();
    }
    if let Some(description) = &patch.description {
        next.description = description.clone();
    }
    if let Some(color) = patch.color {
        next.color = color;
    }
    if let ShapeKind::Path {
        stroke_width,
        stroke_type,
    } = &mut next.kind
    {
        if let Some(w) = patch.stroke_width {
            *stroke_width = w;
        }
        if let Some(t) = patch.stroke_type {
            *stroke_type = t;
        }
    }
    next
}
