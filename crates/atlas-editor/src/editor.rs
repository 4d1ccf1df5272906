//! Per-shape interaction routing.
//!
//! A `ShapeEditor` sits between the host's pointer events and one path or
//! area. The host says what the pointer is over (`PointerTarget`); the
//! editor normalizes the position and routes the event to the drag
//! controller, the area hover test, or the click/insert flow. It never
//! writes the shape itself: committed edits come back as
//! `EditOutcome::Commit` for the store to swap in.

use crate::config::EditorConfig;
use crate::coords::{BoundsProvider, CoordinateMapper};
use crate::drag::DragController;
use crate::error::EditorError;
use crate::input::InputEvent;
use atlas_core::{Point, PointList, Shape, centroid, delete_point, insert_point_near, is_inside};

/// What the pointer is over, as reported by the host's own hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// A vertex handle of the edited shape.
    Vertex(usize),
    /// The shape's stroke or fill.
    Body,
    /// Anywhere else on the map.
    Background,
}

/// Something the host should react to after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Redraw with these points; nothing is committed.
    Preview(PointList),
    /// Replace the canonical shape with this value.
    Commit(Shape),
    HoverEnter,
    HoverLeave,
}

pub struct ShapeEditor {
    config: EditorConfig,
    drag: DragController,
    editing: bool,
    hovering: bool,
    /// Where the shape body was last clicked, for "add point".
    last_click: Option<Point>,
}

impl Default for ShapeEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl ShapeEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            drag: DragController::new(config.tracking),
            editing: false,
            hovering: false,
            last_click: None,
        }
    }

    pub fn config(&self) -> EditorConfig {
        self.config
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn last_click(&self) -> Option<Point> {
        self.last_click
    }

    /// Points to draw right now: the drag preview, if one is running.
    pub fn preview(&self) -> Option<&[Point]> {
        self.drag.session().map(|s| s.preview())
    }

    /// Where to anchor the shape's name label.
    pub fn label_anchor(shape: &Shape) -> Point {
        centroid(&shape.points)
    }

    /// Route one input event.
    pub fn handle<P: BoundsProvider>(
        &mut self,
        event: &InputEvent,
        target: PointerTarget,
        shape: &Shape,
        mapper: &CoordinateMapper<P>,
    ) -> Result<Vec<EditOutcome>, EditorError> {
        match *event {
            InputEvent::PointerDown { .. } => {
                if let PointerTarget::Vertex(index) = target
                    && self.editing
                {
                    self.drag.press(shape, index);
                }
                Ok(vec![])
            }
            InputEvent::PointerMove { x, y } => {
                if self.drag.is_dragging() {
                    let preview = self.drag.on_move(mapper, x, y)?;
                    return Ok(preview
                        .map(|points| vec![EditOutcome::Preview(PointList::from_slice(points))])
                        .unwrap_or_default());
                }
                Ok(self.track_hover(target, shape, mapper, x, y))
            }
            InputEvent::PointerUp { x, y } => {
                let committed = self.drag.on_release(shape, mapper, x, y)?;
                Ok(committed.map(EditOutcome::Commit).into_iter().collect())
            }
            InputEvent::Click { x, y } => {
                if self.drag.is_dragging() {
                    // The tap that armed the drag lands on its own handle.
                    // Only a map-level click places the vertex.
                    if let PointerTarget::Vertex(_) = target {
                        return Ok(vec![]);
                    }
                    let committed = self.drag.on_click(shape, mapper, x, y)?;
                    return Ok(committed.map(EditOutcome::Commit).into_iter().collect());
                }
                match target {
                    PointerTarget::Body => {
                        self.last_click = Some(mapper.to_normalized(x, y)?);
                        self.editing = true;
                    }
                    PointerTarget::Background => {
                        self.editing = false;
                        self.last_click = None;
                    }
                    PointerTarget::Vertex(_) => {}
                }
                Ok(vec![])
            }
        }
    }

    /// Hover enters on the body. Areas then ray-cast every move until the
    /// pointer leaves the polygon; paths simply follow the target.
    fn track_hover<P: BoundsProvider>(
        &mut self,
        target: PointerTarget,
        shape: &Shape,
        mapper: &CoordinateMapper<P>,
        x: f64,
        y: f64,
    ) -> Vec<EditOutcome> {
        if !self.hovering {
            if target == PointerTarget::Body {
                self.hovering = true;
                return vec![EditOutcome::HoverEnter];
            }
            return vec![];
        }

        let still_inside = if shape.is_area() && self.config.track_area_hover {
            match mapper.to_normalized(x, y) {
                Ok(p) => is_inside(p, &shape.points),
                Err(e) => {
                    log::warn!("area hover tracking stopped: {e}");
                    false
                }
            }
        } else {
            target == PointerTarget::Body
        };

        if still_inside {
            vec![]
        } else {
            self.hovering = false;
            vec![EditOutcome::HoverLeave]
        }
    }

    /// "Add point" at the last body click. Consumes the remembered click.
    pub fn add_point(&mut self, shape: &Shape) -> Option<Shape> {
        let at = self.last_click.take()?;
        self.add_point_at(shape, at)
    }

    /// Insert `at` on the nearest segment of the shape's boundary.
    pub fn add_point_at(&self, shape: &Shape, at: Point) -> Option<Shape> {
        insert_point_near(shape, at)
    }

    pub fn delete_point(&self, shape: &Shape, index: usize) -> Option<Shape> {
        delete_point(shape, index)
    }

    /// Whether a "delete point" control should be enabled.
    pub fn can_delete_point(&self, shape: &Shape) -> bool {
        shape.can_delete_point()
    }

    /// Drop any running drag and leave editing mode.
    pub fn reset(&mut self) {
        self.drag.abort();
        self.editing = false;
        self.hovering = false;
        self.last_click = None;
    }
}
