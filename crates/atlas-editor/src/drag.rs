//! Vertex drag sessions.
//!
//! A `DragSession` is the only place an in-progress vertex position lives.
//! It holds a private working copy of the shape's points for live preview;
//! the canonical shape is only read, at commit time, and the committed
//! value is built from it rather than from the working copy. Ending or
//! aborting consumes the session, so a finished drag cannot be fed again.
//!
//! `DragController` wraps at most one session and applies the host's
//! `PointerTracking` mode:
//!
//! | Event        | Continuous               | Discrete                  |
//! |--------------|--------------------------|---------------------------|
//! | press vertex | begin session            | begin (arm) session       |
//! | move         | update preview           | ignored                   |
//! | release      | commit, back to idle     | ignored                   |
//! | click        | ignored                  | commit, back to idle      |

use crate::config::PointerTracking;
use crate::coords::{BoundsProvider, CoordinateMapper};
use crate::error::EditorError;
use atlas_core::{Point, PointList, Shape, move_point};

/// One press → move → release of a single vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    point_index: usize,
    working: PointList,
}

impl DragSession {
    /// Start dragging vertex `point_index` of `shape`. `None` if the index
    /// is out of range.
    pub fn begin(shape: &Shape, point_index: usize) -> Option<Self> {
        if point_index >= shape.points.len() {
            return None;
        }
        Some(Self {
            point_index,
            working: shape.points.clone(),
        })
    }

    pub fn point_index(&self) -> usize {
        self.point_index
    }

    /// Points as they should currently be drawn.
    pub fn preview(&self) -> &[Point] {
        &self.working
    }

    /// Move the dragged vertex to the pointer and return the new preview.
    pub fn feed_move<P: BoundsProvider>(
        &mut self,
        mapper: &CoordinateMapper<P>,
        x: f64,
        y: f64,
    ) -> Result<&[Point], EditorError> {
        let point = mapper.to_normalized(x, y)?;
        self.working[self.point_index] = point;
        log::trace!("drag vertex {} -> ({:.2}, {:.2})", self.point_index, point.x, point.y);
        Ok(&self.working)
    }

    /// Finish the drag at the pointer position.
    ///
    /// Returns the committed shape: `canonical` with the dragged vertex
    /// moved. `Ok(None)` when the canonical shape no longer has that vertex.
    pub fn end<P: BoundsProvider>(
        self,
        canonical: &Shape,
        mapper: &CoordinateMapper<P>,
        x: f64,
        y: f64,
    ) -> Result<Option<Shape>, EditorError> {
        let point = mapper.to_normalized(x, y)?;
        Ok(move_point(canonical, self.point_index, point))
    }

    /// Discard the session without committing.
    pub fn abort(self) {
        log::debug!("drag of vertex {} aborted", self.point_index);
    }
}

/// Idle / Dragging state machine around an optional `DragSession`.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    tracking: PointerTracking,
    session: Option<DragSession>,
}

impl DragController {
    pub fn new(tracking: PointerTracking) -> Self {
        Self {
            tracking,
            session: None,
        }
    }

    pub fn tracking(&self) -> PointerTracking {
        self.tracking
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Vertex pressed. Any session already running is dropped first.
    /// Returns `false` (staying idle) for an out-of-range index.
    pub fn press(&mut self, shape: &Shape, point_index: usize) -> bool {
        if let Some(stale) = self.session.take() {
            stale.abort();
        }
        self.session = DragSession::begin(shape, point_index);
        self.session.is_some()
    }

    /// Pointer moved. Returns the live preview in continuous mode while
    /// dragging. A mapping failure aborts the session.
    pub fn on_move<P: BoundsProvider>(
        &mut self,
        mapper: &CoordinateMapper<P>,
        x: f64,
        y: f64,
    ) -> Result<Option<&[Point]>, EditorError> {
        if self.tracking != PointerTracking::Continuous {
            return Ok(None);
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        if let Err(e) = session.feed_move(mapper, x, y).map(|_| ()) {
            self.abort();
            return Err(e);
        }
        Ok(self.session.as_ref().map(DragSession::preview))
    }

    /// Pointer released. Commits in continuous mode.
    pub fn on_release<P: BoundsProvider>(
        &mut self,
        canonical: &Shape,
        mapper: &CoordinateMapper<P>,
        x: f64,
        y: f64,
    ) -> Result<Option<Shape>, EditorError> {
        if self.tracking != PointerTracking::Continuous {
            return Ok(None);
        }
        self.finish(canonical, mapper, x, y)
    }

    /// Map clicked. Commits an armed drag in discrete mode.
    pub fn on_click<P: BoundsProvider>(
        &mut self,
        canonical: &Shape,
        mapper: &CoordinateMapper<P>,
        x: f64,
        y: f64,
    ) -> Result<Option<Shape>, EditorError> {
        if self.tracking != PointerTracking::Discrete {
            return Ok(None);
        }
        self.finish(canonical, mapper, x, y)
    }

    /// Drop the current session, if any, without committing.
    pub fn abort(&mut self) {
        if let Some(session) = self.session.take() {
            session.abort();
        }
    }

    fn finish<P: BoundsProvider>(
        &mut self,
        canonical: &Shape,
        mapper: &CoordinateMapper<P>,
        x: f64,
        y: f64,
    ) -> Result<Option<Shape>, EditorError> {
        match self.session.take() {
            Some(session) => session.end(canonical, mapper, x, y),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::BoundingBox;
    use atlas_core::ShapeId;
    use pretty_assertions::assert_eq;

    const BOX: BoundingBox = BoundingBox::new(0.0, 0.0, 200.0, 100.0);

    fn road() -> Shape {
        Shape::path(
            ShapeId::new(7),
            "road",
            &[Point::new(10.0, 10.0), Point::new(50.0, 50.0), Point::new(90.0, 10.0)],
        )
    }

    #[test]
    fn continuous_drag_previews_then_commits() {
        let mapper = CoordinateMapper::new(BOX);
        let shape = road();
        let mut drag = DragController::new(PointerTracking::Continuous);

        assert!(drag.press(&shape, 1));
        let preview = drag.on_move(&mapper, 100.0, 20.0).unwrap().unwrap();
        assert_eq!(preview[1], Point::new(50.0, 20.0));
        // Canonical shape is untouched by previews.
        assert_eq!(shape.points[1], Point::new(50.0, 50.0));

        let committed = drag.on_release(&shape, &mapper, 40.0, 30.0).unwrap().unwrap();
        assert_eq!(committed.points[1], Point::new(20.0, 30.0));
        assert_eq!(committed.points[0], shape.points[0]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn release_commit_does_not_drift() {
        let mapper = CoordinateMapper::new(BOX);
        let shape = road();
        let mut commits = Vec::new();

        for wiggle in [0.0, 33.0] {
            let mut drag = DragController::new(PointerTracking::Continuous);
            drag.press(&shape, 2);
            drag.on_move(&mapper, 10.0 + wiggle, 90.0 - wiggle).unwrap();
            drag.on_move(&mapper, 70.0, 60.0 + wiggle).unwrap();
            commits.push(drag.on_release(&shape, &mapper, 150.0, 75.0).unwrap());
        }
        assert_eq!(commits[0], commits[1]);
        assert_eq!(commits[0].as_ref().unwrap().points[2], Point::new(75.0, 75.0));
    }

    #[test]
    fn discrete_drag_commits_on_click() {
        let mapper = CoordinateMapper::new(BOX);
        let shape = road();
        let mut drag = DragController::new(PointerTracking::Discrete);

        assert!(drag.press(&shape, 0));
        assert_eq!(drag.on_move(&mapper, 10.0, 10.0).unwrap(), None);
        assert_eq!(drag.on_release(&shape, &mapper, 10.0, 10.0).unwrap(), None);
        assert!(drag.is_dragging(), "release must not disarm a discrete drag");

        let committed = drag.on_click(&shape, &mapper, 20.0, 40.0).unwrap().unwrap();
        assert_eq!(committed.points[0], Point::new(10.0, 40.0));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn mapping_failure_aborts_drag() {
        let shape = road();
        let mut drag = DragController::new(PointerTracking::Continuous);
        drag.press(&shape, 1);

        let unmeasured = CoordinateMapper::new(None::<BoundingBox>);
        assert_eq!(drag.on_move(&unmeasured, 1.0, 1.0), Err(EditorError::NotReady));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn stale_index_commits_nothing() {
        let mapper = CoordinateMapper::new(BOX);
        let session = DragSession::begin(&road(), 2).unwrap();
        let shorter = road().with_points(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(session.end(&shorter, &mapper, 5.0, 5.0).unwrap(), None);
        assert!(DragSession::begin(&road(), 3).is_none());
    }
}
