//! Device pixels → normalized map coordinates.
//!
//! Shape coordinates are percentages of the map container, so every
//! conversion needs the container's *current* bounding box. Pan and zoom
//! move the container, so the box is fetched from the `BoundsProvider` on
//! each call and never cached.

use crate::error::EditorError;
use atlas_core::Point;

/// Container rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A zero-sized box means layout has not run yet.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Supplies the map container's bounding box on demand.
pub trait BoundsProvider {
    /// `None` until the container has been laid out.
    fn bounding_box(&self) -> Option<BoundingBox>;
}

impl BoundsProvider for BoundingBox {
    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(*self)
    }
}

impl BoundsProvider for Option<BoundingBox> {
    fn bounding_box(&self) -> Option<BoundingBox> {
        *self
    }
}

impl<F: Fn() -> Option<BoundingBox>> BoundsProvider for F {
    fn bounding_box(&self) -> Option<BoundingBox> {
        self()
    }
}

/// Converts device positions into shape space for one container.
pub struct CoordinateMapper<P> {
    provider: P,
}

impl<P: BoundsProvider> CoordinateMapper<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn measured(&self) -> Result<BoundingBox, EditorError> {
        self.provider
            .bounding_box()
            .filter(BoundingBox::is_measured)
            .ok_or(EditorError::NotReady)
    }

    /// Map a device-pixel position to percent of the container.
    pub fn to_normalized(&self, device_x: f64, device_y: f64) -> Result<Point, EditorError> {
        let b = self.measured()?;
        Ok(Point::new(
            100.0 * (device_x - b.left) / b.width,
            100.0 * (device_y - b.top) / b.height,
        ))
    }

    /// Container aspect ratio (`width / height`); 1.0 before layout.
    pub fn scale_x(&self) -> f64 {
        self.measured().map(|b| b.width / b.height).unwrap_or(1.0)
    }

    /// Project a normalized point into the square drawing viewbox.
    pub fn to_viewbox(&self, point: Point) -> (f64, f64) {
        (point.x * self.scale_x(), point.y)
    }
}
