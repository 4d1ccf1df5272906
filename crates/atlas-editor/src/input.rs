//! Input abstraction layer.
//!
//! Mouse, touch and pen events all arrive as an `InputEvent` carrying
//! device-pixel coordinates. The editor never sees the underlying input
//! technology.

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f64, y: f64 },

    /// Pointer moved. May fire at any rate; only the latest matters.
    PointerMove { x: f64, y: f64 },

    /// Pointer released.
    PointerUp { x: f64, y: f64 },

    /// Completed click or tap on the map surface.
    Click { x: f64, y: f64 },
}

impl InputEvent {
    /// Device-space position of the event.
    pub fn position(&self) -> (f64, f64) {
        match *self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Click { x, y } => (x, y),
        }
    }
}
