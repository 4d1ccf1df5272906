pub mod config;
pub mod coords;
pub mod drag;
pub mod editor;
pub mod error;
pub mod input;
pub mod store;

pub use config::{EditorConfig, PointerTracking};
pub use coords::{BoundingBox, BoundsProvider, CoordinateMapper};
pub use drag::{DragController, DragSession};
pub use editor::{EditOutcome, PointerTarget, ShapeEditor};
pub use error::EditorError;
pub use input::InputEvent;
pub use store::{MapMutation, MapStore, ShapeObserver};
