use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EditorError {
    /// The map container has no usable bounding box yet (before first
    /// layout, or collapsed to zero size).
    #[error("map container not measured yet")]
    NotReady,
}
