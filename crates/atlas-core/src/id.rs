use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter backing `fresh()` on every id type.
/// Starts high so generated ids don't collide with small hand-written ones.
static COUNTER: AtomicU64 = AtomicU64::new(1 << 32);

fn next_raw() -> u64 {
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }

            /// Generate an id that no other `fresh()` call has returned.
            pub fn fresh() -> Self {
                Self(next_raw())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

numeric_id!(
    /// Identifies a path or area within its owning layer.
    ShapeId,
    "shape"
);
numeric_id!(
    /// Identifies a marker within its owning layer.
    MarkerId,
    "marker"
);
numeric_id!(
    /// Identifies a layer within a map.
    LayerId,
    "layer"
);
