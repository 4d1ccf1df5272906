pub mod edit;
pub mod geometry;
pub mod id;
pub mod map;
pub mod model;

pub use edit::{MetadataPatch, delete_point, insert_point, insert_point_near, move_point, update_metadata};
pub use geometry::{centroid, is_inside, locate_insertion_index};
pub use id::{LayerId, MarkerId, ShapeId};
pub use map::{Layer, MapModel, ShapeSlot};
pub use model::*;
