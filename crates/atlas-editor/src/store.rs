//! The canonical map document and its commit path.
//!
//! `MapStore` is the single owner of the map. Every mutation is applied to
//! a private copy which then replaces the shared `Arc` in one step, so a
//! snapshot taken by a reader (a render pass, the wasm host) is never
//! observed half-edited. The copy shares its layers with the previous
//! document; only the layer being edited is cloned. Mutations that address
//! a missing layer, shape or marker change nothing and report `false`.

use atlas_core::map::ShapeSlot;
use atlas_core::{LayerId, MapModel, MarkerId, Point, Shape, ShapeId};
use std::sync::Arc;

/// A change to the map document.
#[derive(Debug, Clone, PartialEq)]
pub enum MapMutation {
    /// Replace the shape with the same id (and kind) in `layer`.
    ReplaceShape { layer: LayerId, shape: Box<Shape> },
    AddShape { layer: LayerId, shape: Box<Shape> },
    RemoveShape {
        layer: LayerId,
        slot: ShapeSlot,
        id: ShapeId,
    },
    MoveMarker {
        layer: LayerId,
        marker: MarkerId,
        to: Point,
    },
    RemoveMarker { layer: LayerId, marker: MarkerId },
    /// Move the layer at list position `from` to position `to`.
    MoveLayer { from: usize, to: usize },
    SetLayerVisible { layer: LayerId, visible: bool },
}

/// Notified after committed shape changes. Previews never reach observers.
pub trait ShapeObserver {
    fn on_shape_changed(&mut self, layer: LayerId, shape: &Shape);
    fn on_shape_deleted(&mut self, layer: LayerId, slot: ShapeSlot, id: ShapeId);
}

#[derive(Default)]
pub struct MapStore {
    map: Arc<MapModel>,
    observers: Vec<Box<dyn ShapeObserver>>,
}

impl MapStore {
    pub fn new(map: MapModel) -> Self {
        Self {
            map: Arc::new(map),
            observers: Vec::new(),
        }
    }

    /// Borrow the current document.
    pub fn map(&self) -> &MapModel {
        &self.map
    }

    /// A handle to the current document that later commits won't touch.
    pub fn snapshot(&self) -> Arc<MapModel> {
        Arc::clone(&self.map)
    }

    /// Replace the whole document (e.g. after the host loads a file).
    pub fn replace_map(&mut self, map: MapModel) {
        self.map = Arc::new(map);
    }

    pub fn subscribe(&mut self, observer: Box<dyn ShapeObserver>) {
        self.observers.push(observer);
    }

    pub fn shape(&self, layer: LayerId, slot: ShapeSlot, id: ShapeId) -> Option<&Shape> {
        self.map.shape(layer, slot, id)
    }

    /// Swap in an edited shape. Shorthand for `ReplaceShape`.
    pub fn commit(&mut self, layer: LayerId, shape: Shape) -> bool {
        self.apply(MapMutation::ReplaceShape {
            layer,
            shape: Box::new(shape),
        })
    }

    /// Apply a mutation. Returns whether the document changed.
    pub fn apply(&mut self, mutation: MapMutation) -> bool {
        let mut next = MapModel::clone(&self.map);
        if !apply_to(&mut next, &mutation) {
            log::debug!("mutation rejected: {mutation:?}");
            return false;
        }
        self.map = Arc::new(next);
        self.notify(&mutation);
        true
    }

    fn notify(&mut self, mutation: &MapMutation) {
        match mutation {
            MapMutation::ReplaceShape { layer, shape } | MapMutation::AddShape { layer, shape } => {
                log::debug!("commit {:?} in {layer:?}", shape.id);
                for observer in &mut self.observers {
                    observer.on_shape_changed(*layer, shape);
                }
            }
            MapMutation::RemoveShape { layer, slot, id } => {
                log::debug!("delete {id:?} from {layer:?}");
                for observer in &mut self.observers {
                    observer.on_shape_deleted(*layer, *slot, *id);
                }
            }
            _ => {}
        }
    }
}

fn apply_to(map: &mut MapModel, mutation: &MapMutation) -> bool {
    match mutation {
        MapMutation::MoveLayer { from, to } => map.move_layer(*from, *to),
        MapMutation::ReplaceShape { layer, shape } => map
            .layer_mut(*layer)
            .is_some_and(|l| l.replace_shape(Shape::clone(shape))),
        MapMutation::AddShape { layer, shape } => map
            .layer_mut(*layer)
            .is_some_and(|l| l.add_shape(Shape::clone(shape))),
        MapMutation::RemoveShape { layer, slot, id } => map
            .layer_mut(*layer)
            .is_some_and(|l| l.remove_shape(*slot, *id)),
        MapMutation::MoveMarker { layer, marker, to } => map
            .layer_mut(*layer)
            .is_some_and(|l| l.move_marker(*marker, *to)),
        MapMutation::RemoveMarker { layer, marker } => map
            .layer_mut(*layer)
            .is_some_and(|l| l.remove_marker(*marker)),
        MapMutation::SetLayerVisible { layer, visible } => match map.layer_mut(*layer) {
            Some(l) if l.visible != *visible => {
                l.visible = *visible;
                true
            }
            _ => false,
        },
    }
}
