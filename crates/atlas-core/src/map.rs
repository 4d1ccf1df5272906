//! Layers and the map document that owns them.
//!
//! A `Layer` groups markers, paths and areas and supplies the defaults
//! (color, icon) its children inherit. Layer order in `MapModel::layers`
//! is z-order: later layers draw on top.

use crate::id::{LayerId, MarkerId, ShapeId};
use crate::model::{
    Color, DEFAULT_STROKE_WIDTH, Marker, Point, PointList, Shape, ShapeKind, StrokeType,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Which of a layer's shape collections an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeSlot {
    Path,
    Area,
}

impl From<&ShapeKind> for ShapeSlot {
    fn from(kind: &ShapeKind) -> Self {
        match kind {
            ShapeKind::Path { .. } => ShapeSlot::Path,
            ShapeKind::Area => ShapeSlot::Area,
        }
    }
}

// ─── Wire format ─────────────────────────────────────────────────────────

/// One entry of a layer's `paths` or `areas` array. Carries no kind: the
/// array it sits in decides.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShapeRecord {
    id: ShapeId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    points: PointList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stroke_type: Option<StrokeType>,
}

impl ShapeRecord {
    fn into_shape(self, slot: ShapeSlot) -> Shape {
        let kind = match slot {
            ShapeSlot::Path => ShapeKind::Path {
                stroke_width: self.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH),
                stroke_type: self.stroke_type.unwrap_or_default(),
            },
            ShapeSlot::Area => ShapeKind::Area,
        };
        Shape {
            id: self.id,
            name: self.name,
            description: self.description,
            color: self.color,
            points: self.points,
            kind,
        }
    }
}

impl From<&Shape> for ShapeRecord {
    fn from(shape: &Shape) -> Self {
        let (stroke_width, stroke_type) = match shape.kind {
            ShapeKind::Path {
                stroke_width,
                stroke_type,
            } => (Some(stroke_width), Some(stroke_type)),
            ShapeKind::Area => (None, None),
        };
        Self {
            id: shape.id,
            name: shape.name.clone(),
            description: shape.description.clone(),
            color: shape.color,
            points: shape.points.clone(),
            stroke_width,
            stroke_type,
        }
    }
}

fn serialize_shapes<S: Serializer>(shapes: &[Shape], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(shapes.iter().map(ShapeRecord::from))
}

fn deserialize_shapes<'de, D: Deserializer<'de>>(
    deserializer: D,
    slot: ShapeSlot,
) -> Result<Vec<Shape>, D::Error> {
    let records = Vec::<ShapeRecord>::deserialize(deserializer)?;
    Ok(records.into_iter().map(|r| r.into_shape(slot)).collect())
}

fn deserialize_paths<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Shape>, D::Error> {
    deserialize_shapes(deserializer, ShapeSlot::Path)
}

fn deserialize_areas<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Shape>, D::Error> {
    deserialize_shapes(deserializer, ShapeSlot::Area)
}

// ─── Layers ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    /// Absent in a document means hidden.
    #[serde(default)]
    pub visible: bool,
    /// Zoom range gating. Both bounds must be set (and non-zero) for
    /// gating to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
    pub icon_url: String,
    pub color: Color,
    #[serde(default)]
    pub markers: Vec<Marker>,
    /// Every entry has `ShapeKind::Path`.
    #[serde(
        default,
        serialize_with = "serialize_shapes",
        deserialize_with = "deserialize_paths"
    )]
    pub paths: Vec<Shape>,
    /// Every entry has `ShapeKind::Area`.
    #[serde(
        default,
        serialize_with = "serialize_shapes",
        deserialize_with = "deserialize_areas"
    )]
    pub areas: Vec<Shape>,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>, color: Color, icon_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            min_zoom: None,
            max_zoom: None,
            icon_url: icon_url.into(),
            color,
            markers: Vec::new(),
            paths: Vec::new(),
            areas: Vec::new(),
        }
    }

    /// Whether this layer should be shown at `zoom`.
    pub fn is_visible_at(&self, zoom: f64) -> bool {
        if !self.visible {
            return false;
        }
        let bound = |zoom: Option<f64>| zoom.filter(|z| *z != 0.0 && !z.is_nan());
        match (bound(self.min_zoom), bound(self.max_zoom)) {
            (Some(min), Some(max)) => min <= zoom && zoom <= max,
            _ => true,
        }
    }

    pub fn effective_color(&self, shape: &Shape) -> Color {
        shape.color.unwrap_or(self.color)
    }

    pub fn effective_icon<'a>(&'a self, marker: &'a Marker) -> &'a str {
        marker.icon_url.as_deref().unwrap_or(&self.icon_url)
    }

    fn slot(&self, slot: ShapeSlot) -> &Vec<Shape> {
        match slot {
            ShapeSlot::Path => &self.paths,
            ShapeSlot::Area => &self.areas,
        }
    }

    fn slot_mut(&mut self, slot: ShapeSlot) -> &mut Vec<Shape> {
        match slot {
            ShapeSlot::Path => &mut self.paths,
            ShapeSlot::Area => &mut self.areas,
        }
    }

    pub fn shape(&self, slot: ShapeSlot, id: ShapeId) -> Option<&Shape> {
        self.slot(slot)
            .iter()
            .find(|s| s.id == id && ShapeSlot::from(&s.kind) == slot)
    }

    /// Iterate paths then areas.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.paths.iter().chain(self.areas.iter())
    }

    /// Swap in `shape` for the existing shape with the same id and kind.
    /// Returns `false` when no such shape exists.
    pub fn replace_shape(&mut self, shape: Shape) -> bool {
        let slot = ShapeSlot::from(&shape.kind);
        match self.slot_mut(slot).iter_mut().find(|s| s.id == shape.id) {
            Some(existing) => {
                *existing = shape;
                true
            }
            None => false,
        }
    }

    pub fn remove_shape(&mut self, slot: ShapeSlot, id: ShapeId) -> bool {
        let shapes = self.slot_mut(slot);
        match shapes.iter().position(|s| s.id == id) {
            Some(index) => {
                shapes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Append a shape. Rejected when its id is already taken in this layer.
    pub fn add_shape(&mut self, shape: Shape) -> bool {
        if self.shapes().any(|s| s.id == shape.id) {
            return false;
        }
        let slot = ShapeSlot::from(&shape.kind);
        self.slot_mut(slot).push(shape);
        true
    }

    /// An id greater than every shape id currently in the layer.
    pub fn next_shape_id(&self) -> ShapeId {
        let max = self.shapes().map(|s| s.id.get()).max().unwrap_or(0);
        ShapeId::new(max + 1)
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn move_marker(&mut self, id: MarkerId, to: Point) -> bool {
        match self.markers.iter_mut().find(|m| m.id == id) {
            Some(marker) => {
                marker.x = to.x;
                marker.y = to.y;
                true
            }
            None => false,
        }
    }

    pub fn remove_marker(&mut self, id: MarkerId) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != id);
        self.markers.len() != before
    }
}

/// A whole map document: background image plus ordered layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapModel {
    pub name: String,
    pub image_url: String,
    /// Shared so a copy of the document shares every layer it doesn't edit.
    #[serde(default)]
    pub layers: Vec<Arc<Layer>>,
}

impl MapModel {
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id).map(Arc::as_ref)
    }

    /// Mutable access to one layer. Copies that layer first if another
    /// document still shares it.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id).map(Arc::make_mut)
    }

    /// Append a layer on top of the z-order.
    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(Arc::new(layer));
    }

    pub fn shape(&self, layer: LayerId, slot: ShapeSlot, id: ShapeId) -> Option<&Shape> {
        self.layer(layer)?.shape(slot, id)
    }

    /// Layers shown at `zoom`, in z-order.
    pub fn visible_layers(&self, zoom: f64) -> impl Iterator<Item = &Layer> {
        self.layers
            .iter()
            .map(Arc::as_ref)
            .filter(move |l| l.is_visible_at(zoom))
    }

    /// Move the layer at `from` so it ends up at `to`. Out-of-range
    /// positions are rejected.
    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        if from >= self.layers.len() || to >= self.layers.len() {
            return false;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn towns() -> Layer {
        let mut layer = Layer::new(LayerId::new(1), "Towns", Color::WHITE, "/icons/house.svg");
        layer.markers.push(Marker::new(MarkerId::new(0), "Everlund", Point::new(50.0, 40.0)));
        layer.paths.push(Shape::path(
            ShapeId::new(10),
            "Coast",
            &[Point::new(20.0, 20.0), Point::new(40.0, 40.0)],
        ));
        layer.areas.push(
            Shape::area(
                ShapeId::new(11),
                "Amn",
                &[Point::new(60.0, 20.0), Point::new(80.0, 40.0), Point::new(60.0, 60.0)],
            )
            .with_color(Color::rgba(1.0, 0.0, 0.0, 1.0)),
        );
        layer
    }

    #[test]
    fn zoom_gating() {
        let mut layer = towns();
        assert!(layer.is_visible_at(0.5));

        layer.min_zoom = Some(1.0);
        assert!(layer.is_visible_at(0.5), "one bound alone does not gate");

        layer.max_zoom = Some(3.0);
        assert!(!layer.is_visible_at(0.5));
        assert!(layer.is_visible_at(1.0));
        assert!(layer.is_visible_at(3.0));
        assert!(!layer.is_visible_at(3.5));

        layer.visible = false;
        assert!(!layer.is_visible_at(2.0));
    }

    #[test]
    fn zero_zoom_bound_counts_as_unset() {
        let mut layer = towns();
        layer.min_zoom = Some(0.0);
        layer.max_zoom = Some(3.0);
        assert!(layer.is_visible_at(5.0));

        layer.min_zoom = Some(1.0);
        assert!(!layer.is_visible_at(5.0));
    }

    #[test]
    fn layer_without_visible_field_is_hidden() {
        let layer: Layer = serde_json::from_str(
            r##"{"id":7,"name":"Ruins","iconUrl":"/icons/ruin.svg","color":"#888"}"##,
        )
        .unwrap();
        assert!(!layer.visible);
        assert!(!layer.is_visible_at(1.0));
        assert!(layer.paths.is_empty());
    }

    #[test]
    fn shape_kind_comes_from_collection() {
        let mut layer: Layer = serde_json::from_str(
            r##"{
                "id": 1, "name": "Towns", "visible": true,
                "iconUrl": "/icons/house.svg", "color": "#fff",
                "paths": [{"id": 10, "layerId": 1, "name": "Coast",
                           "points": [{"x":0,"y":0},{"x":1,"y":1}]}],
                "areas": [{"id": 11, "name": "Amn", "strokeType": "dashed",
                           "points": [{"x":0,"y":0},{"x":1,"y":0},{"x":0,"y":1}]}]
            }"##,
        )
        .unwrap();

        assert_eq!(layer.paths[0].kind, ShapeKind::path());
        assert_eq!(layer.areas[0].kind, ShapeKind::Area);

        // An edit of a loaded shape lands back in the collection it came from.
        let mut coast = layer.shape(ShapeSlot::Path, ShapeId::new(10)).unwrap().clone();
        coast.name = "Sword Coast".into();
        assert!(layer.replace_shape(coast));
        assert_eq!(layer.paths[0].name, "Sword Coast");

        let json = serde_json::to_value(&layer).unwrap();
        assert!(json["paths"][0].get("kind").is_none());
        assert_eq!(json["paths"][0]["strokeWidth"], 2.0);
        assert!(json["areas"][0].get("strokeType").is_none());
    }

    #[test]
    fn misfiled_shape_is_not_found() {
        let mut layer = towns();
        layer.paths.push(Shape::area(ShapeId::new(20), "stray", &[]));
        assert_eq!(layer.shape(ShapeSlot::Path, ShapeId::new(20)), None);
    }

    #[test]
    fn children_inherit_layer_defaults() {
        let layer = towns();
        assert_eq!(layer.effective_color(&layer.paths[0]), Color::WHITE);
        assert_eq!(
            layer.effective_color(&layer.areas[0]),
            Color::rgba(1.0, 0.0, 0.0, 1.0)
        );
        assert_eq!(layer.effective_icon(&layer.markers[0]), "/icons/house.svg");
    }

    #[test]
    fn replace_addresses_by_id_and_kind() {
        let mut layer = towns();
        let mut coast = layer.paths[0].clone();
        coast.name = "Sword Coast".into();
        assert!(layer.replace_shape(coast));
        assert_eq!(layer.paths[0].name, "Sword Coast");

        // An area with a path's id goes nowhere.
        let stray = Shape::area(ShapeId::new(10), "x", &[]);
        assert!(!layer.replace_shape(stray));
        assert_eq!(layer.areas.len(), 1);
    }

    #[test]
    fn add_and_remove_shapes() {
        let mut layer = towns();
        let id = layer.next_shape_id();
        assert_eq!(id, ShapeId::new(12));
        assert!(layer.add_shape(Shape::path(id, "new", &[])));
        assert!(!layer.add_shape(Shape::area(id, "dup", &[])));
        assert!(layer.remove_shape(ShapeSlot::Path, id));
        assert!(!layer.remove_shape(ShapeSlot::Path, id));
        assert!(layer.shape(ShapeSlot::Area, ShapeId::new(11)).is_some());
    }

    #[test]
    fn markers_move_and_remove() {
        let mut layer = towns();
        assert!(layer.move_marker(MarkerId::new(0), Point::new(1.0, 2.0)));
        assert_eq!(layer.marker(MarkerId::new(0)).unwrap().position(), Point::new(1.0, 2.0));
        assert!(!layer.move_marker(MarkerId::new(9), Point::new(1.0, 2.0)));
        assert!(layer.remove_marker(MarkerId::new(0)));
        assert!(layer.markers.is_empty());
    }

    #[test]
    fn layer_reorder_is_a_permutation() {
        let mut map = MapModel::default();
        for i in 0..4 {
            map.push_layer(Layer::new(LayerId::new(i), format!("L{i}"), Color::WHITE, ""));
        }
        assert!(map.move_layer(0, 2));
        let order: Vec<u64> = map.layers.iter().map(|l| l.id.get()).collect();
        assert_eq!(order, vec![1, 2, 0, 3]);
        assert!(!map.move_layer(4, 0));
        assert_eq!(map.layers.len(), 4);
    }

    #[test]
    fn visible_layers_keep_z_order() {
        let mut map = MapModel::default();
        for i in 0..3 {
            map.push_layer(Layer::new(LayerId::new(i), format!("L{i}"), Color::WHITE, ""));
        }
        map.layer_mut(LayerId::new(1)).unwrap().visible = false;
        let ids: Vec<u64> = map.visible_layers(1.0).map(|l| l.id.get()).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn copies_share_untouched_layers() {
        let mut map = MapModel::default();
        map.push_layer(towns());
        map.push_layer(Layer::new(LayerId::new(2), "Cities", Color::WHITE, ""));
        let before = map.clone();

        map.layer_mut(LayerId::new(1)).unwrap().name = "Villages".into();

        assert!(!Arc::ptr_eq(&map.layers[0], &before.layers[0]));
        assert!(Arc::ptr_eq(&map.layers[1], &before.layers[1]));
        assert_eq!(before.layers[0].name, "Towns");
    }
}
