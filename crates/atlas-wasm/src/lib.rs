//! WASM bridge for Atlas. Exposes the map store and shape editor to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns rendering and
//! its own hit testing; it tells the canvas what the pointer is over and
//! gets back JSON describing previews, commits and hover changes.

use atlas_core::map::ShapeSlot;
use atlas_core::{LayerId, MapModel, Point, ShapeId};
use atlas_editor::{
    BoundingBox, CoordinateMapper, EditOutcome, EditorConfig, InputEvent, MapMutation, MapStore,
    PointerTarget, PointerTracking, ShapeEditor,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Largest integer a JS number represents exactly (`Number.MAX_SAFE_INTEGER`).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Supplies the map container's current rect. Called once per event.
type ContainerProvider = Box<dyn Fn() -> Option<BoundingBox>>;

/// The shape currently opened for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selection {
    layer: LayerId,
    slot: ShapeSlot,
    id: ShapeId,
}

/// What a pointer handler reports back to the page.
#[derive(Debug, Default, Serialize)]
struct EventResult {
    /// The map document changed; re-read `map_json()`.
    changed: bool,
    /// Points to draw for the edited shape in place of its stored ones.
    preview: Option<Vec<Point>>,
    /// `"enter"` or `"leave"` when the hover state flipped.
    hover: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl EventResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// The main WASM-facing controller.
///
/// Holds the canonical map store and the editor for the selected shape.
/// All interaction from the page goes through this struct.
#[wasm_bindgen]
pub struct MapCanvas {
    store: MapStore,
    editor: ShapeEditor,
    config: EditorConfig,
    selection: Option<Selection>,
    /// Asked for the container rect on every event, so pan and zoom between
    /// events are always seen. Reports `None` until the page registers one.
    container: ContainerProvider,
    zoom: f64,
}

impl Default for MapCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl MapCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();

        let config = EditorConfig::default();
        Self {
            store: MapStore::default(),
            editor: ShapeEditor::new(config),
            config,
            selection: None,
            container: Box::new(|| None),
            zoom: 1.0,
        }
    }

    /// Load a map document. Returns `false` on malformed JSON.
    pub fn set_map_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<MapModel>(json) {
            Ok(map) => {
                self.store.replace_map(map);
                self.selection = None;
                self.editor.reset();
                true
            }
            Err(e) => {
                log::warn!("rejected map document: {e}");
                false
            }
        }
    }

    /// The current map document as JSON.
    pub fn map_json(&self) -> String {
        serde_json::to_string(self.store.map()).unwrap_or_default()
    }

    /// Apply editor settings, e.g. `{"tracking":"discrete"}`.
    pub fn set_config_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<EditorConfig>(json) {
            Ok(config) => {
                self.apply_config(config);
                true
            }
            Err(e) => {
                log::warn!("rejected editor config: {e}");
                false
            }
        }
    }

    /// Switch between tap-to-place (touch) and press-drag-release dragging.
    pub fn set_touch_mode(&mut self, touch: bool) {
        let tracking = if touch {
            PointerTracking::Discrete
        } else {
            PointerTracking::Continuous
        };
        self.apply_config(EditorConfig {
            tracking,
            ..self.config
        });
    }

    /// Register a function returning the map container's current rect,
    /// typically `() => el.getBoundingClientRect()`. Any object with
    /// numeric `left`, `top`, `width` and `height` works.
    pub fn set_container_provider(&mut self, provider: js_sys::Function) {
        self.container = Box::new(move || {
            let rect = provider.call0(&JsValue::NULL).ok()?;
            read_rect(&rect)
        });
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Ids of the layers shown at the current zoom, in z-order.
    pub fn visible_layers_json(&self) -> String {
        let ids: Vec<LayerId> = self
            .store
            .map()
            .visible_layers(self.zoom)
            .map(|l| l.id)
            .collect();
        serde_json::to_string(&ids).unwrap_or_default()
    }

    /// Open a shape for editing. Returns `false` if it doesn't exist.
    pub fn select_shape(&mut self, layer_id: f64, shape_id: f64, is_area: bool) -> bool {
        let (Some(layer), Some(id)) = (id_from_js(layer_id), id_from_js(shape_id)) else {
            log::debug!("select_shape: bad id {layer_id} / {shape_id}");
            return false;
        };
        let selection = Selection {
            layer: LayerId::new(layer),
            slot: if is_area { ShapeSlot::Area } else { ShapeSlot::Path },
            id: ShapeId::new(id),
        };
        if self
            .store
            .shape(selection.layer, selection.slot, selection.id)
            .is_none()
        {
            return false;
        }
        if self.selection != Some(selection) {
            self.editor.reset();
            self.selection = Some(selection);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.editor.reset();
        self.selection = None;
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_editing()
    }

    /// Pointer pressed. `vertex` is the handle index under the pointer, or -1.
    pub fn handle_pointer_down(&mut self, x: f64, y: f64, vertex: i32, on_body: bool) -> String {
        self.dispatch(InputEvent::PointerDown { x, y }, target(vertex, on_body))
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64, vertex: i32, on_body: bool) -> String {
        self.dispatch(InputEvent::PointerMove { x, y }, target(vertex, on_body))
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64, vertex: i32, on_body: bool) -> String {
        self.dispatch(InputEvent::PointerUp { x, y }, target(vertex, on_body))
    }

    pub fn handle_click(&mut self, x: f64, y: f64, vertex: i32, on_body: bool) -> String {
        self.dispatch(InputEvent::Click { x, y }, target(vertex, on_body))
    }

    /// Insert a vertex where the selected shape was last clicked.
    pub fn add_point(&mut self) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let Some(shape) = self.store.shape(sel.layer, sel.slot, sel.id).cloned() else {
            return false;
        };
        match self.editor.add_point(&shape) {
            Some(next) => self.store.commit(sel.layer, next),
            None => false,
        }
    }

    pub fn delete_point(&mut self, index: u32) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let Some(shape) = self.store.shape(sel.layer, sel.slot, sel.id) else {
            return false;
        };
        match self.editor.delete_point(shape, index as usize) {
            Some(next) => self.store.commit(sel.layer, next),
            None => false,
        }
    }

    /// Whether the "delete point" button should be enabled.
    pub fn can_delete_point(&self) -> bool {
        self.selected_shape()
            .is_some_and(|s| self.editor.can_delete_point(s))
    }

    /// Remove the selected shape entirely.
    pub fn delete_shape(&mut self) -> bool {
        let Some(sel) = self.selection.take() else {
            return false;
        };
        self.editor.reset();
        self.store.apply(MapMutation::RemoveShape {
            layer: sel.layer,
            slot: sel.slot,
            id: sel.id,
        })
    }

    /// Reorder layers (sidebar drag and drop).
    pub fn move_layer(&mut self, from: u32, to: u32) -> bool {
        self.store.apply(MapMutation::MoveLayer {
            from: from as usize,
            to: to as usize,
        })
    }

    pub fn set_layer_visible(&mut self, layer_id: f64, visible: bool) -> bool {
        let Some(layer) = id_from_js(layer_id) else {
            log::debug!("set_layer_visible: bad id {layer_id}");
            return false;
        };
        self.store.apply(MapMutation::SetLayerVisible {
            layer: LayerId::new(layer),
            visible,
        })
    }

    /// Centroid of the selected shape, for placing its name label.
    /// Returns `null` when nothing is selected.
    pub fn label_anchor_json(&self) -> String {
        match self.selected_shape() {
            Some(shape) => point_json(ShapeEditor::label_anchor(shape)),
            None => "null".to_string(),
        }
    }

    /// Live drag preview for the selected shape, or `null` when no drag
    /// is running.
    pub fn preview_json(&self) -> String {
        match self.editor.preview() {
            Some(points) => serde_json::to_string(points).unwrap_or_default(),
            None => "null".to_string(),
        }
    }

    /// Aspect ratio used to draw normalized shapes into a square viewbox.
    pub fn scale_x(&self) -> f64 {
        let container = &self.container;
        CoordinateMapper::new(|| container()).scale_x()
    }
}

impl MapCanvas {
    /// Rust-side counterpart of `set_container_provider`.
    pub fn set_bounds_provider(&mut self, provider: impl Fn() -> Option<BoundingBox> + 'static) {
        self.container = Box::new(provider);
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

impl MapCanvas {
    fn apply_config(&mut self, config: EditorConfig) {
        self.config = config;
        self.editor = ShapeEditor::new(config);
    }

    fn selected_shape(&self) -> Option<&atlas_core::Shape> {
        let sel = self.selection?;
        self.store.shape(sel.layer, sel.slot, sel.id)
    }

    /// Route an event to the editor and commit what comes back.
    fn dispatch(&mut self, event: InputEvent, target: PointerTarget) -> String {
        let Some(sel) = self.selection else {
            return EventResult::default().to_json();
        };
        let Some(shape) = self.store.shape(sel.layer, sel.slot, sel.id).cloned() else {
            self.selection = None;
            return EventResult::default().to_json();
        };

        let container = &self.container;
        let mapper = CoordinateMapper::new(|| container());
        let outcomes = match self.editor.handle(&event, target, &shape, &mapper) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                log::warn!("{event:?} dropped: {e}");
                return EventResult {
                    error: Some(e.to_string()),
                    ..EventResult::default()
                }
                .to_json();
            }
        };

        let mut result = EventResult::default();
        for outcome in outcomes {
            match outcome {
                EditOutcome::Commit(next) => result.changed |= self.store.commit(sel.layer, next),
                EditOutcome::Preview(points) => result.preview = Some(points.to_vec()),
                EditOutcome::HoverEnter => result.hover = Some("enter"),
                EditOutcome::HoverLeave => result.hover = Some("leave"),
            }
        }
        result.to_json()
    }
}

fn target(vertex: i32, on_body: bool) -> PointerTarget {
    match usize::try_from(vertex) {
        Ok(index) => PointerTarget::Vertex(index),
        Err(_) if on_body => PointerTarget::Body,
        Err(_) => PointerTarget::Background,
    }
}

/// A JS number that names an id: a whole number JS can hold exactly.
fn id_from_js(raw: f64) -> Option<u64> {
    (raw.fract() == 0.0 && (0.0..=MAX_SAFE_INTEGER).contains(&raw)).then_some(raw as u64)
}

fn read_rect(rect: &JsValue) -> Option<BoundingBox> {
    let field = |name: &str| js_sys::Reflect::get(rect, &JsValue::from_str(name)).ok()?.as_f64();
    Some(BoundingBox::new(
        field("left")?,
        field("top")?,
        field("width")?,
        field("height")?,
    ))
}

fn point_json(p: Point) -> String {
    serde_json::to_string(&p).unwrap_or_default()
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Atlas WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone geometry functions (no canvas needed) ────────────────────

/// Ray-cast test of `point` (`{"x":..,"y":..}`) against a polygon given as
/// a JSON point array. Malformed input is never inside.
#[wasm_bindgen]
pub fn is_inside_json(point: &str, polygon: &str) -> bool {
    let (Ok(point), Ok(polygon)) = (
        serde_json::from_str::<Point>(point),
        serde_json::from_str::<Vec<Point>>(polygon),
    ) else {
        return false;
    };
    atlas_core::is_inside(point, &polygon)
}

/// Index at which `point` would be inserted into `points`, or -1.
#[wasm_bindgen]
pub fn insertion_index_json(point: &str, points: &str, closed: bool) -> i32 {
    let (Ok(point), Ok(points)) = (
        serde_json::from_str::<Point>(point),
        serde_json::from_str::<Vec<Point>>(points),
    ) else {
        return -1;
    };
    atlas_core::locate_insertion_index(point, &points, closed)
        .and_then(|i| i32::try_from(i).ok())
        .unwrap_or(-1)
}
