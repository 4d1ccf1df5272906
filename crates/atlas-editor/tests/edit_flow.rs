//! Integration tests: pointer events routed through `ShapeEditor` into
//! `MapStore`, across crate boundaries.

use atlas_core::map::ShapeSlot;
use atlas_core::{Color, Layer, LayerId, MapModel, Point, Shape, ShapeId};
use atlas_editor::{
    BoundingBox, CoordinateMapper, EditOutcome, EditorConfig, InputEvent, MapStore, PointerTarget,
    PointerTracking, ShapeEditor,
};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::sync::Arc;

const LAYER: LayerId = LayerId::new(4524535);
const COAST: ShapeId = ShapeId::new(665481);
const AMN: ShapeId = ShapeId::new(984626);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn make_store() -> MapStore {
    let mut layer = Layer::new(LAYER, "Towns", Color::WHITE, "/icons/house.svg");
    layer.paths.push(Shape::path(
        COAST,
        "The Sword Coast",
        &[Point::new(20.0, 20.0), Point::new(40.0, 40.0), Point::new(20.0, 60.0)],
    ));
    layer.areas.push(Shape::area(
        AMN,
        "Amn",
        &[
            Point::new(60.0, 20.0),
            Point::new(80.0, 40.0),
            Point::new(60.0, 60.0),
            Point::new(40.0, 40.0),
        ],
    ));
    MapStore::new(MapModel {
        name: "Faerun".into(),
        image_url: "/faerun.jpg".into(),
        layers: vec![Arc::new(layer)],
    })
}

/// Route an event for one shape and commit whatever the editor produces.
fn dispatch<P: atlas_editor::BoundsProvider>(
    store: &mut MapStore,
    editor: &mut ShapeEditor,
    mapper: &CoordinateMapper<P>,
    slot: ShapeSlot,
    id: ShapeId,
    event: InputEvent,
    target: PointerTarget,
) -> Vec<EditOutcome> {
    let shape = store.shape(LAYER, slot, id).unwrap().clone();
    let outcomes = editor.handle(&event, target, &shape, mapper).unwrap();
    for outcome in &outcomes {
        if let EditOutcome::Commit(next) = outcome {
            assert!(store.commit(LAYER, next.clone()));
        }
    }
    outcomes
}

#[test]
fn desktop_drag_commits_once_on_release() {
    init_logging();
    let mut store = make_store();
    let mut editor = ShapeEditor::default();
    let mapper = CoordinateMapper::new(BoundingBox::new(100.0, 0.0, 400.0, 200.0));
    let before = store.snapshot();

    let mut send = |event, target| {
        dispatch(&mut store, &mut editor, &mapper, ShapeSlot::Path, COAST, event, target)
    };

    send(InputEvent::Click { x: 220.0, y: 60.0 }, PointerTarget::Body);
    send(InputEvent::PointerDown { x: 260.0, y: 80.0 }, PointerTarget::Vertex(1));
    for step in 0..5 {
        let x = 260.0 + step as f64 * 10.0;
        let out = send(InputEvent::PointerMove { x, y: 80.0 }, PointerTarget::Background);
        assert!(matches!(out.as_slice(), [EditOutcome::Preview(_)]));
    }
    let out = send(InputEvent::PointerUp { x: 300.0, y: 100.0 }, PointerTarget::Background);
    assert_eq!(out.len(), 1);

    let coast = store.shape(LAYER, ShapeSlot::Path, COAST).unwrap();
    assert_eq!(coast.points[1], Point::new(50.0, 50.0));
    // Previews never touched the earlier snapshot.
    assert_eq!(before.layers[0].paths[0].points[1], Point::new(40.0, 40.0));
}

#[test]
fn touch_drag_survives_missing_release() {
    init_logging();
    let mut store = make_store();
    let mut editor = ShapeEditor::new(EditorConfig::touch());
    assert_eq!(editor.config().tracking, PointerTracking::Discrete);
    let mapper = CoordinateMapper::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0));

    let mut send = |event, target| {
        dispatch(&mut store, &mut editor, &mapper, ShapeSlot::Area, AMN, event, target)
    };

    send(InputEvent::Click { x: 60.0, y: 40.0 }, PointerTarget::Body);
    send(InputEvent::PointerDown { x: 80.0, y: 40.0 }, PointerTarget::Vertex(1));
    // The tap on the handle itself arrives as a click on that handle.
    assert!(send(InputEvent::Click { x: 80.0, y: 40.0 }, PointerTarget::Vertex(1)).is_empty());
    // No move tracking and no release on touch.
    assert!(send(InputEvent::PointerMove { x: 85.0, y: 40.0 }, PointerTarget::Background).is_empty());
    let out = send(InputEvent::Click { x: 90.0, y: 30.0 }, PointerTarget::Background);
    assert_eq!(out.len(), 1);

    let amn = store.shape(LAYER, ShapeSlot::Area, AMN).unwrap();
    assert_eq!(amn.points[1], Point::new(90.0, 30.0));
}

#[test]
fn pan_between_events_is_honoured() {
    init_logging();
    let mut store = make_store();
    let mut editor = ShapeEditor::default();
    let left = Cell::new(0.0);
    let mapper = CoordinateMapper::new(|| Some(BoundingBox::new(left.get(), 0.0, 100.0, 100.0)));

    let shape = store.shape(LAYER, ShapeSlot::Path, COAST).unwrap().clone();
    editor
        .handle(&InputEvent::Click { x: 30.0, y: 30.0 }, PointerTarget::Body, &shape, &mapper)
        .unwrap();
    editor
        .handle(&InputEvent::PointerDown { x: 20.0, y: 20.0 }, PointerTarget::Vertex(0), &shape, &mapper)
        .unwrap();

    left.set(50.0);
    let out = editor
        .handle(&InputEvent::PointerUp { x: 60.0, y: 25.0 }, PointerTarget::Background, &shape, &mapper)
        .unwrap();
    match out.as_slice() {
        [EditOutcome::Commit(next)] => {
            assert_eq!(next.points[0], Point::new(10.0, 25.0));
            assert!(store.commit(LAYER, next.clone()));
        }
        other => panic!("expected commit, got {other:?}"),
    }
}

#[test]
fn add_then_delete_point_round_trips() {
    init_logging();
    let mut store = make_store();
    let mut editor = ShapeEditor::default();
    let mapper = CoordinateMapper::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
    let original = store.shape(LAYER, ShapeSlot::Area, AMN).unwrap().clone();

    editor
        .handle(&InputEvent::Click { x: 71.0, y: 29.0 }, PointerTarget::Body, &original, &mapper)
        .unwrap();
    let grown = editor.add_point(&original).unwrap();
    assert_eq!(grown.points[1], Point::new(71.0, 29.0));
    assert!(store.commit(LAYER, grown));

    let current = store.shape(LAYER, ShapeSlot::Area, AMN).unwrap().clone();
    let shrunk = editor.delete_point(&current, 1).unwrap();
    assert!(store.commit(LAYER, shrunk));
    assert_eq!(store.shape(LAYER, ShapeSlot::Area, AMN), Some(&original));
}

#[test]
fn area_never_drops_below_three_points() {
    let mut store = make_store();
    let editor = ShapeEditor::default();

    for _ in 0..3 {
        let amn = store.shape(LAYER, ShapeSlot::Area, AMN).unwrap().clone();
        if let Some(next) = editor.delete_point(&amn, 0) {
            store.commit(LAYER, next);
        }
    }
    assert_eq!(store.shape(LAYER, ShapeSlot::Area, AMN).unwrap().points.len(), 3);

    let coast = store.shape(LAYER, ShapeSlot::Path, COAST).unwrap().clone();
    let two = editor.delete_point(&coast, 2).unwrap();
    assert_eq!(editor.delete_point(&two, 0), None);
}
