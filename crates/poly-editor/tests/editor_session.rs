//! Integration tests: scripted editor sessions.
//!
//! Exercises input routing → mode state machine → polygon operations.

use poly_core::{ConstraintKind, EngineConfig, Point2d, Polygon};
use poly_editor::{Editor, EditorConfig, InputEvent, Mode, parse_script};
use pretty_assertions::assert_eq;

fn p(x: f64, y: f64) -> Point2d {
    Point2d::new(x, y)
}

fn run(editor: &mut Editor, script: &str) {
    for event in parse_script(script).unwrap() {
        editor.handle(&event);
    }
}

fn square() -> Polygon {
    Polygon::from_vertices(&[p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0), p(0.0, 100.0)]).unwrap()
}

fn dbl(x: f64, y: f64) -> InputEvent {
    InputEvent::DoubleClick { x, y }
}

// ─── Creation ────────────────────────────────────────────────────────────

#[test]
fn three_double_clicks_make_a_triangle() {
    let mut editor = Editor::default();
    editor.handle(&InputEvent::key("e"));
    assert_eq!(editor.title(), "Polygon creation mode");

    assert!(!editor.handle(&dbl(10.0, 10.0)));
    assert!(!editor.handle(&dbl(90.0, 10.0)));
    assert_eq!(editor.pending_clicks().len(), 2);
    assert!(editor.handle(&dbl(50.0, 80.0)));

    assert_eq!(editor.polygons().len(), 1);
    assert_eq!(
        editor.polygons()[0].vertices(),
        vec![p(10.0, 10.0), p(90.0, 10.0), p(50.0, 80.0)]
    );
    assert!(editor.pending_clicks().is_empty());
}

#[test]
fn space_spawns_sample() {
    let mut editor = Editor::default();
    assert!(editor.handle(&InputEvent::key(" ")));
    assert_eq!(editor.polygons().len(), 1);
    assert_eq!(editor.polygons()[0].vertex_count(), 7);
    assert_eq!(editor.ids().in_use(), 3);
}

// ─── Dragging ────────────────────────────────────────────────────────────

#[test]
fn drag_uses_previous_pointer_and_ctrl_moves_all() {
    let mut editor = Editor::default();
    run(
        &mut editor,
        "key e\n dbl 10 10\n dbl 90 10\n dbl 50 80\n key q\n\
         down 90 10\n move 95 20\n",
    );
    assert_eq!(
        editor.polygons()[0].vertices(),
        vec![p(10.0, 10.0), p(95.0, 20.0), p(50.0, 80.0)]
    );

    run(&mut editor, "move 100 30 ctrl\n up\n");
    assert_eq!(
        editor.polygons()[0].vertices(),
        vec![p(15.0, 20.0), p(100.0, 30.0), p(55.0, 90.0)]
    );
    assert_eq!(editor.last_pointer(), Some(p(100.0, 30.0)));
    assert_eq!(editor.polygons()[0].grabbed(), None);
}

#[test]
fn mode_switch_drops_grab() {
    let mut editor = Editor::default();
    editor.add_polygon(square());
    run(&mut editor, "down 0 0\n key w\n key q\n");
    assert!(!editor.handle(&InputEvent::PointerMove {
        x: 5.0,
        y: 5.0,
        ctrl: false
    }));
    assert_eq!(editor.polygons()[0].vertices()[0], p(0.0, 0.0));
}

#[test]
fn drags_ignored_outside_free_mode() {
    let mut editor = Editor::default();
    editor.add_polygon(square());
    run(&mut editor, "key d\n down 0 0\n move 5 5\n up\n");
    assert_eq!(editor.polygons()[0].vertices()[0], p(0.0, 0.0));
}

#[test]
fn unsatisfiable_drag_warns_and_rolls_back() {
    let config = EditorConfig::default().with_engine(EngineConfig {
        budget_per_vertex: 0,
        ..EngineConfig::default()
    });
    let mut editor = Editor::new(config);
    editor.add_polygon(square());
    run(&mut editor, "key a\n dbl 50 0\n dbl 100 50\n");
    assert_eq!(editor.mode(), Mode::Free);
    let before = editor.polygons()[0].vertices();

    run(&mut editor, "down 0 0\n move 0 40\n");
    assert_eq!(
        editor.take_warning().as_deref(),
        Some("could not satisfy constraints, try again")
    );
    assert_eq!(editor.polygons()[0].vertices(), before);
    assert!(editor.polygons()[0].is_correct());
    assert_eq!(editor.warning(), None);
}

// ─── Topology ────────────────────────────────────────────────────────────

#[test]
fn create_vertex_mode_splits_edge() {
    let mut editor = Editor::default();
    editor.add_polygon(square());
    run(&mut editor, "key w\n dbl 50 0\n");
    let poly = &editor.polygons()[0];
    assert_eq!(poly.vertex_count(), 5);
    assert_eq!(poly.vertices()[1], p(50.0, 0.0));
}

#[test]
fn delete_mode_removes_vertex() {
    let mut editor = Editor::default();
    editor.add_polygon(square());
    run(&mut editor, "key d\n dbl 100 100\n");
    assert_eq!(editor.title(), "Vertex deletion mode");
    assert_eq!(
        editor.polygons()[0].vertices(),
        vec![p(0.0, 0.0), p(100.0, 0.0), p(0.0, 100.0)]
    );
}

#[test]
fn deleting_triangle_vertex_removes_polygon_and_ids() {
    let mut editor = Editor::default();
    run(
        &mut editor,
        "key e\n dbl 10 10\n dbl 90 10\n dbl 50 80\n\
         key a\n dbl 50 10\n dbl 50 80\n",
    );
    assert_eq!(editor.ids().in_use(), 1);

    run(&mut editor, "key d\n dbl 10 10\n");
    assert!(editor.polygons().is_empty());
    assert_eq!(editor.ids().in_use(), 0);
}

#[test]
fn delete_on_edge_body_drops_constraint() {
    let mut editor = Editor::default();
    run(&mut editor, "key space\n key d\n dbl 175 150\n");
    let poly = &editor.polygons()[0];
    assert_eq!(poly.vertex_count(), 7);
    assert_eq!(poly.edge(poly.head()).unwrap().constraint(), None);
    assert_eq!(editor.ids().in_use(), 2);
}

// ─── Constraints ─────────────────────────────────────────────────────────

#[test]
fn perpendicular_mode_pairs_edges_and_returns_to_free() {
    let mut editor = Editor::default();
    editor.add_polygon(square());
    run(&mut editor, "key a\n dbl 50 0\n");
    assert_eq!(editor.pending_clicks(), &[p(50.0, 0.0)]);
    run(&mut editor, "dbl 100 50\n");

    assert_eq!(editor.mode(), Mode::Free);
    assert!(editor.pending_clicks().is_empty());
    let poly = &editor.polygons()[0];
    let c = poly.edge(poly.head()).unwrap().constraint().unwrap();
    assert_eq!(c.kind, ConstraintKind::Perpendicular);
    assert_eq!(editor.ids().in_use(), 1);
}

#[test]
fn equal_length_mode_pairs_opposite_edges() {
    let mut editor = Editor::default();
    editor.add_polygon(square());
    run(&mut editor, "key s\n dbl 50 0\n dbl 50 100\n");
    let poly = &editor.polygons()[0];
    let c = poly.edge(poly.head()).unwrap().constraint().unwrap();
    assert_eq!(c.kind, ConstraintKind::EqualLength);
    assert_eq!(poly.edge(c.partner).unwrap().begin(), p(100.0, 100.0));
}

#[test]
fn missed_second_click_restarts_pair() {
    let mut editor = Editor::default();
    editor.add_polygon(square());
    run(&mut editor, "key a\n dbl 50 0\n");
    assert!(!editor.handle(&dbl(50.0, 50.0)));
    assert_eq!(editor.mode(), Mode::SetPerpendicular);
    assert_eq!(editor.pending_clicks(), &[p(50.0, 50.0)]);
    assert_eq!(editor.ids().in_use(), 0);
}
