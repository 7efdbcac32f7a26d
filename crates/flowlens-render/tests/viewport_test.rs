use flowlens_core::{EdgeListFormat, ProcessGraph, parse};
use flowlens_render::viewport::{FRAME_INTERVAL, MAX_SCALE, MIN_SCALE};
use flowlens_render::{Interaction, LayoutStrategy, Viewport, ViewportController, layout};
use std::time::{Duration, Instant};

fn graph_of(raw: &str) -> ProcessGraph {
    parse::parse(raw, EdgeListFormat::Whitespace).unwrap()
}

fn controller(raw: &str) -> ViewportController {
    let graph = graph_of(raw);
    let viewport = Viewport::new(800.0, 600.0);
    let placed = layout::layout(&graph, &viewport, LayoutStrategy::Grid).unwrap();
    ViewportController::new(graph, &placed, viewport).unwrap()
}

#[test]
fn zoom_keeps_the_anchored_point_fixed() {
    let mut c = controller("A B\nB C");
    c.zoom(1.5, 200.0, 150.0);
    let anchor_in_graph = c.to_graph(200.0, 150.0);

    c.zoom(1.5, 200.0, 150.0);
    let (sx, sy) = c.to_screen(anchor_in_graph.0, anchor_in_graph.1);
    assert!((sx - 200.0).abs() < 1e-9);
    assert!((sy - 150.0).abs() < 1e-9);
}

#[test]
fn zoom_is_clamped_at_both_ends() {
    let mut c = controller("A B");
    for _ in 0..40 {
        c.zoom(1.2, 0.0, 0.0);
    }
    assert_eq!(c.scale(), MAX_SCALE);
    for _ in 0..80 {
        c.zoom(0.8, 0.0, 0.0);
    }
    assert_eq!(c.scale(), MIN_SCALE);
}

#[test]
fn pointer_down_on_a_node_starts_a_drag() {
    let mut c = controller("A B\nB C\nC D");
    let start = c.graph().node("A").unwrap().position;
    let (x, y) = c.to_screen(start.x, start.y);

    c.pointer_down(x, y);
    assert!(matches!(
        c.interaction(),
        Interaction::DraggingNode { node_id, .. } if node_id == "A"
    ));

    c.pointer_move(x + 30.0, y + 10.0);
    let moved = c.graph().node("A").unwrap().position;
    assert!((moved.x - (start.x + 30.0)).abs() < 1e-9);
    assert!((moved.y - (start.y + 10.0)).abs() < 1e-9);

    c.pointer_up();
    assert_eq!(*c.interaction(), Interaction::Idle);
}

#[test]
fn drag_moves_exactly_the_hit_node() {
    let mut c = controller("A B\nB C\nC D");
    let before_b = c.graph().node("B").unwrap().position;
    let a = c.graph().node("A").unwrap().position;
    let (x, y) = c.to_screen(a.x, a.y);

    c.pointer_down(x, y);
    c.pointer_move(x + 50.0, y);
    c.pointer_up();

    let after_a = c.graph().node("A").unwrap().position;
    assert!((after_a.x - (a.x + 50.0)).abs() < 1e-9);
    assert_eq!(c.graph().node("B").unwrap().position, before_b);
}

#[test]
fn pointer_down_on_empty_space_pans() {
    let mut c = controller("A B");
    c.pointer_down(5.0, 5.0);
    assert!(matches!(c.interaction(), Interaction::Panning { .. }));

    c.pointer_move(25.0, 15.0);
    assert_eq!(c.pan(), (20.0, 10.0));

    c.pointer_move(30.0, 15.0);
    assert_eq!(c.pan(), (25.0, 10.0));

    c.pointer_up();
    assert_eq!(*c.interaction(), Interaction::Idle);
}

#[test]
fn pan_offsets_survive_zoom() {
    let mut c = controller("A B");
    c.pointer_down(5.0, 5.0);
    c.pointer_move(45.0, 25.0);
    c.pointer_up();
    let before = c.to_graph(100.0, 100.0);
    c.zoom(1.2, 100.0, 100.0);
    let after = c.to_graph(100.0, 100.0);
    assert!((before.0 - after.0).abs() < 1e-9);
    assert!((before.1 - after.1).abs() < 1e-9);
}

#[test]
fn hit_test_honors_the_current_transform() {
    let mut c = controller("A B\nB C");
    let a = c.graph().node("A").unwrap().position;
    c.zoom(1.5, 400.0, 300.0);
    let (sx, sy) = c.to_screen(a.x, a.y);
    assert_eq!(c.hit_test(sx, sy), Some("A"));
    assert_eq!(c.hit_test(-1000.0, -1000.0), None);
}

#[test]
fn reset_view_restores_the_identity_transform() {
    let mut c = controller("A B");
    c.zoom(2.0, 10.0, 10.0);
    c.pointer_down(1.0, 1.0);
    c.pointer_move(50.0, 50.0);
    c.pointer_up();
    c.reset_view();
    assert_eq!(c.scale(), 1.0);
    assert_eq!(c.pan(), (0.0, 0.0));
}

#[test]
fn redraw_gate_admits_one_frame_per_interval() {
    let mut c = controller("A B");
    let t0 = Instant::now();
    assert!(c.take_frame(t0));
    // Nothing changed since the draw.
    assert!(!c.take_frame(t0 + FRAME_INTERVAL * 2));

    c.request_redraw();
    c.request_redraw();
    // Pending draw inside the interval is dropped, not deferred.
    assert!(!c.take_frame(t0 + Duration::from_millis(5)));
    assert!(c.take_frame(t0 + FRAME_INTERVAL));
    assert!(!c.take_frame(t0 + FRAME_INTERVAL));
}

#[test]
fn toggle_subprocess_hides_adjacent_sub_steps_only() {
    let mut c = controller("Review draft\nReview publish\ndraft Archive");
    assert!(c.toggle_subprocess("Review"));

    let graph = c.graph();
    assert!(!graph.node("draft").unwrap().visible);
    assert!(!graph.node("publish").unwrap().visible);
    assert!(graph.node("Review").unwrap().visible);
    assert!(graph.node("Archive").unwrap().visible);
    // Edges touching hidden nodes follow them.
    for edge in graph.edges() {
        if edge.source == "draft" || edge.target == "draft" {
            assert!(!edge.visible);
        }
    }

    // Toggling again restores everything.
    assert!(c.toggle_subprocess("Review"));
    assert!(c.graph().node("draft").unwrap().visible);
    assert!(c.graph().edges().iter().all(|e| e.visible));
}

#[test]
fn toggle_subprocess_ignores_sub_nodes() {
    let mut c = controller("Review draft");
    assert!(!c.toggle_subprocess("draft"));
    assert!(!c.toggle_subprocess("missing"));
}

#[test]
fn replace_graph_resets_the_view() {
    let mut c = controller("A B");
    c.zoom(2.0, 10.0, 10.0);
    let next = graph_of("X Y\nY Z");
    let placed = layout::layout(&next, &c.viewport(), LayoutStrategy::Circular).unwrap();
    c.replace_graph(next, &placed);
    assert_eq!(c.scale(), 1.0);
    assert_eq!(c.pan(), (0.0, 0.0));
    assert!(c.graph().node("X").is_some());
    assert!(c.graph().node("A").is_none());
}
