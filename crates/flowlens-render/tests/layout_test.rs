use flowlens_core::{EdgeListFormat, ProcessGraph, parse};
use flowlens_render::{LayoutStrategy, Viewport, layout};

fn graph_of(raw: &str) -> ProcessGraph {
    parse::parse(raw, EdgeListFormat::Whitespace).unwrap()
}

#[test]
fn grid_places_every_node_inside_the_viewport() {
    let graph = graph_of("A B\nB C\nC D\nD E\nE F");
    let viewport = Viewport::new(800.0, 600.0);
    let placed = layout::layout(&graph, &viewport, LayoutStrategy::Grid).unwrap();
    assert_eq!(placed.len(), graph.node_count());
    for (_, placement) in placed.iter() {
        assert!(placement.position.x >= 0.0 && placement.position.x <= viewport.width);
        assert!(placement.position.y >= 0.0 && placement.position.y <= viewport.height);
        assert!(placement.radius > 0.0);
    }
}

#[test]
fn grid_positions_are_distinct() {
    let graph = graph_of("A B\nB C\nC D\nD E");
    let viewport = Viewport::new(640.0, 480.0);
    let placed = layout::layout(&graph, &viewport, LayoutStrategy::Grid).unwrap();
    let mut seen: Vec<(i64, i64)> = Vec::new();
    for (_, p) in placed.iter() {
        let key = ((p.position.x * 10.0) as i64, (p.position.y * 10.0) as i64);
        assert!(!seen.contains(&key), "overlapping placement");
        seen.push(key);
    }
}

#[test]
fn single_node_lands_in_the_grid_center() {
    let mut graph = ProcessGraph::new();
    graph.push_edge("A", "A");
    let viewport = Viewport::new(400.0, 400.0);
    let placed = layout::layout(&graph, &viewport, LayoutStrategy::Grid).unwrap();
    let placement = placed.get("A").unwrap();
    assert_eq!(placement.position.x, 200.0);
    assert_eq!(placement.position.y, 200.0);
}

#[test]
fn circular_nodes_sit_on_one_ring() {
    let graph = graph_of("A B\nB C\nC D\nD A");
    let viewport = Viewport::new(500.0, 500.0);
    let placed = layout::layout(&graph, &viewport, LayoutStrategy::Circular).unwrap();
    let (cx, cy) = (250.0, 250.0);
    let mut distances: Vec<f64> = Vec::new();
    for (_, p) in placed.iter() {
        let d = ((p.position.x - cx).powi(2) + (p.position.y - cy).powi(2)).sqrt();
        distances.push(d);
    }
    for pair in distances.windows(2) {
        assert!((pair[0] - pair[1]).abs() < 1e-9);
    }
    // Twelve o'clock first.
    let first = placed.get("A").unwrap();
    assert!((first.position.x - cx).abs() < 1e-9);
    assert!(first.position.y < cy);
}

#[test]
fn layout_preserves_first_seen_order() {
    let graph = graph_of("C A\nA B");
    let viewport = Viewport::new(300.0, 300.0);
    let placed = layout::layout(&graph, &viewport, LayoutStrategy::Grid).unwrap();
    let ids: Vec<&str> = placed.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["C", "A", "B"]);
}

#[test]
fn zero_area_viewport_is_a_setup_error() {
    let graph = graph_of("A B");
    let err = layout::layout(&graph, &Viewport::new(0.0, 480.0), LayoutStrategy::Grid).unwrap_err();
    assert!(matches!(err, flowlens_render::Error::Setup { .. }));
}

#[test]
fn strategy_parses_from_cli_names() {
    assert_eq!("grid".parse::<LayoutStrategy>(), Ok(LayoutStrategy::Grid));
    assert_eq!(
        "circular".parse::<LayoutStrategy>(),
        Ok(LayoutStrategy::Circular)
    );
    assert!("spiral".parse::<LayoutStrategy>().is_err());
}
