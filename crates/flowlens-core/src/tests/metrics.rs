use crate::*;

fn graph_of(raw: &str) -> ProcessGraph {
    parse::parse(raw, EdgeListFormat::Whitespace).unwrap()
}

#[test]
fn cycle_time_is_zero_for_no_paths() {
    assert_eq!(metrics::cycle_time(&[]), 0.0);
}

#[test]
fn cycle_time_is_mean_path_length_in_nodes() {
    let paths: Vec<ProcessPath> = vec![
        vec!["A".into(), "B".into(), "C".into()],
        vec!["A".into(), "B".into(), "C".into(), "D".into(), "E".into()],
    ];
    assert_eq!(metrics::cycle_time(&paths), 4.0);
}

#[test]
fn chain_scenario_metrics() {
    let graph = graph_of("A B\nB C\nC D");
    let paths = paths::find_all_paths(&graph, &PathLimits::default());
    let snapshot = metrics::snapshot(&graph, &paths);
    assert_eq!(snapshot.cycle_time, 4.0);
    assert_eq!(snapshot.variant_count, 1);
    assert!(snapshot.bottlenecks.is_empty());
}

#[test]
fn fan_out_has_no_bottlenecks() {
    let graph = parse::parse("X,Y\nX,Z", EdgeListFormat::Csv).unwrap();
    let paths = paths::find_all_paths(&graph, &PathLimits::default());
    let snapshot = metrics::snapshot(&graph, &paths);
    assert_eq!(snapshot.variant_count, 2);
    assert!(snapshot.bottlenecks.is_empty());
}

#[test]
fn convergence_is_reported_as_a_bottleneck() {
    let graph = graph_of("A B\nC B\nD B");
    let bottlenecks = metrics::bottlenecks(&graph);
    assert_eq!(bottlenecks.len(), 1);
    assert_eq!(bottlenecks[0].node_id, "B");
    assert_eq!(bottlenecks[0].incoming_count, 3);
    assert_eq!(bottlenecks[0].category, BottleneckCategory::MainProcess);
}

#[test]
fn bottleneck_category_follows_naming_convention() {
    let graph = graph_of("A =join\nB =join\nC review\nD review");
    let bottlenecks = metrics::bottlenecks(&graph);
    let by_id: Vec<(&str, BottleneckCategory)> = bottlenecks
        .iter()
        .map(|b| (b.node_id.as_str(), b.category))
        .collect();
    assert!(by_id.contains(&("=join", BottleneckCategory::MergePoint)));
    assert!(by_id.contains(&("review", BottleneckCategory::Subprocess)));
}

#[test]
fn parallel_edges_count_individually() {
    let graph = graph_of("A B\nA B");
    let bottlenecks = metrics::bottlenecks(&graph);
    assert_eq!(bottlenecks[0].node_id, "B");
    assert_eq!(bottlenecks[0].incoming_count, 2);
}

#[test]
fn bottleneck_detail_is_capped_and_sorted() {
    let mut raw = String::new();
    // hub0 gets 2 incoming edges, hub1 gets 3, ... hub6 gets 8.
    for (hub, count) in (0..7).map(|i| (format!("hub{i}"), i + 2)) {
        for j in 0..count {
            raw.push_str(&format!("src{hub}{j} {hub}\n"));
        }
    }
    let graph = graph_of(&raw);
    let bottlenecks = metrics::bottlenecks(&graph);
    assert_eq!(bottlenecks.len(), metrics::BOTTLENECK_DETAIL_LIMIT);
    let counts: Vec<usize> = bottlenecks.iter().map(|b| b.incoming_count).collect();
    assert_eq!(counts, vec![8, 7, 6, 5, 4]);
    assert_eq!(metrics::bottleneck_count(&graph), 7);
}

#[test]
fn ties_break_by_first_seen_order() {
    let graph = graph_of("a x\nb x\nc y\nd y");
    let bottlenecks = metrics::bottlenecks(&graph);
    assert_eq!(bottlenecks[0].node_id, "x");
    assert_eq!(bottlenecks[1].node_id, "y");
}

#[test]
fn snapshot_is_idempotent() {
    let graph = graph_of("A B\nC B\nB D");
    let paths = paths::find_all_paths(&graph, &PathLimits::default());
    let first = metrics::snapshot(&graph, &paths);
    let second = metrics::snapshot(&graph, &paths);
    assert_eq!(first, second);
}
