use crate::*;
use std::time::Duration;

fn test_pipeline() -> Pipeline {
    Pipeline::with_config(
        PathLimits::default(),
        NarratorConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(250),
        },
    )
    .unwrap()
}

#[test]
fn starts_with_no_dataset_and_zero_metrics() {
    let pipeline = test_pipeline();
    assert!(pipeline.dataset().is_none());
    assert_eq!(pipeline.metrics(), MetricsSnapshot::empty());
    assert_eq!(pipeline.report().cycle_time.value, "0.0");
    assert!(pipeline.narrate().is_none());
}

#[test]
fn load_replaces_the_dataset_wholesale() {
    let mut pipeline = test_pipeline();
    pipeline.load("A B\nB C\nC D", EdgeListFormat::Whitespace).unwrap();
    assert_eq!(pipeline.metrics().cycle_time, 4.0);

    pipeline.load("X,Y\nX,Z", EdgeListFormat::Csv).unwrap();
    let dataset = pipeline.dataset().unwrap();
    assert_eq!(dataset.graph.node_count(), 3);
    assert_eq!(pipeline.metrics().variant_count, 2);
}

#[test]
fn failed_load_keeps_the_previous_dataset() {
    let mut pipeline = test_pipeline();
    pipeline.load("A B", EdgeListFormat::Whitespace).unwrap();
    let err = pipeline.load("", EdgeListFormat::Whitespace).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert_eq!(pipeline.dataset().unwrap().graph.node_count(), 2);
}

#[test]
fn metrics_are_available_before_narration_runs() {
    let mut pipeline = test_pipeline();
    pipeline.load("A B\nB C", EdgeListFormat::Whitespace).unwrap();
    // Narration (which would block on the network) has not been requested yet.
    assert_eq!(pipeline.metrics().cycle_time, 3.0);
    let narration = pipeline.narrate().unwrap();
    assert!(narration.used_fallback);
}

#[test]
fn clear_discards_everything_derived() {
    let mut pipeline = test_pipeline();
    pipeline.load("A B", EdgeListFormat::Whitespace).unwrap();
    pipeline.clear();
    assert!(pipeline.dataset().is_none());
    assert_eq!(pipeline.report().variants.breakdowns[0].process, "Awaiting Data");
}
