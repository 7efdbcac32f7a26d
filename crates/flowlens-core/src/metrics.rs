//! Process-mining style metrics derived from enumerated paths and the full
//! edge list. Pure functions: calling them twice on the same input yields
//! bit-identical results.

use crate::graph::{MERGE_PREFIX, ProcessGraph};
use crate::paths::ProcessPath;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// How many bottleneck candidates the detail views keep.
pub const BOTTLENECK_DETAIL_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BottleneckCategory {
    MergePoint,
    MainProcess,
    Subprocess,
}

impl BottleneckCategory {
    /// Naming-convention heuristic, not structural analysis.
    pub fn classify(id: &str) -> Self {
        match id.chars().next() {
            Some(c) if c == MERGE_PREFIX => Self::MergePoint,
            Some(c) if c.is_ascii_uppercase() => Self::MainProcess,
            _ => Self::Subprocess,
        }
    }
}

impl std::fmt::Display for BottleneckCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::MergePoint => "Merge Point",
            Self::MainProcess => "Main Process",
            Self::Subprocess => "Subprocess",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bottleneck {
    pub node_id: String,
    pub incoming_count: usize,
    pub category: BottleneckCategory,
}

/// Snapshot of the derived metrics for one dataset. Recomputed wholesale on
/// every new graph; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub cycle_time: f64,
    pub variant_count: usize,
    pub bottlenecks: Vec<Bottleneck>,
}

impl MetricsSnapshot {
    /// The no-dataset state: everything at zero.
    pub fn empty() -> Self {
        Self {
            cycle_time: 0.0,
            variant_count: 0,
            bottlenecks: Vec::new(),
        }
    }
}

pub fn snapshot(graph: &ProcessGraph, paths: &[ProcessPath]) -> MetricsSnapshot {
    MetricsSnapshot {
        cycle_time: cycle_time(paths),
        variant_count: variant_count(paths),
        bottlenecks: bottlenecks(graph),
    }
}

/// Mean path length in node count; `0.0` for an empty path list.
pub fn cycle_time(paths: &[ProcessPath]) -> f64 {
    if paths.is_empty() {
        return 0.0;
    }
    let total: usize = paths.iter().map(Vec::len).sum();
    total as f64 / paths.len() as f64
}

/// Count of distinct enumerated paths, standing in for process variants.
pub fn variant_count(paths: &[ProcessPath]) -> usize {
    paths.len()
}

/// Top bottleneck candidates: nodes with more than one incoming edge across
/// the full (untruncated) edge list, sorted by descending count with first-seen
/// order as the tie-breaker, capped at [`BOTTLENECK_DETAIL_LIMIT`].
pub fn bottlenecks(graph: &ProcessGraph) -> Vec<Bottleneck> {
    let mut candidates = bottleneck_candidates(graph);
    candidates.truncate(BOTTLENECK_DETAIL_LIMIT);
    candidates
}

/// Total number of bottleneck candidates, uncapped.
pub fn bottleneck_count(graph: &ProcessGraph) -> usize {
    bottleneck_candidates(graph).len()
}

fn bottleneck_candidates(graph: &ProcessGraph) -> Vec<Bottleneck> {
    let mut incoming: FxHashMap<&str, usize> = FxHashMap::default();
    for edge in graph.edges() {
        *incoming.entry(edge.target.as_str()).or_insert(0) += 1;
    }

    let mut candidates: Vec<Bottleneck> = incoming
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, count)| Bottleneck {
            node_id: id.to_string(),
            incoming_count: count,
            category: BottleneckCategory::classify(id),
        })
        .collect();
    candidates.sort_by_key(|b| {
        (
            std::cmp::Reverse(b.incoming_count),
            graph.node_index(&b.node_id).unwrap_or(usize::MAX),
        )
    });
    candidates
}
